use crate::config::ChainConfig;
use crate::errors::{Result, ServiceError};
use crate::models::{CallKind, Receipt, ReceiptStatus};
use crate::store::ReceiptStore;
use chrono::Utc;
use deposit_ledger::{Address, DepositLedger, DepositRecord, Event};
use rand::RngCore;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// A state-mutating call submitted to the chain: calling address, attached
/// wei value, and the operation to run against the contract.
#[derive(Debug, Clone)]
pub struct Call {
    pub id: Uuid,
    pub from: Address,
    pub value: u128,
    pub op: CallOp,
}

#[derive(Debug, Clone)]
pub enum CallOp {
    TransferOwnership { new_owner: Address },
    Deposit { amount: u128 },
    Withdraw { amount: u128 },
}

impl Call {
    pub fn transfer_ownership(from: Address, new_owner: Address) -> Self {
        Self {
            id: Uuid::new_v4(),
            from,
            value: 0,
            op: CallOp::TransferOwnership { new_owner },
        }
    }

    pub fn deposit(from: Address, amount: u128, value: u128) -> Self {
        Self {
            id: Uuid::new_v4(),
            from,
            value,
            op: CallOp::Deposit { amount },
        }
    }

    pub fn withdraw(from: Address, amount: u128) -> Self {
        Self {
            id: Uuid::new_v4(),
            from,
            value: 0,
            op: CallOp::Withdraw { amount },
        }
    }

    fn kind(&self) -> CallKind {
        match self.op {
            CallOp::TransferOwnership { .. } => CallKind::TransferOwnership,
            CallOp::Deposit { .. } => CallKind::Deposit,
            CallOp::Withdraw { .. } => CallKind::Withdraw,
        }
    }

    fn amount(&self) -> u128 {
        match self.op {
            CallOp::TransferOwnership { .. } => 0,
            CallOp::Deposit { amount } | CallOp::Withdraw { amount } => amount,
        }
    }
}

/// Point-in-time view used for reconciliation and analytics.
#[derive(Debug, Clone, Copy)]
pub struct HoldingsSnapshot {
    /// Sum of all deposit records in the ledger.
    pub ledger_total: u128,
    /// Native wei actually held by the contract.
    pub native_held: u128,
    pub record_count: usize,
}

#[derive(Clone)]
struct ChainInner {
    accounts: HashMap<Address, u128>,
    dev_accounts: Vec<Address>,
    contract: DepositLedger,
    /// Native wei held by the deployed contract. Invariant: equals the sum
    /// of all deposit records.
    holdings: u128,
}

/// In-process execution environment hosting one contract instance.
///
/// All mutating calls are serialized through a single lock and applied
/// all-or-nothing: the contract state is staged on a clone, and native
/// balances only move once every check has passed. A failed call leaves no
/// trace beyond its reverted receipt.
pub struct Chain {
    inner: Mutex<ChainInner>,
    base_call_fee: u128,
    store: Arc<ReceiptStore>,
}

impl Chain {
    /// Create the genesis state: pre-funded dev accounts, the first of
    /// which deploys the contract and becomes its owner.
    pub fn genesis(config: &ChainConfig, store: Arc<ReceiptStore>) -> Self {
        let count = config.dev_accounts.max(1);
        let mut accounts = HashMap::with_capacity(count);
        let mut dev_accounts = Vec::with_capacity(count);

        while dev_accounts.len() < count {
            let address = random_address();
            if accounts.insert(address, config.initial_balance).is_none() {
                dev_accounts.push(address);
            }
        }

        let deployer = dev_accounts[0];
        log::info!("Contract deployed by {}", deployer);

        Self {
            inner: Mutex::new(ChainInner {
                accounts,
                dev_accounts,
                contract: DepositLedger::deploy(deployer),
                holdings: 0,
            }),
            base_call_fee: config.base_call_fee,
            store,
        }
    }

    /// Submit a call for atomic execution. Returns the events committed
    /// alongside the state change; on failure nothing changed except that a
    /// reverted receipt was recorded.
    pub async fn submit(&self, call: Call) -> Result<Vec<Event>> {
        let mut inner = self.inner.lock().await;
        let outcome = Self::execute(&mut inner, &call, self.base_call_fee);

        let (status, error_message) = match &outcome {
            Ok(_) => {
                log::debug!("Call {} ({:?}) confirmed", call.id, call.kind());
                (ReceiptStatus::Confirmed, None)
            }
            Err(e) => {
                log::debug!("Call {} ({:?}) reverted: {}", call.id, call.kind(), e);
                (ReceiptStatus::Reverted, Some(e.to_string()))
            }
        };

        self.store
            .append(Receipt {
                id: call.id.to_string(),
                kind: call.kind(),
                account: call.from.to_string(),
                amount: call.amount().to_string(),
                status,
                error_message,
                timestamp: Utc::now(),
            })
            .await;

        outcome
    }

    /// Dry-run a call against a scratch copy of the chain. Commits nothing
    /// and records no receipt.
    pub async fn simulate(&self, call: Call) -> Result<Vec<Event>> {
        let inner = self.inner.lock().await;
        let mut scratch = inner.clone();
        Self::execute(&mut scratch, &call, self.base_call_fee)
    }

    fn execute(inner: &mut ChainInner, call: &Call, fee: u128) -> Result<Vec<Event>> {
        let balance = *inner
            .accounts
            .get(&call.from)
            .ok_or_else(|| ServiceError::UnknownAccount(call.from.to_string()))?;

        let required = call.value.saturating_add(fee);
        if balance < required {
            return Err(ServiceError::InsufficientFunds {
                available: balance,
                required,
            });
        }

        // Stage the contract mutation on a clone; commit only on success.
        let mut staged = inner.contract.clone();
        let events = match call.op {
            CallOp::TransferOwnership { new_owner } => {
                staged.transfer_ownership(call.from, new_owner)?
            }
            CallOp::Deposit { amount } => staged.deposit(call.from, amount, call.value)?,
            CallOp::Withdraw { amount } => {
                let events = staged.withdraw(call.from, amount)?;
                if inner.holdings.saturating_add(call.value) < amount {
                    return Err(ServiceError::TransferFailed);
                }
                events
            }
        };

        // Commit: the fee is burned, attached value moves into the
        // contract, withdrawals are paid back out of its holdings.
        let mut new_balance = balance - required;
        let mut holdings = inner.holdings + call.value;
        if let CallOp::Withdraw { amount } = call.op {
            holdings -= amount;
            new_balance += amount;
        }
        inner.accounts.insert(call.from, new_balance);
        inner.holdings = holdings;
        inner.contract = staged;

        Ok(events)
    }

    // ============ Read-only queries ============

    pub async fn owner(&self) -> Address {
        self.inner.lock().await.contract.owner()
    }

    pub async fn list_deposits(&self, account: Address) -> DepositRecord {
        self.inner.lock().await.contract.list_deposits(account)
    }

    /// Dev accounts with their native balances, in genesis order.
    pub async fn accounts(&self) -> Vec<(Address, u128)> {
        let inner = self.inner.lock().await;
        inner
            .dev_accounts
            .iter()
            .map(|a| (*a, inner.accounts.get(a).copied().unwrap_or_default()))
            .collect()
    }

    pub async fn snapshot(&self) -> HoldingsSnapshot {
        let inner = self.inner.lock().await;
        HoldingsSnapshot {
            ledger_total: inner.contract.total_held(),
            native_held: inner.holdings,
            record_count: inner.contract.account_count(),
        }
    }

    /// Mint a fresh dev account funded with `funding` wei.
    pub async fn create_account(&self, funding: u128) -> Address {
        let mut inner = self.inner.lock().await;
        loop {
            let address = random_address();
            if inner.accounts.insert(address, funding).is_none() {
                inner.dev_accounts.push(address);
                log::info!("Created account {} funded with {} wei", address, funding);
                return address;
            }
        }
    }
}

fn random_address() -> Address {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    Address::new(bytes)
}
