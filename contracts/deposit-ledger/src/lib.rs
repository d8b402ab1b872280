//! Ownership-gated deposit ledger.
//!
//! A single owner address gates ownership reassignment; every other account
//! gets an implicit zero-valued [`DepositRecord`] it can grow with deposits
//! and shrink with withdrawals. All operations are deterministic and side
//! effect free apart from their return value: mutating calls hand back the
//! events to emit, and the hosting environment decides when (and whether)
//! the new state and events become visible.

pub mod errors;
pub mod state;

pub use errors::{AddressParseError, ContractError, Result};
pub use state::{Address, DepositRecord, Event, WEI_PER_ETHER};

use std::collections::HashMap;

/// Contract state: the owner scalar plus the per-account ledger.
///
/// Cheap to clone; the environment stages a call by cloning, applying the
/// operation to the clone, and committing only on success.
#[derive(Debug, Clone)]
pub struct DepositLedger {
    owner: Address,
    records: HashMap<Address, DepositRecord>,
}

impl DepositLedger {
    /// Construct with the deploying caller as initial owner and an empty
    /// ledger.
    pub fn deploy(deployer: Address) -> Self {
        Self {
            owner: deployer,
            records: HashMap::new(),
        }
    }

    /// Current owner. Read-only, never fails.
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Reassign ownership. Only the current owner may call this; anyone
    /// else reverts with `Unauthorized`. Transferring to the current owner
    /// is a no-op success.
    pub fn transfer_ownership(&mut self, caller: Address, new_owner: Address) -> Result<Vec<Event>> {
        if caller != self.owner {
            return Err(ContractError::Unauthorized);
        }
        self.owner = new_owner;
        Ok(Vec::new())
    }

    /// Credit `value` wei to the caller's record. `amount` is the declared
    /// parameter and must match the value the environment delivered with
    /// the call. Emits exactly one `Event::Deposit` on success.
    pub fn deposit(&mut self, caller: Address, amount: u128, value: u128) -> Result<Vec<Event>> {
        if amount != value {
            return Err(ContractError::ValueMismatch {
                declared: amount,
                delivered: value,
            });
        }

        let record = self.list_deposits(caller);
        let updated = DepositRecord {
            total_deposits: record
                .total_deposits
                .checked_add(1)
                .ok_or(ContractError::NumericalOverflow)?,
            amount: record
                .amount
                .checked_add(value)
                .ok_or(ContractError::NumericalOverflow)?,
        };
        self.records.insert(caller, updated);

        Ok(vec![Event::Deposit {
            user: caller,
            amount: value,
        }])
    }

    /// Debit `amount` wei from the caller's record. Zero amounts and
    /// amounts above the recorded balance both revert with the same
    /// `InvalidAmount` reason; the balance check rides on `checked_sub` so
    /// an underflow can never wrap. `total_deposits` is untouched.
    pub fn withdraw(&mut self, caller: Address, amount: u128) -> Result<Vec<Event>> {
        if amount == 0 {
            return Err(ContractError::InvalidAmount);
        }

        let record = self.list_deposits(caller);
        let remaining = record
            .amount
            .checked_sub(amount)
            .ok_or(ContractError::InvalidAmount)?;
        self.records.insert(
            caller,
            DepositRecord {
                amount: remaining,
                ..record
            },
        );

        Ok(Vec::new())
    }

    /// Deposit record for `account`, zero-valued if the account has never
    /// deposited. Read-only, never fails.
    pub fn list_deposits(&self, account: Address) -> DepositRecord {
        self.records.get(&account).copied().unwrap_or_default()
    }

    /// Sum of all recorded balances.
    pub fn total_held(&self) -> u128 {
        self.records
            .values()
            .fold(0u128, |acc, r| acc.saturating_add(r.amount))
    }

    /// Number of accounts with a materialized record.
    pub fn account_count(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(tag: u8) -> Address {
        Address::new([tag; 32])
    }

    #[test]
    fn test_deployer_becomes_owner() {
        let ledger = DepositLedger::deploy(addr(1));
        assert_eq!(ledger.owner(), addr(1));
    }

    #[test]
    fn test_owner_transfers_ownership() {
        let mut ledger = DepositLedger::deploy(addr(1));
        let events = ledger.transfer_ownership(addr(1), addr(2)).unwrap();
        assert!(events.is_empty());
        assert_eq!(ledger.owner(), addr(2));
    }

    #[test]
    fn test_transfer_to_self_is_noop_success() {
        let mut ledger = DepositLedger::deploy(addr(1));
        ledger.transfer_ownership(addr(1), addr(1)).unwrap();
        assert_eq!(ledger.owner(), addr(1));
    }

    #[test]
    fn test_non_owner_cannot_transfer_ownership() {
        let mut ledger = DepositLedger::deploy(addr(1));
        ledger.transfer_ownership(addr(1), addr(2)).unwrap();

        // addr(1) gave ownership away; a second attempt must revert.
        let err = ledger.transfer_ownership(addr(1), addr(3)).unwrap_err();
        assert_eq!(err, ContractError::Unauthorized);
        assert_eq!(err.to_string(), "Unauthorized permission");
        assert_eq!(ledger.owner(), addr(2));
    }

    #[test]
    fn test_deposit_updates_record_and_emits_event() {
        let mut ledger = DepositLedger::deploy(addr(1));
        let deposit = WEI_PER_ETHER / 10;

        let events = ledger.deposit(addr(1), deposit, deposit).unwrap();
        assert_eq!(
            events,
            vec![Event::Deposit {
                user: addr(1),
                amount: deposit
            }]
        );

        let record = ledger.list_deposits(addr(1));
        assert_eq!(record.total_deposits, 1);
        assert_eq!(record.amount, deposit);
    }

    #[test]
    fn test_deposits_accumulate_per_account() {
        let mut ledger = DepositLedger::deploy(addr(1));
        ledger.deposit(addr(2), 100, 100).unwrap();
        ledger.deposit(addr(2), 250, 250).unwrap();
        ledger.deposit(addr(3), 7, 7).unwrap();

        assert_eq!(
            ledger.list_deposits(addr(2)),
            DepositRecord {
                total_deposits: 2,
                amount: 350
            }
        );
        assert_eq!(ledger.list_deposits(addr(3)).total_deposits, 1);
        assert_eq!(ledger.total_held(), 357);
        assert_eq!(ledger.account_count(), 2);
    }

    #[test]
    fn test_deposit_value_mismatch_rejected() {
        let mut ledger = DepositLedger::deploy(addr(1));
        let err = ledger.deposit(addr(1), 100, 99).unwrap_err();
        assert!(matches!(err, ContractError::ValueMismatch { .. }));
        assert_eq!(ledger.list_deposits(addr(1)), DepositRecord::default());
    }

    #[test]
    fn test_deposit_overflow_guard() {
        let mut ledger = DepositLedger::deploy(addr(1));
        ledger.deposit(addr(1), u128::MAX, u128::MAX).unwrap();

        let err = ledger.deposit(addr(1), 1, 1).unwrap_err();
        assert_eq!(err, ContractError::NumericalOverflow);
        let record = ledger.list_deposits(addr(1));
        assert_eq!(record.total_deposits, 1);
        assert_eq!(record.amount, u128::MAX);
    }

    #[test]
    fn test_withdraw_zero_rejected() {
        let mut ledger = DepositLedger::deploy(addr(1));
        ledger.deposit(addr(1), 100, 100).unwrap();

        let err = ledger.withdraw(addr(1), 0).unwrap_err();
        assert_eq!(err, ContractError::InvalidAmount);
        assert_eq!(err.to_string(), "Invalid withdraw amount");
        assert_eq!(ledger.list_deposits(addr(1)).amount, 100);
    }

    #[test]
    fn test_withdraw_underflow_guard() {
        let mut ledger = DepositLedger::deploy(addr(1));

        // Empty record: even 1 wei must revert rather than wrap.
        let err = ledger.withdraw(addr(1), 1).unwrap_err();
        assert_eq!(err, ContractError::InvalidAmount);

        ledger.deposit(addr(1), 100, 100).unwrap();
        let err = ledger.withdraw(addr(1), 101).unwrap_err();
        assert_eq!(err, ContractError::InvalidAmount);
        assert_eq!(ledger.list_deposits(addr(1)).amount, 100);
    }

    #[test]
    fn test_withdraw_is_exact_fixed_point() {
        let mut ledger = DepositLedger::deploy(addr(1));
        ledger
            .deposit(addr(1), WEI_PER_ETHER, WEI_PER_ETHER)
            .unwrap();
        assert_eq!(ledger.list_deposits(addr(1)).total_deposits, 1);

        let withdraw = 6 * WEI_PER_ETHER / 10;
        let events = ledger.withdraw(addr(1), withdraw).unwrap();
        assert!(events.is_empty());

        let record = ledger.list_deposits(addr(1));
        assert_eq!(record.amount, 4 * WEI_PER_ETHER / 10);
        assert_eq!(record.total_deposits, 1);

        // The remainder cannot cover the same withdrawal twice.
        let err = ledger.withdraw(addr(1), withdraw).unwrap_err();
        assert_eq!(err, ContractError::InvalidAmount);
        assert_eq!(ledger.list_deposits(addr(1)).amount, 4 * WEI_PER_ETHER / 10);
    }

    #[test]
    fn test_list_deposits_unknown_account_is_zero() {
        let ledger = DepositLedger::deploy(addr(1));
        assert_eq!(ledger.list_deposits(addr(9)), DepositRecord::default());
    }

    #[test]
    fn test_address_text_round_trip() {
        let address = addr(42);
        let text = address.to_string();
        assert_eq!(text.parse::<Address>().unwrap(), address);
        assert!("not-base58!".parse::<Address>().is_err());
        // Well-formed base58 of the wrong length is still rejected.
        assert!("3yZe7d".parse::<Address>().is_err());
    }
}
