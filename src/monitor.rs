use crate::chain::Chain;
use crate::models::WsMessage;
use deposit_ledger::{Address, Event};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::time::{interval, Duration};

/// Watches the hosted contract and keeps WebSocket subscribers informed:
/// deposit events and balance updates after calls, periodic holdings stats,
/// and alerts when the ledger stops matching the contract's native
/// holdings.
pub struct LedgerMonitor {
    chain: Arc<Chain>,
    ws_sender: broadcast::Sender<WsMessage>,
}

impl LedgerMonitor {
    pub fn new(chain: Arc<Chain>, ws_sender: broadcast::Sender<WsMessage>) -> Self {
        Self { chain, ws_sender }
    }

    /// Start the background reconciliation and stats loop.
    pub fn start(&self) {
        let monitor = self.clone();

        tokio::spawn(async move {
            let mut reconcile_interval = interval(Duration::from_secs(30));
            let mut holdings_interval = interval(Duration::from_secs(60));

            loop {
                tokio::select! {
                    _ = reconcile_interval.tick() => {
                        monitor.reconcile().await;
                    }
                    _ = holdings_interval.tick() => {
                        monitor.broadcast_holdings().await;
                    }
                }
            }
        });
    }

    /// Compare the ledger's recorded total against the contract's native
    /// holdings; they must never drift apart.
    async fn reconcile(&self) {
        let snapshot = self.chain.snapshot().await;
        if snapshot.ledger_total != snapshot.native_held {
            log::error!(
                "Ledger mismatch: records sum to {} wei but contract holds {}",
                snapshot.ledger_total,
                snapshot.native_held
            );
            let _ = self.ws_sender.send(WsMessage::Error {
                message: format!(
                    "Ledger mismatch: recorded {} wei, held {} wei",
                    snapshot.ledger_total, snapshot.native_held
                ),
            });
        } else {
            log::debug!(
                "Reconciliation clean: {} wei across {} accounts",
                snapshot.ledger_total,
                snapshot.record_count
            );
        }
    }

    async fn broadcast_holdings(&self) {
        let snapshot = self.chain.snapshot().await;
        let _ = self.ws_sender.send(WsMessage::HoldingsUpdate {
            total_held: snapshot.native_held.to_string(),
            account_count: snapshot.record_count as u64,
        });
        log::info!(
            "Holdings: {} wei across {} accounts",
            snapshot.native_held,
            snapshot.record_count
        );
    }

    /// Forward committed contract events to subscribers.
    pub fn publish_events(&self, events: &[Event]) {
        for event in events {
            match event {
                Event::Deposit { user, amount } => {
                    let _ = self.ws_sender.send(WsMessage::Deposit {
                        user: user.to_string(),
                        amount: amount.to_string(),
                    });
                }
            }
        }
    }

    /// Push the current deposit record for `account` after a mutation.
    pub async fn broadcast_account(&self, account: Address) {
        let record = self.chain.list_deposits(account).await;
        let _ = self.ws_sender.send(WsMessage::BalanceUpdate {
            account: account.to_string(),
            total_deposits: record.total_deposits,
            amount: record.amount.to_string(),
        });
    }
}

impl Clone for LedgerMonitor {
    fn clone(&self) -> Self {
        Self {
            chain: Arc::clone(&self.chain),
            ws_sender: self.ws_sender.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::Call;
    use crate::config::ChainConfig;
    use crate::store::ReceiptStore;
    use deposit_ledger::WEI_PER_ETHER;

    #[tokio::test]
    async fn test_broadcast_account_sends_current_record() {
        let config = ChainConfig {
            dev_accounts: 1,
            initial_balance: 10 * WEI_PER_ETHER,
            base_call_fee: 0,
        };
        let chain = Arc::new(Chain::genesis(&config, Arc::new(ReceiptStore::new())));
        let (sender, mut receiver) = broadcast::channel(16);
        let monitor = LedgerMonitor::new(Arc::clone(&chain), sender);

        let (user, _) = chain.accounts().await[0];
        let events = chain
            .submit(Call::deposit(user, WEI_PER_ETHER, WEI_PER_ETHER))
            .await
            .unwrap();
        monitor.publish_events(&events);
        monitor.broadcast_account(user).await;

        match receiver.recv().await.unwrap() {
            WsMessage::Deposit { user: u, amount } => {
                assert_eq!(u, user.to_string());
                assert_eq!(amount, WEI_PER_ETHER.to_string());
            }
            other => panic!("unexpected message: {:?}", other),
        }
        match receiver.recv().await.unwrap() {
            WsMessage::BalanceUpdate {
                total_deposits,
                amount,
                ..
            } => {
                assert_eq!(total_deposits, 1);
                assert_eq!(amount, WEI_PER_ETHER.to_string());
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }
}
