use crate::models::Receipt;
use tokio::sync::RwLock;

/// In-memory, append-only call history. Reverted calls are recorded too;
/// only contract and account state stay untouched by a revert.
#[derive(Default)]
pub struct ReceiptStore {
    receipts: RwLock<Vec<Receipt>>,
}

impl ReceiptStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn append(&self, receipt: Receipt) {
        self.receipts.write().await.push(receipt);
    }

    /// Receipts for `account`, newest first, capped at `limit`.
    pub async fn recent_for_account(&self, account: &str, limit: usize) -> Vec<Receipt> {
        self.receipts
            .read()
            .await
            .iter()
            .rev()
            .filter(|r| r.account == account)
            .take(limit)
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.receipts.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CallKind, ReceiptStatus};
    use chrono::Utc;

    fn receipt(account: &str, status: ReceiptStatus) -> Receipt {
        Receipt {
            id: uuid::Uuid::new_v4().to_string(),
            kind: CallKind::Deposit,
            account: account.to_string(),
            amount: "100".to_string(),
            status,
            error_message: None,
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_recent_for_account_filters_and_limits() {
        let store = ReceiptStore::new();
        store.append(receipt("alice", ReceiptStatus::Confirmed)).await;
        store.append(receipt("bob", ReceiptStatus::Confirmed)).await;
        store.append(receipt("alice", ReceiptStatus::Reverted)).await;
        store.append(receipt("alice", ReceiptStatus::Confirmed)).await;

        let recent = store.recent_for_account("alice", 2).await;
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].status, ReceiptStatus::Confirmed);
        assert_eq!(recent[1].status, ReceiptStatus::Reverted);
        assert_eq!(store.len().await, 4);
    }
}
