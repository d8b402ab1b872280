use crate::errors::ServiceError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Wei amounts travel as decimal strings: u128 balances (1000 ether is
// already past u64::MAX) do not fit a JSON number.

/// Parse a wei amount from its wire form.
pub fn parse_wei(value: &str) -> Result<u128, ServiceError> {
    value
        .trim()
        .parse::<u128>()
        .map_err(|_| ServiceError::InvalidAmount(value.to_string()))
}

/// Call receipt kept by the in-memory store, one per submitted call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    pub id: String,
    pub kind: CallKind,
    pub account: String,
    pub amount: String,
    pub status: ReceiptStatus,
    pub error_message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CallKind {
    TransferOwnership,
    Deposit,
    Withdraw,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptStatus {
    Confirmed,
    Reverted,
}

// ============ API Request/Response Models ============

#[derive(Debug, Serialize, Deserialize)]
pub struct TransferOwnershipRequest {
    pub from: String,
    pub new_owner: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DepositRequest {
    pub from: String,
    pub amount: String,
    /// Wei actually attached to the call; defaults to `amount`.
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WithdrawRequest {
    pub from: String,
    pub amount: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateAccountRequest {
    pub funding: String,
}

/// A call in wire form, used by the simulate endpoint.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CallRequest {
    TransferOwnership {
        from: String,
        new_owner: String,
    },
    Deposit {
        from: String,
        amount: String,
        #[serde(default)]
        value: Option<String>,
    },
    Withdraw {
        from: String,
        amount: String,
    },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OwnerResponse {
    pub owner: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CallResponse {
    pub call_id: String,
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DepositRecordResponse {
    pub account: String,
    pub total_deposits: u64,
    pub amount: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AccountResponse {
    pub address: String,
    pub balance: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SimulateResponse {
    pub would_succeed: bool,
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HoldingsResponse {
    pub total_held: String,
    pub account_count: u64,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

// ============ WebSocket Messages ============

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WsMessage {
    #[serde(rename = "deposit")]
    Deposit { user: String, amount: String },
    #[serde(rename = "balance_update")]
    BalanceUpdate {
        account: String,
        total_deposits: u64,
        amount: String,
    },
    #[serde(rename = "holdings_update")]
    HoldingsUpdate {
        total_held: String,
        account_count: u64,
    },
    #[serde(rename = "error")]
    Error { message: String },
}
