use crate::chain::{Call, Chain};
use crate::errors::ServiceError;
use crate::models::*;
use crate::monitor::LedgerMonitor;
use crate::store::ReceiptStore;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use deposit_ledger::{Address, ContractError};
use serde::Deserialize;
use std::sync::Arc;

pub struct AppState {
    pub chain: Arc<Chain>,
    pub store: Arc<ReceiptStore>,
    pub monitor: Arc<LedgerMonitor>,
}

// Error response helper
impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServiceError::Contract(ContractError::Unauthorized) => StatusCode::UNAUTHORIZED,
            ServiceError::Contract(_) => StatusCode::BAD_REQUEST,
            ServiceError::InsufficientFunds { .. } => StatusCode::BAD_REQUEST,
            ServiceError::UnknownAccount(_) => StatusCode::NOT_FOUND,
            ServiceError::InvalidAddress(_) | ServiceError::InvalidAmount(_) => {
                StatusCode::BAD_REQUEST
            }
            ServiceError::TransferFailed => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse {
            error: status.to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

// ============ API Handlers ============

/// Current contract owner
pub async fn get_owner(
    State(state): State<Arc<AppState>>,
) -> Result<Json<OwnerResponse>, ServiceError> {
    let owner = state.chain.owner().await;
    Ok(Json(OwnerResponse {
        owner: owner.to_string(),
    }))
}

/// Reassign contract ownership
pub async fn transfer_ownership(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TransferOwnershipRequest>,
) -> Result<Json<CallResponse>, ServiceError> {
    let from: Address = payload.from.parse()?;
    let new_owner: Address = payload.new_owner.parse()?;

    let call = Call::transfer_ownership(from, new_owner);
    let call_id = call.id;
    state.chain.submit(call).await?;

    Ok(Json(CallResponse {
        call_id: call_id.to_string(),
        status: "confirmed".to_string(),
    }))
}

/// Deposit attached value into the caller's ledger record
pub async fn deposit(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<DepositRequest>,
) -> Result<Json<CallResponse>, ServiceError> {
    let from: Address = payload.from.parse()?;
    let amount = parse_wei(&payload.amount)?;
    let value = match &payload.value {
        Some(v) => parse_wei(v)?,
        None => amount,
    };

    let call = Call::deposit(from, amount, value);
    let call_id = call.id;
    let events = state.chain.submit(call).await?;

    state.monitor.publish_events(&events);
    state.monitor.broadcast_account(from).await;

    Ok(Json(CallResponse {
        call_id: call_id.to_string(),
        status: "confirmed".to_string(),
    }))
}

/// Withdraw from the caller's ledger record
pub async fn withdraw(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<WithdrawRequest>,
) -> Result<Json<CallResponse>, ServiceError> {
    let from: Address = payload.from.parse()?;
    let amount = parse_wei(&payload.amount)?;

    let call = Call::withdraw(from, amount);
    let call_id = call.id;
    state.chain.submit(call).await?;

    state.monitor.broadcast_account(from).await;

    Ok(Json(CallResponse {
        call_id: call_id.to_string(),
        status: "confirmed".to_string(),
    }))
}

/// Deposit record for an account (zero-valued if it never deposited)
pub async fn list_deposits(
    State(state): State<Arc<AppState>>,
    Path(account): Path<String>,
) -> Result<Json<DepositRecordResponse>, ServiceError> {
    let account: Address = account.parse()?;
    let record = state.chain.list_deposits(account).await;

    Ok(Json(DepositRecordResponse {
        account: account.to_string(),
        total_deposits: record.total_deposits,
        amount: record.amount.to_string(),
    }))
}

/// Dev accounts with native balances
pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AccountResponse>>, ServiceError> {
    let accounts = state
        .chain
        .accounts()
        .await
        .into_iter()
        .map(|(address, balance)| AccountResponse {
            address: address.to_string(),
            balance: balance.to_string(),
        })
        .collect();
    Ok(Json(accounts))
}

/// Mint a fresh funded dev account
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateAccountRequest>,
) -> Result<Json<AccountResponse>, ServiceError> {
    let funding = parse_wei(&payload.funding)?;
    let address = state.chain.create_account(funding).await;

    Ok(Json(AccountResponse {
        address: address.to_string(),
        balance: funding.to_string(),
    }))
}

/// Dry-run a call without committing anything
pub async fn simulate(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CallRequest>,
) -> Result<Json<SimulateResponse>, ServiceError> {
    let call = match payload {
        CallRequest::TransferOwnership { from, new_owner } => {
            Call::transfer_ownership(from.parse()?, new_owner.parse()?)
        }
        CallRequest::Deposit {
            from,
            amount,
            value,
        } => {
            let amount = parse_wei(&amount)?;
            let value = match &value {
                Some(v) => parse_wei(v)?,
                None => amount,
            };
            Call::deposit(from.parse()?, amount, value)
        }
        CallRequest::Withdraw { from, amount } => {
            Call::withdraw(from.parse()?, parse_wei(&amount)?)
        }
    };

    let response = match state.chain.simulate(call).await {
        Ok(_) => SimulateResponse {
            would_succeed: true,
            error: None,
        },
        Err(e) => SimulateResponse {
            would_succeed: false,
            error: Some(e.to_string()),
        },
    };
    Ok(Json(response))
}

#[derive(Deserialize)]
pub struct ReceiptHistoryQuery {
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    50
}

/// Call history for an account, newest first
pub async fn get_receipts(
    State(state): State<Arc<AppState>>,
    Path(account): Path<String>,
    Query(query): Query<ReceiptHistoryQuery>,
) -> Result<Json<Vec<Receipt>>, ServiceError> {
    let account: Address = account.parse()?;
    let receipts = state
        .store
        .recent_for_account(&account.to_string(), query.limit)
        .await;
    Ok(Json(receipts))
}

/// Total wei held by the contract
pub async fn get_holdings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HoldingsResponse>, ServiceError> {
    let snapshot = state.chain.snapshot().await;

    Ok(Json(HoldingsResponse {
        total_held: snapshot.native_held.to_string(),
        account_count: snapshot.record_count as u64,
        timestamp: Utc::now().to_rfc3339(),
    }))
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let unauthorized = ServiceError::Contract(ContractError::Unauthorized);
        assert_eq!(
            unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );

        let invalid = ServiceError::Contract(ContractError::InvalidAmount);
        assert_eq!(invalid.into_response().status(), StatusCode::BAD_REQUEST);

        let broke = ServiceError::InsufficientFunds {
            available: 1,
            required: 2,
        };
        assert_eq!(broke.into_response().status(), StatusCode::BAD_REQUEST);

        let unknown = ServiceError::UnknownAccount("x".to_string());
        assert_eq!(unknown.into_response().status(), StatusCode::NOT_FOUND);
    }
}
