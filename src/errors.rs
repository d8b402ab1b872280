use deposit_ledger::{AddressParseError, ContractError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Contract(#[from] ContractError),

    #[error("insufficient funds for call fee + value: available={available}, required={required}")]
    InsufficientFunds { available: u128, required: u128 },

    #[error("Unknown account: {0}")]
    UnknownAccount(String),

    #[error("Withdrawal transfer failed: contract holdings insufficient")]
    TransferFailed,

    #[error("Invalid address: {0}")]
    InvalidAddress(#[from] AddressParseError),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

pub type Result<T> = std::result::Result<T, ServiceError>;
