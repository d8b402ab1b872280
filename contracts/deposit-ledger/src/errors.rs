use thiserror::Error;

/// Reasons a contract call reverts. The `Display` output of each variant is
/// the reason string surfaced to callers and must stay stable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractError {
    #[error("Unauthorized permission")]
    Unauthorized,

    #[error("Invalid withdraw amount")]
    InvalidAmount,

    #[error("Deposit value mismatch: declared={declared}, delivered={delivered}")]
    ValueMismatch { declared: u128, delivered: u128 },

    #[error("Numerical overflow in balance calculation")]
    NumericalOverflow,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("invalid address: expected base58-encoded 32 bytes")]
pub struct AddressParseError;

pub type Result<T> = std::result::Result<T, ContractError>;
