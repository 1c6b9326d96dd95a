use thiserror::Error;

use crate::values::Amount;

/// Recoverable failures of pricing and settlement
///
/// Every variant is raised before any ledger mutation, so the caller can
/// retry with a smaller amount. Values are carried so the rejection can be
/// explained (requested vs. available).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CurveError {
    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: Amount, available: Amount },

    #[error("Insufficient supply: requested {requested}, available {available}")]
    InsufficientSupply { requested: Amount, available: Amount },

    #[error("Insufficient reserve: requested {requested}, available {available}")]
    InsufficientReserve { requested: Amount, available: Amount },

    #[error("Quote too small: {amount} yields nothing on the curve")]
    QuoteTooSmall { amount: Amount },

    #[error("Arithmetic overflow in {0}")]
    ArithmeticOverflow(&'static str),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid curve parameters: {0}")]
    InvalidParameters(String),
}

pub type CurveResult<T> = std::result::Result<T, CurveError>;
