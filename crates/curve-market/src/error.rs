use bonding_core::{Amount, CurveError};
use thiserror::Error;

use crate::infrastructure::ConfigError;

#[derive(Error, Debug)]
pub enum MarketError {
    #[error(transparent)]
    Curve(#[from] CurveError),

    /// Conservation broke after staging a trade; the trade was aborted.
    /// Indicates a defect in pricing or settlement, not a caller error.
    #[error("Invariant violation: supply {supply} but balances sum to {balances}")]
    InvariantViolation { supply: Amount, balances: Amount },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl MarketError {
    /// Whether the error reveals a logic defect rather than a rejected request
    pub fn is_fatal(&self) -> bool {
        matches!(self, MarketError::InvariantViolation { .. })
    }

    /// The underlying curve error, if this is a recoverable rejection
    pub fn as_curve_error(&self) -> Option<&CurveError> {
        match self {
            MarketError::Curve(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, MarketError>;
