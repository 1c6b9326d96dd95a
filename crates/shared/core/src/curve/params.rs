use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::CurveError;
use crate::values::Amount;

/// Shape of the curve, fixed at deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CurveParameters {
    /// Price of the first token (base currency per token)
    initial_reserve_price: Amount,
    /// Supply over which the price rises by one base unit
    scaling_factor: Amount,
}

impl CurveParameters {
    /// Create parameters; both values must be strictly positive
    pub fn new(initial_reserve_price: Decimal, scaling_factor: Decimal) -> Result<Self, CurveError> {
        let initial_reserve_price = Amount::from_decimal(initial_reserve_price)
            .map_err(|e| CurveError::InvalidParameters(format!("initial reserve price: {}", e)))?;
        let scaling_factor = Amount::from_decimal(scaling_factor)
            .map_err(|e| CurveError::InvalidParameters(format!("scaling factor: {}", e)))?;
        Self::from_amounts(initial_reserve_price, scaling_factor)
    }

    pub fn from_amounts(
        initial_reserve_price: Amount,
        scaling_factor: Amount,
    ) -> Result<Self, CurveError> {
        if initial_reserve_price.is_zero() {
            return Err(CurveError::InvalidParameters(
                "initial reserve price must be positive".to_string(),
            ));
        }
        if scaling_factor.is_zero() {
            return Err(CurveError::InvalidParameters(
                "scaling factor must be positive".to_string(),
            ));
        }
        Ok(Self {
            initial_reserve_price,
            scaling_factor,
        })
    }

    pub fn initial_reserve_price(&self) -> Amount {
        self.initial_reserve_price
    }

    pub fn scaling_factor(&self) -> Amount {
        self.scaling_factor
    }
}
