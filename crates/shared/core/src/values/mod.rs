use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CurveError;

/// Fractional decimal digits carried by every [`Amount`]
pub const AMOUNT_DECIMALS: u32 = 18;

/// Raw units per whole unit (10^18)
pub const WAD: u128 = 1_000_000_000_000_000_000;

/// Timestamp in UTC
pub type Timestamp = DateTime<Utc>;

/// Non-negative fixed-point quantity with 18 fractional digits
///
/// Used for token supply, balances, reserve and prices alike. The raw value
/// is the quantity multiplied by [`WAD`]; arithmetic never wraps.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(u128);

impl Amount {
    pub const ZERO: Amount = Amount(0);
    pub const ONE: Amount = Amount(WAD);

    pub const fn from_raw(raw: u128) -> Self {
        Self(raw)
    }

    pub const fn raw(&self) -> u128 {
        self.0
    }

    pub fn from_whole(units: u64) -> Self {
        Self(units as u128 * WAD)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Convert from a decimal, truncating digits past the 18th
    pub fn from_decimal(value: Decimal) -> Result<Self, CurveError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(CurveError::InvalidAmount(format!("{} is negative", value)));
        }
        let truncated = value.round_dp_with_strategy(AMOUNT_DECIMALS, RoundingStrategy::ToZero);
        let mantissa = u128::try_from(truncated.mantissa())
            .map_err(|_| CurveError::InvalidAmount(format!("{} is negative", value)))?;
        let factor = 10u128.pow(AMOUNT_DECIMALS - truncated.scale());
        mantissa
            .checked_mul(factor)
            .map(Self)
            .ok_or(CurveError::ArithmeticOverflow("decimal conversion"))
    }

    /// Convert to a normalized decimal; fails only for values beyond 96 bits of mantissa
    pub fn to_decimal(&self) -> Result<Decimal, CurveError> {
        let raw = i128::try_from(self.0).map_err(|_| CurveError::ArithmeticOverflow("to_decimal"))?;
        Decimal::try_from_i128_with_scale(raw, AMOUNT_DECIMALS)
            .map(|d| d.normalize())
            .map_err(|_| CurveError::ArithmeticOverflow("to_decimal"))
    }

    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Self)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / WAD;
        let frac = self.0 % WAD;
        if frac == 0 {
            return write!(f, "{}", whole);
        }
        let digits = format!("{:018}", frac);
        write!(f, "{}.{}", whole, digits.trim_end_matches('0'))
    }
}

impl FromStr for Amount {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim())
            .map_err(|e| CurveError::InvalidAmount(format!("'{}': {}", s, e)))?;
        Self::from_decimal(value)
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = CurveError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::from_decimal(value)
    }
}

/// Identity of a token holder, supplied by the signing layer
///
/// The core does not authenticate it; it is only a ledger key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HolderId(String);

impl HolderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HolderId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for HolderId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
