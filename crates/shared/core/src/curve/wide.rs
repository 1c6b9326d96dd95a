//! 256-bit intermediate arithmetic
//!
//! Squared supplies at 18 decimals do not fit in `u128`, so every product in
//! the curve integrals is taken in [`U256`] and narrowed back at the end.

use uint::construct_uint;

use crate::error::CurveError;
use crate::values::Amount;

construct_uint! {
    /// Fixed-width 256-bit unsigned integer
    pub struct U256(4);
}

pub(crate) fn wide(amount: Amount) -> U256 {
    U256::from(amount.raw())
}

pub(crate) fn mul(a: U256, b: U256, op: &'static str) -> Result<U256, CurveError> {
    a.checked_mul(b).ok_or(CurveError::ArithmeticOverflow(op))
}

pub(crate) fn add(a: U256, b: U256, op: &'static str) -> Result<U256, CurveError> {
    a.checked_add(b).ok_or(CurveError::ArithmeticOverflow(op))
}

/// Narrow back to an [`Amount`], failing when the value needs more than 128 bits
pub(crate) fn narrow(value: U256, op: &'static str) -> Result<Amount, CurveError> {
    if value.bits() > 128 {
        return Err(CurveError::ArithmeticOverflow(op));
    }
    Ok(Amount::from_raw(value.low_u128()))
}

/// Ceiling division; `b` must be non-zero
pub(crate) fn div_ceil(a: U256, b: U256) -> U256 {
    let q = a / b;
    if (a % b).is_zero() { q } else { q + U256::one() }
}

/// Floor of the square root (Newton's method)
pub(crate) fn isqrt(n: U256) -> U256 {
    if n.is_zero() {
        return n;
    }

    // ceil(n / 2) without overflowing at U256::MAX
    let mut x = n;
    let mut y = (x >> 1) + U256::from(x.low_u64() & 1);

    while y < x {
        x = y;
        y = (x + n / x) >> 1;
    }

    x
}
