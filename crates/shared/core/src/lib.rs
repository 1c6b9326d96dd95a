//! Bonding Core Domain
//!
//! Pure domain types and pricing math for the bonding-curve market.
//! This crate contains no async, no I/O, and is 100% unit testable.
//!
//! - **values**: fixed-point [`Amount`] (18 decimals), holder identities, timestamps
//! - **curve**: curve parameters and the [`CurveMath`] integrals
//! - **quote**: the read-only [`QuoteEngine`]
//! - **entities**: trade receipts and slippage warnings

pub mod curve;
pub mod entities;
pub mod error;
pub mod quote;
pub mod values;

// Re-export commonly used types at crate root
pub use curve::{CurveMath, CurveParameters};
pub use entities::{SlippageWarning, TradeId, TradeKind, TradeReceipt};
pub use error::{CurveError, CurveResult};
pub use quote::{QuoteDiagnostic, QuoteEngine, QuoteResult};
pub use values::{AMOUNT_DECIMALS, Amount, HolderId, Timestamp, WAD};
