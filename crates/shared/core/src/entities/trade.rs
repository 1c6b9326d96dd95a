use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::quote::QuoteResult;
use crate::values::{Amount, HolderId, Timestamp};

/// Unique identifier for a settled trade
pub type TradeId = Uuid;

/// Direction of a trade against the curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeKind {
    /// Base currency in, tokens minted
    Buy,
    /// Tokens burned, base currency out
    Sell,
}

impl fmt::Display for TradeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeKind::Buy => write!(f, "BUY"),
            TradeKind::Sell => write!(f, "SELL"),
        }
    }
}

/// Immutable record of a settled trade
///
/// Returned to the caller; persisting it is the ledger's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeReceipt {
    pub id: TradeId,
    pub kind: TradeKind,
    pub holder: HolderId,
    /// Base currency for buys, tokens for sells
    pub input_amount: Amount,
    /// Tokens for buys, base currency for sells
    pub output_amount: Amount,
    pub supply_before: Amount,
    pub supply_after: Amount,
    pub timestamp: Timestamp,
}

impl TradeReceipt {
    pub fn new(
        kind: TradeKind,
        holder: HolderId,
        input_amount: Amount,
        output_amount: Amount,
        supply_before: Amount,
        supply_after: Amount,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            holder,
            input_amount,
            output_amount,
            supply_before,
            supply_after,
            timestamp,
        }
    }

    /// Tokens that changed hands
    pub fn token_amount(&self) -> Amount {
        match self.kind {
            TradeKind::Buy => self.output_amount,
            TradeKind::Sell => self.input_amount,
        }
    }

    /// Base currency that changed hands
    pub fn base_amount(&self) -> Amount {
        match self.kind {
            TradeKind::Buy => self.input_amount,
            TradeKind::Sell => self.output_amount,
        }
    }
}

/// Quote and execution disagreed because supply moved in between
///
/// Advisory only: the trade has already settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlippageWarning {
    pub kind: TradeKind,
    pub quoted_output: Amount,
    pub realised_output: Amount,
    pub quoted_supply: Amount,
    pub realised_supply: Amount,
}

impl SlippageWarning {
    /// Compare a prior quote with the receipt of the same trade
    ///
    /// Returns `None` when the realised output matches the quote.
    pub fn between(quote: &QuoteResult, receipt: &TradeReceipt) -> Option<Self> {
        if quote.output_amount == receipt.output_amount {
            return None;
        }
        Some(Self {
            kind: receipt.kind,
            quoted_output: quote.output_amount,
            realised_output: receipt.output_amount,
            quoted_supply: quote.supply_snapshot,
            realised_supply: receipt.supply_before,
        })
    }

    /// True when the trader received less than quoted
    pub fn is_adverse(&self) -> bool {
        self.realised_output < self.quoted_output
    }
}

impl fmt::Display for SlippageWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} slippage: quoted {} at supply {}, realised {} at supply {}",
            self.kind,
            self.quoted_output,
            self.quoted_supply,
            self.realised_output,
            self.realised_supply
        )
    }
}
