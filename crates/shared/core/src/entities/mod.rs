mod trade;

pub use trade::{SlippageWarning, TradeId, TradeKind, TradeReceipt};
