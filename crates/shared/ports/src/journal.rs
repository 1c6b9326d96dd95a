use bonding_core::{Amount, HolderId, Timestamp, TradeId, TradeKind};
use serde::{Deserialize, Serialize};

/// The four sub-mutations of one trade, applied as a unit
///
/// A buy mints `tokens`, credits them to `holder` and adds `base` to the
/// reserve. A sell burns `tokens`, debits them from `holder` and removes
/// `base` from the reserve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerMutation {
    pub trade_id: TradeId,
    pub kind: TradeKind,
    pub holder: HolderId,
    pub tokens: Amount,
    pub base: Amount,
    pub supply_after: Amount,
    pub reserve_after: Amount,
    pub timestamp: Timestamp,
}

/// A mutation as recorded in the journal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Monotonic, gap-free, starting at 1
    pub sequence: u64,
    pub mutation: LedgerMutation,
}

/// Append-only log of committed mutations
///
/// Appends happen while the ledger lock is held, so journal order equals
/// commit order.
pub trait TradeJournal: Send + Sync {
    /// Append a committed mutation and return its sequence number
    fn append(&self, mutation: LedgerMutation) -> u64;

    /// Number of recorded entries
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
