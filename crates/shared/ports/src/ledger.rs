use async_trait::async_trait;
use bonding_core::{Amount, HolderId};
use serde::{Deserialize, Serialize};

use crate::error::SourceResult;

/// Point-in-time view of the curve's shared state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub supply: Amount,
    pub reserve: Amount,
    /// Number of holders with a non-zero balance
    pub holders: usize,
}

/// Read side of the authoritative ledger
pub trait LedgerReader: Send + Sync {
    /// Consistent snapshot of supply and reserve
    fn snapshot(&self) -> LedgerSnapshot;

    /// Current balance of a holder (zero if unknown)
    fn balance_of(&self, holder: &HolderId) -> Amount;
}

/// Remote source of ledger snapshots
///
/// This is the suspension point of the system: reading an off-process
/// ledger may take arbitrarily long or fail.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch_snapshot(&self) -> SourceResult<LedgerSnapshot>;

    /// Source name for logging
    fn name(&self) -> &str {
        "SnapshotSource"
    }
}
