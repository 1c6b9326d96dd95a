//! Bonding Ports
//!
//! Port definitions (traits) for the bonding-curve market.
//! These define the boundaries between the pricing/settlement core and the
//! external collaborators it consumes: time, the authoritative ledger, the
//! remote snapshot source, and the append-only trade journal.

mod clock;
mod error;
mod journal;
mod ledger;

pub use clock::Clock;
pub use error::{SourceError, SourceResult};
pub use journal::{JournalEntry, LedgerMutation, TradeJournal};
pub use ledger::{LedgerReader, LedgerSnapshot, SnapshotSource};
