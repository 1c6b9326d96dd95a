//! Infrastructure layer: ledger storage, the trade journal and configuration

mod config;
mod journal;
mod ledger;

pub use config::{ConfigError, CurveConfig, MarketConfig, SeedBuyConfig, SyncConfig};
pub use journal::InMemoryJournal;
pub use ledger::LedgerState;
pub(crate) use ledger::LedgerTxn;
