mod market;
mod settlement;
mod sync_cache;

pub use market::{BondingMarket, TokenMetadata};
pub use settlement::SettlementEngine;
pub use sync_cache::{DEFAULT_FETCH_TIMEOUT, RefreshHandle, SyncCache};
