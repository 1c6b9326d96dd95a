// Application layer
pub mod application;

// Infrastructure layer
pub mod infrastructure;

// Cross-cutting concerns
pub mod error;

// Re-export main types for convenience
pub use application::{BondingMarket, RefreshHandle, SettlementEngine, SyncCache, TokenMetadata};
pub use error::{MarketError, Result};
pub use infrastructure::{ConfigError, InMemoryJournal, LedgerState, MarketConfig};
