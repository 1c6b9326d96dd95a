//! Read-through supply cache in front of a remote ledger
//!
//! Serves the last fetched snapshot to quoting callers, refreshing it when it
//! is missing, invalidated, or older than the refresh interval. A failed
//! refresh keeps the previous snapshot; callers only see staler data.
//! Locks are never held across an await.

use bonding_core::{Amount, Timestamp};
use bonding_ports::{Clock, LedgerSnapshot, SnapshotSource, SourceError, SourceResult};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::Result;
use crate::infrastructure::ConfigError;

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Default)]
struct CacheState {
    snapshot: Option<LedgerSnapshot>,
    fetched_at: Option<Timestamp>,
    stale: bool,
    /// Bumped by every invalidation
    epoch: u64,
}

pub struct SyncCache<S, C>
where
    S: SnapshotSource,
    C: Clock,
{
    source: Arc<S>,
    clock: Arc<C>,
    refresh_interval: Duration,
    fetch_timeout: Duration,
    state: RwLock<CacheState>,
}

impl<S, C> SyncCache<S, C>
where
    S: SnapshotSource,
    C: Clock,
{
    /// Fails on a zero refresh interval
    pub fn new(source: Arc<S>, clock: Arc<C>, refresh_interval: Duration) -> Result<Self> {
        if refresh_interval.is_zero() {
            return Err(
                ConfigError::InvalidSync("refresh interval must be non-zero".to_string()).into(),
            );
        }
        Ok(Self {
            source,
            clock,
            refresh_interval,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            state: RwLock::new(CacheState::default()),
        })
    }

    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    /// Cached supply and its age, refreshing first if needed
    ///
    /// `None` only when no snapshot has ever been loaded.
    pub async fn get_cached_supply(&self) -> Option<(Amount, chrono::Duration)> {
        if self.needs_refresh() {
            // Failure is logged by refresh; fall back to whatever is cached
            let _ = self.refresh().await;
        }

        let state = self.state.read();
        let snapshot = state.snapshot?;
        let fetched_at = state.fetched_at?;
        Some((snapshot.supply, self.clock.now() - fetched_at))
    }

    /// Last snapshot without triggering a refresh
    pub fn peek(&self) -> Option<LedgerSnapshot> {
        self.state.read().snapshot
    }

    /// Overwrite the snapshot from the source
    pub async fn refresh(&self) -> SourceResult<LedgerSnapshot> {
        let epoch = self.state.read().epoch;

        let fetched = tokio::time::timeout(self.fetch_timeout, self.source.fetch_snapshot())
            .await
            .unwrap_or_else(|_| Err(SourceError::Timeout(self.fetch_timeout.as_millis() as u64)));

        match fetched {
            Ok(snapshot) => {
                let mut state = self.state.write();
                state.snapshot = Some(snapshot);
                state.fetched_at = Some(self.clock.now());
                // A trade landed while we were fetching; the snapshot may predate it
                state.stale = state.epoch != epoch;
                log::debug!(
                    "Refreshed supply from {}: {}",
                    self.source.name(),
                    snapshot.supply
                );
                Ok(snapshot)
            }
            Err(e) => {
                log::warn!(
                    "Supply refresh from {} failed, keeping previous snapshot: {}",
                    self.source.name(),
                    e
                );
                Err(e)
            }
        }
    }

    /// Force the next read to refresh
    pub fn invalidate(&self) {
        let mut state = self.state.write();
        state.stale = true;
        state.epoch += 1;
    }

    fn needs_refresh(&self) -> bool {
        let state = self.state.read();
        let Some(fetched_at) = state.fetched_at else {
            return true;
        };
        if state.stale {
            return true;
        }
        // A clock that moved backwards also forces a refresh
        (self.clock.now() - fetched_at)
            .to_std()
            .map(|age| age >= self.refresh_interval)
            .unwrap_or(true)
    }
}

impl<S, C> SyncCache<S, C>
where
    S: SnapshotSource + 'static,
    C: Clock + 'static,
{
    /// Refresh on a fixed interval until the handle is dropped
    pub fn spawn_refresher(self: &Arc<Self>) -> RefreshHandle {
        let cache = Arc::clone(self);
        let period = self.refresh_interval;

        let handle = tokio::spawn(async move {
            log::info!(
                "Starting supply refresher for {} every {:?}",
                cache.source.name(),
                period
            );
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let _ = cache.refresh().await;
            }
        });

        RefreshHandle { handle }
    }
}

/// Owns the background refresher; aborts it on drop
pub struct RefreshHandle {
    handle: JoinHandle<()>,
}

impl RefreshHandle {
    pub fn stop(self) {
        self.handle.abort();
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::LedgerState;
    use bonding_clock::ManualClock;

    fn cache() -> (SyncCache<LedgerState, ManualClock>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::starting_now());
        let cache = SyncCache::new(
            Arc::new(LedgerState::new()),
            clock.clone(),
            Duration::from_secs(10),
        )
        .unwrap();
        (cache, clock)
    }

    #[test]
    fn test_zero_interval_rejected() {
        let result = SyncCache::new(
            Arc::new(LedgerState::new()),
            Arc::new(ManualClock::starting_now()),
            Duration::ZERO,
        );
        assert!(matches!(
            result,
            Err(crate::error::MarketError::Config(ConfigError::InvalidSync(_)))
        ));
    }

    #[tokio::test]
    async fn test_first_read_loads_snapshot() {
        let (cache, _) = cache();
        assert!(cache.peek().is_none());

        let (supply, age) = cache.get_cached_supply().await.unwrap();
        assert_eq!(supply, Amount::ZERO);
        assert_eq!(age, chrono::Duration::zero());
        assert!(cache.peek().is_some());
    }

    #[tokio::test]
    async fn test_age_grows_until_interval() {
        let (cache, clock) = cache();
        cache.get_cached_supply().await;

        clock.advance(chrono::Duration::seconds(4));
        let (_, age) = cache.get_cached_supply().await.unwrap();
        assert_eq!(age, chrono::Duration::seconds(4));

        clock.advance(chrono::Duration::seconds(6));
        let (_, age) = cache.get_cached_supply().await.unwrap();
        assert_eq!(age, chrono::Duration::zero());
    }

    #[tokio::test]
    async fn test_invalidate_forces_refresh() {
        let (cache, clock) = cache();
        cache.get_cached_supply().await;
        clock.advance(chrono::Duration::seconds(3));

        cache.invalidate();
        let (_, age) = cache.get_cached_supply().await.unwrap();
        assert_eq!(age, chrono::Duration::zero());
    }
}
