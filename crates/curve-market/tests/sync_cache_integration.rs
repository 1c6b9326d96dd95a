//! Supply cache integration tests
//!
//! Uses scripted snapshot sources and a manual clock to check:
//! 1. Read-through loading and age-based refresh
//! 2. Failed or slow refreshes keep the previous snapshot
//! 3. Invalidation, including while a refresh is in flight
//! 4. The background refresher and its shutdown

use async_trait::async_trait;
use bonding_clock::ManualClock;
use bonding_core::Amount;
use bonding_ports::{LedgerSnapshot, SnapshotSource, SourceError, SourceResult};
use curve_market::SyncCache;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Notify;

/// Source returning a settable supply, optionally failing
#[derive(Default)]
struct ScriptedSource {
    supply: Mutex<Amount>,
    failing: AtomicBool,
    fetches: AtomicUsize,
    delay: Option<Duration>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedSource {
    fn set_supply(&self, supply: Amount) {
        *self.supply.lock() = supply;
    }

    fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SnapshotSource for ScriptedSource {
    async fn fetch_snapshot(&self) -> SourceResult<LedgerSnapshot> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let supply = *self.supply.lock();

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(SourceError::Unavailable("scripted failure".to_string()));
        }

        Ok(LedgerSnapshot {
            supply,
            reserve: Amount::ZERO,
            holders: 0,
        })
    }

    fn name(&self) -> &str {
        "ScriptedSource"
    }
}

type Fixture = (
    Arc<SyncCache<ScriptedSource, ManualClock>>,
    Arc<ScriptedSource>,
    Arc<ManualClock>,
);

fn setup(source: ScriptedSource) -> Fixture {
    let _ = env_logger::try_init();

    let source = Arc::new(source);
    let clock = Arc::new(ManualClock::starting_now());
    let cache = Arc::new(
        SyncCache::new(source.clone(), clock.clone(), Duration::from_secs(10)).unwrap(),
    );
    (cache, source, clock)
}

#[tokio::test]
async fn test_reads_within_interval_hit_cache() {
    let (cache, source, clock) = setup(ScriptedSource::default());
    source.set_supply(Amount::from_whole(7));

    for _ in 0..5 {
        let (supply, _) = cache.get_cached_supply().await.unwrap();
        assert_eq!(supply, Amount::from_whole(7));
        clock.advance(chrono::Duration::seconds(1));
    }
    assert_eq!(source.fetches(), 1);

    source.set_supply(Amount::from_whole(9));
    clock.advance(chrono::Duration::seconds(5));
    let (supply, age) = cache.get_cached_supply().await.unwrap();
    assert_eq!(supply, Amount::from_whole(9));
    assert_eq!(age, chrono::Duration::zero());
    assert_eq!(source.fetches(), 2);
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_snapshot() {
    let (cache, source, clock) = setup(ScriptedSource::default());
    source.set_supply(Amount::from_whole(3));
    cache.get_cached_supply().await.unwrap();

    source.set_failing(true);
    source.set_supply(Amount::from_whole(4));
    clock.advance(chrono::Duration::seconds(11));

    let (supply, age) = cache.get_cached_supply().await.unwrap();
    assert_eq!(supply, Amount::from_whole(3));
    assert_eq!(age, chrono::Duration::seconds(11));
    assert!(matches!(
        cache.refresh().await,
        Err(SourceError::Unavailable(_))
    ));

    source.set_failing(false);
    let (supply, _) = cache.get_cached_supply().await.unwrap();
    assert_eq!(supply, Amount::from_whole(4));
}

#[tokio::test]
async fn test_nothing_cached_when_source_never_answers() {
    let (cache, source, _) = setup(ScriptedSource::default());
    source.set_failing(true);

    assert!(cache.get_cached_supply().await.is_none());
    assert!(cache.peek().is_none());
}

#[tokio::test]
async fn test_invalidate_forces_next_read_to_fetch() {
    let (cache, source, _) = setup(ScriptedSource::default());
    cache.get_cached_supply().await.unwrap();

    source.set_supply(Amount::from_whole(2));
    cache.invalidate();
    let (supply, _) = cache.get_cached_supply().await.unwrap();

    assert_eq!(supply, Amount::from_whole(2));
    assert_eq!(source.fetches(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_slow_source_times_out() {
    let _ = env_logger::try_init();
    let source = Arc::new(ScriptedSource {
        delay: Some(Duration::from_secs(30)),
        ..Default::default()
    });
    let cache = SyncCache::new(
        source.clone(),
        Arc::new(ManualClock::starting_now()),
        Duration::from_secs(10),
    )
    .unwrap()
    .with_fetch_timeout(Duration::from_millis(250));

    assert_eq!(cache.refresh().await, Err(SourceError::Timeout(250)));
    assert!(cache.peek().is_none());
}

#[tokio::test]
async fn test_invalidate_during_refresh_keeps_cache_stale() {
    let gate = Arc::new(Notify::new());
    let (cache, source, _) = setup(ScriptedSource {
        gate: Some(gate.clone()),
        ..Default::default()
    });
    source.set_supply(Amount::from_whole(1));

    let in_flight = {
        let cache = cache.clone();
        tokio::spawn(async move { cache.refresh().await })
    };
    while source.fetches() == 0 {
        tokio::task::yield_now().await;
    }

    // A trade lands after the source was read
    source.set_supply(Amount::from_whole(2));
    cache.invalidate();
    gate.notify_one();
    in_flight.await.unwrap().unwrap();
    assert_eq!(cache.peek().unwrap().supply, Amount::from_whole(1));

    // The pre-trade snapshot is not trusted; the next read fetches again
    gate.notify_one();
    let (supply, _) = cache.get_cached_supply().await.unwrap();
    assert_eq!(supply, Amount::from_whole(2));
    assert_eq!(source.fetches(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_background_refresher_runs_until_dropped() {
    let (cache, source, _) = setup(ScriptedSource::default());

    let handle = cache.spawn_refresher();
    assert!(handle.is_running());

    // Ticks at 0s, 10s and 20s
    tokio::time::sleep(Duration::from_secs(25)).await;
    assert_eq!(source.fetches(), 3);
    assert!(cache.peek().is_some());

    drop(handle);
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(source.fetches(), 3);
}
