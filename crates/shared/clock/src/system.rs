use bonding_core::Timestamp;
use bonding_ports::Clock;
use chrono::Utc;

/// Wall-clock time for the running market
///
/// Stamps trade receipts and journal entries, and measures supply cache ages
/// against the configured refresh interval.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    pub const fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }

    fn name(&self) -> &str {
        "SystemClock"
    }
}
