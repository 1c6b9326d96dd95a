use bonding_core::Timestamp;

/// Port for time abstraction
///
/// Receipts and cache ages are stamped through this trait so that tests can
/// drive time explicitly:
/// - Real system time for production
/// - Manually advanced time for deterministic tests
pub trait Clock: Send + Sync {
    /// Get the current time according to this clock
    fn now(&self) -> Timestamp;

    /// Get the clock's name/identifier for debugging
    fn name(&self) -> &str {
        "Clock"
    }
}
