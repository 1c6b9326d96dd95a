//! Bonding Clock Infrastructure
//!
//! Time sources behind the [`Clock`] port:
//!
//! - [`SystemClock`]: wall-clock time for the running market
//! - [`ManualClock`]: frozen time that only moves when told to, for
//!   deterministic receipts and cache-age tests
//!
//! ## Usage
//!
//! ```ignore
//! use bonding_clock::{Clock, ManualClock};
//! use chrono::Duration;
//!
//! let clock = ManualClock::new(start);
//! clock.advance(Duration::seconds(10));
//! assert_eq!(clock.now(), start + Duration::seconds(10));
//! ```

mod manual;
mod system;

pub use manual::ManualClock;
pub use system::SystemClock;

// Re-export the Clock trait for convenience
pub use bonding_ports::Clock;
