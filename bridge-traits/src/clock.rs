//! Time Abstractions
//!
//! Provides an injectable time source for token issuance timestamps and
//! playback position extrapolation.
//!
//! Position estimates are deltas between observation times, so they must
//! come from a monotonic timeline; the wall clock can jump under NTP
//! corrections. [`Clock`] therefore exposes both: `now()` for wall-clock
//! timestamps (token issuance) and `monotonic_ms()` for interval math.

use chrono::{DateTime, Utc};
use std::time::Instant;

/// Time source trait
///
/// Abstracts system time to enable deterministic testing.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::clock::Clock;
///
/// fn stamp(clock: &dyn Clock) {
///     let issued_at = clock.now();
///     let observed_at = clock.monotonic_ms();
/// }
/// ```
pub trait Clock: Send + Sync {
    /// Get current UTC wall-clock time.
    fn now(&self) -> DateTime<Utc>;

    /// Milliseconds on a monotonic timeline. The origin is unspecified;
    /// only differences between readings are meaningful.
    fn monotonic_ms(&self) -> u64;
}

/// System clock implementation backed by `chrono` and `std::time::Instant`.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn monotonic_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_monotonic_advances() {
        let clock = SystemClock::new();
        let a = clock.monotonic_ms();
        let b = clock.monotonic_ms();
        assert!(b >= a);
    }

    #[test]
    fn system_clock_wall_time_is_current() {
        let clock = SystemClock::new();
        let now = clock.now();
        assert!(now.timestamp() > 0);
    }
}
