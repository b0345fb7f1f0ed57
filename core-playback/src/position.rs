//! # Position Tracking
//!
//! Continuous playback position derived from the engine's discrete
//! reports. Between reports the tracker extrapolates against a
//! monotonic clock while playback is active, and holds the last
//! reported value while paused.

use bridge_traits::Clock;
use parking_lot::RwLock;
use std::sync::Arc;

/// A single position report from the engine, stamped with the
/// monotonic time it was observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionSample {
    /// Reported position within the track, in milliseconds.
    pub position_ms: u32,
    /// Monotonic timestamp at which the report was taken.
    pub observed_at_ms: u64,
    /// Track the position belongs to, when the engine said so.
    pub track_id: Option<String>,
    /// Whether playback was advancing at the time of the report.
    pub playing: bool,
}

/// Tracks the current playback position from engine reports.
///
/// Each report wholly replaces the previous sample; there is no
/// smoothing or averaging across reports.
pub struct PositionTracker {
    clock: Arc<dyn Clock>,
    sample: RwLock<Option<PositionSample>>,
}

impl PositionTracker {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            sample: RwLock::new(None),
        }
    }

    /// Record a fresh engine report, replacing any previous sample.
    pub fn apply(&self, position_ms: u32, track_id: Option<String>, playing: bool) {
        let sample = PositionSample {
            position_ms,
            observed_at_ms: self.clock.monotonic_ms(),
            track_id,
            playing,
        };
        *self.sample.write() = Some(sample);
    }

    /// Update the position while keeping the previously reported track
    /// and play-state. Used for periodic time reports that carry only a
    /// position. Ignored when no sample exists: without a full report
    /// the play-state is unknown, so extrapolation must not start.
    pub fn apply_position_only(&self, position_ms: u32) {
        let mut guard = self.sample.write();
        let (track_id, playing) = match guard.as_ref() {
            Some(s) => (s.track_id.clone(), s.playing),
            None => return,
        };
        *guard = Some(PositionSample {
            position_ms,
            observed_at_ms: self.clock.monotonic_ms(),
            track_id,
            playing,
        });
    }

    /// The current position estimate in milliseconds.
    ///
    /// While playing, the elapsed monotonic time since the last report
    /// is added to the reported position. While paused the reported
    /// position is returned unchanged. `None` when no report has been
    /// received since construction or the last reset.
    pub fn current_ms(&self) -> Option<u32> {
        let guard = self.sample.read();
        let sample = guard.as_ref()?;
        if !sample.playing {
            return Some(sample.position_ms);
        }
        let elapsed = self.clock.monotonic_ms().saturating_sub(sample.observed_at_ms);
        let elapsed = u32::try_from(elapsed).unwrap_or(u32::MAX);
        Some(sample.position_ms.saturating_add(elapsed))
    }

    /// Discard the current sample, e.g. on track change or shutdown.
    pub fn reset(&self) {
        *self.sample.write() = None;
    }

    /// The last raw sample, without extrapolation.
    pub fn snapshot(&self) -> Option<PositionSample> {
        self.sample.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use std::sync::atomic::{AtomicU64, Ordering};

    struct MockClock {
        now_ms: AtomicU64,
    }

    impl MockClock {
        fn new(start_ms: u64) -> Arc<Self> {
            Arc::new(Self {
                now_ms: AtomicU64::new(start_ms),
            })
        }

        fn advance(&self, ms: u64) {
            self.now_ms.fetch_add(ms, Ordering::SeqCst);
        }
    }

    impl Clock for MockClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }

        fn monotonic_ms(&self) -> u64 {
            self.now_ms.load(Ordering::SeqCst)
        }
    }

    #[test]
    fn no_sample_yields_none() {
        let clock = MockClock::new(0);
        let tracker = PositionTracker::new(clock);
        assert_eq!(tracker.current_ms(), None);
    }

    #[test]
    fn extrapolates_while_playing() {
        let clock = MockClock::new(10_000);
        let tracker = PositionTracker::new(clock.clone());

        tracker.apply(1_000, Some("abc".into()), true);
        clock.advance(500);

        assert_eq!(tracker.current_ms(), Some(1_500));
    }

    #[test]
    fn holds_while_paused() {
        let clock = MockClock::new(10_000);
        let tracker = PositionTracker::new(clock.clone());

        tracker.apply(2_000, Some("abc".into()), false);
        clock.advance(5_000);

        assert_eq!(tracker.current_ms(), Some(2_000));
    }

    #[test]
    fn new_report_replaces_old() {
        let clock = MockClock::new(0);
        let tracker = PositionTracker::new(clock.clone());

        tracker.apply(1_000, Some("abc".into()), true);
        clock.advance(300);
        tracker.apply(5_000, Some("abc".into()), true);
        clock.advance(100);

        assert_eq!(tracker.current_ms(), Some(5_100));
    }

    #[test]
    fn position_only_keeps_track_and_state() {
        let clock = MockClock::new(0);
        let tracker = PositionTracker::new(clock.clone());

        tracker.apply(1_000, Some("abc".into()), false);
        tracker.apply_position_only(1_000);

        let sample = tracker.snapshot().unwrap();
        assert_eq!(sample.track_id.as_deref(), Some("abc"));
        assert!(!sample.playing);
        clock.advance(700);
        assert_eq!(tracker.current_ms(), Some(1_000));
    }

    #[test]
    fn position_only_without_sample_is_ignored() {
        let clock = MockClock::new(0);
        let tracker = PositionTracker::new(clock.clone());

        // Arrives right after a reset; play-state is unknown, so the
        // update must not fabricate a playing sample.
        tracker.apply_position_only(4_000);

        assert!(tracker.snapshot().is_none());
        clock.advance(700);
        assert_eq!(tracker.current_ms(), None);
    }

    #[test]
    fn reset_clears_sample() {
        let clock = MockClock::new(0);
        let tracker = PositionTracker::new(clock);

        tracker.apply(1_000, None, true);
        tracker.reset();

        assert_eq!(tracker.current_ms(), None);
        assert!(tracker.snapshot().is_none());
    }

    #[test]
    fn extrapolation_saturates() {
        let clock = MockClock::new(0);
        let tracker = PositionTracker::new(clock.clone());

        tracker.apply(u32::MAX - 10, None, true);
        clock.advance(1_000);

        assert_eq!(tracker.current_ms(), Some(u32::MAX));
    }
}
