//! Export timestamps.
//!
//! Exported filenames carry a millisecond wall-clock stamp. Two exports
//! issued within the same millisecond would otherwise collide, so stamps
//! handed out by an [`ExportClock`] are strictly increasing.

use std::sync::atomic::{AtomicI64, Ordering};

/// A source of strictly increasing millisecond timestamps.
#[derive(Debug, Default)]
pub struct ExportClock {
    last_ms: AtomicI64,
}

static PROCESS_CLOCK: ExportClock = ExportClock::new();

impl ExportClock {
    /// Create a clock with no stamps issued yet.
    pub const fn new() -> Self {
        Self {
            last_ms: AtomicI64::new(0),
        }
    }

    /// The clock shared by the whole process.
    pub fn process() -> &'static ExportClock {
        &PROCESS_CLOCK
    }

    /// Next stamp: current Unix time in milliseconds, bumped past the
    /// previously issued stamp when the wall clock has not advanced.
    pub fn next_stamp(&self) -> i64 {
        self.next_stamp_at(chrono::Utc::now().timestamp_millis())
    }

    fn next_stamp_at(&self, now_ms: i64) -> i64 {
        let mut issued = now_ms;
        // fetch_update only fails when the closure returns None.
        let _ = self
            .last_ms
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                issued = now_ms.max(last + 1);
                Some(issued)
            });
        issued
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stamps_follow_wall_clock() {
        let clock = ExportClock::new();
        assert_eq!(clock.next_stamp_at(1_000), 1_000);
        assert_eq!(clock.next_stamp_at(5_000), 5_000);
    }

    #[test]
    fn test_same_millisecond_is_bumped() {
        let clock = ExportClock::new();
        assert_eq!(clock.next_stamp_at(1_000), 1_000);
        assert_eq!(clock.next_stamp_at(1_000), 1_001);
        // Wall clock moving backwards never repeats a stamp either.
        assert_eq!(clock.next_stamp_at(900), 1_002);
    }

    #[test]
    fn test_process_clock_is_monotonic() {
        let clock = ExportClock::process();
        let a = clock.next_stamp();
        let b = clock.next_stamp();
        assert!(b > a);
    }
}
