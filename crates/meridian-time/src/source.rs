//! Time sources for the offset clock
//!
//! The clock never reads the system time directly. It asks a `TimeSource`,
//! so tests can drive it with a fixed or stepped clock.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

/// Provides the current wall-clock instant
pub trait TimeSource: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// Reads the operating system clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock. Clones share the same instant.
#[derive(Clone, Debug)]
pub struct ManualTimeSource {
    current: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualTimeSource {
    pub fn new(start: DateTime<Utc>) -> Self {
        ManualTimeSource {
            current: Arc::new(Mutex::new(start)),
        }
    }

    /// Jump to an absolute instant
    pub fn set(&self, instant: DateTime<Utc>) {
        *self.current.lock() = instant;
    }

    /// Step forward by a duration
    pub fn advance(&self, by: Duration) {
        let mut current = self.current.lock();
        if let Ok(step) = chrono::Duration::from_std(by) {
            if let Some(next) = current.checked_add_signed(step) {
                *current = next;
            }
        }
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_manual_source_is_shared_between_clones() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let source = ManualTimeSource::new(start);
        let handle = source.clone();

        handle.advance(Duration::from_secs(90));

        assert_eq!(
            source.now(),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 1, 30).unwrap()
        );
    }

    #[test]
    fn test_system_source_moves_forward() {
        let source = SystemTimeSource;
        let t1 = source.now();
        std::thread::sleep(Duration::from_millis(5));
        let t2 = source.now();

        assert!(t2 >= t1);
    }
}
