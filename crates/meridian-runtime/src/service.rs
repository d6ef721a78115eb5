//! Clock service - drives the offset clock once per tick interval

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use meridian_core::{MeridianError, MeridianResult};
use meridian_time::{OffsetClock, TimeSource};

/// What subscribers see after every refresh or offset change
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tick {
    /// Real wall-clock time
    pub now: DateTime<Utc>,
    /// Real time plus the user offset
    pub effective: DateTime<Utc>,
    pub offset_minutes: i32,
}

impl Tick {
    fn read<S: TimeSource>(clock: &OffsetClock<S>) -> Self {
        Tick {
            now: clock.now(),
            effective: clock.effective_instant(),
            offset_minutes: clock.offset_minutes(),
        }
    }
}

/// Owns the recurring refresh task for an `OffsetClock`.
///
/// At most one task runs at a time. `stop` and drop both cancel it.
pub struct ClockService<S> {
    clock: Arc<Mutex<OffsetClock<S>>>,
    ticks: Arc<watch::Sender<Tick>>,
    task: Option<JoinHandle<()>>,
}

impl<S: TimeSource + 'static> ClockService<S> {
    pub fn new(clock: OffsetClock<S>) -> Self {
        let (ticks, _) = watch::channel(Tick::read(&clock));
        ClockService {
            clock: Arc::new(Mutex::new(clock)),
            ticks: Arc::new(ticks),
            task: None,
        }
    }

    /// Start ticking. Returns false if already running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self) -> MeridianResult<bool> {
        if self.is_running() {
            return Ok(false);
        }

        let handle = Handle::try_current().map_err(|e| MeridianError::NoRuntime(e.to_string()))?;
        let clock = Arc::clone(&self.clock);
        let ticks = Arc::clone(&self.ticks);
        let period = clock.lock().config().tick_interval;

        self.task = Some(handle.spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                let tick = {
                    let mut clock = clock.lock();
                    clock.refresh();
                    Tick::read(&clock)
                };
                ticks.send_replace(tick);
            }
        }));

        info!(?period, "clock service started");
        Ok(true)
    }

    /// Stop ticking. Returns false if it was not running.
    pub fn stop(&mut self) -> bool {
        match self.task.take() {
            Some(task) => {
                task.abort();
                info!("clock service stopped");
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().map(|t| !t.is_finished()).unwrap_or(false)
    }

    /// Receive a `Tick` after every refresh and offset change
    pub fn subscribe(&self) -> watch::Receiver<Tick> {
        self.ticks.subscribe()
    }

    /// Latest published tick
    pub fn latest(&self) -> Tick {
        *self.ticks.borrow()
    }

    /// Read the clock
    pub fn with_clock<R>(&self, f: impl FnOnce(&OffsetClock<S>) -> R) -> R {
        f(&self.clock.lock())
    }

    /// Change the clock outside the ticker (offset, scrubbing) and publish
    pub fn update<R>(&self, f: impl FnOnce(&mut OffsetClock<S>) -> R) -> R {
        let (result, tick) = {
            let mut clock = self.clock.lock();
            let result = f(&mut clock);
            (result, Tick::read(&clock))
        };
        self.publish(tick);
        result
    }

    /// Refresh real time immediately, without waiting for the next tick
    pub fn refresh_now(&self) -> Tick {
        let tick = {
            let mut clock = self.clock.lock();
            clock.refresh();
            Tick::read(&clock)
        };
        self.publish(tick);
        tick
    }

    fn publish(&self, tick: Tick) {
        let previous = self.ticks.send_replace(tick);
        if previous != tick {
            debug!(effective = %tick.effective, offset = tick.offset_minutes, "tick published");
        }
    }
}

impl<S> Drop for ClockService<S> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use meridian_time::{ManualTimeSource, OffsetClockConfig};
    use std::time::Duration;

    fn service() -> (ManualTimeSource, ClockService<ManualTimeSource>) {
        let source = ManualTimeSource::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let clock = OffsetClock::with_source(source.clone(), OffsetClockConfig::default());
        (source, ClockService::new(clock))
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_refresh_clock() {
        let (source, mut service) = service();
        let mut rx = service.subscribe();

        assert!(service.start().unwrap());
        assert!(!service.start().unwrap());

        source.advance(Duration::from_secs(1));
        time::sleep(Duration::from_millis(1001)).await;
        rx.changed().await.unwrap();

        assert_eq!(rx.borrow().now, source.now());
        assert!(service.stop());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_ticker() {
        let (source, mut service) = service();
        service.start().unwrap();
        time::sleep(Duration::from_millis(10)).await;

        assert!(service.stop());
        assert!(!service.stop());
        assert!(!service.is_running());

        let frozen = service.latest();
        source.advance(Duration::from_secs(5));
        time::sleep(Duration::from_secs(5)).await;

        assert_eq!(service.latest(), frozen);
    }

    #[tokio::test]
    async fn test_update_publishes_offset() {
        let (_, service) = service();
        let mut rx = service.subscribe();

        service.update(|clock| clock.set_offset(120));
        rx.changed().await.unwrap();

        let tick = *rx.borrow();
        assert_eq!(tick.offset_minutes, 120);
        assert_eq!(tick.effective, tick.now + chrono::Duration::minutes(120));
    }

    #[test]
    fn test_start_outside_runtime_fails() {
        let (_, mut service) = service();
        assert!(matches!(service.start(), Err(MeridianError::NoRuntime(_))));
    }
}
