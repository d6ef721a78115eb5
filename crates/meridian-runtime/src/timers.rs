//! Transition timers - one cancellable clear-timer per zone

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

use meridian_core::EntryId;
use meridian_state::{ChangeDetector, TransitionTicket};

struct Pending {
    generation: u64,
    task: JoinHandle<()>,
}

/// Schedules the end of each transition after a fixed window.
///
/// Scheduling a new transition for a zone aborts that zone's pending timer.
/// The detector also checks the ticket generation, so a timer that already
/// fired late cannot clear a newer transition.
pub struct TransitionTimers {
    detector: Arc<Mutex<ChangeDetector>>,
    pending: Arc<Mutex<HashMap<EntryId, Pending>>>,
    window: Duration,
}

impl TransitionTimers {
    pub fn new(detector: Arc<Mutex<ChangeDetector>>, window: Duration) -> Self {
        TransitionTimers {
            detector,
            pending: Arc::new(Mutex::new(HashMap::new())),
            window,
        }
    }

    /// Clear `ticket` once the window has elapsed.
    ///
    /// Outside a tokio runtime there is nothing to run the timer on, so the
    /// transition is cleared at once.
    pub fn schedule(&self, ticket: TransitionTicket) {
        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                self.detector.lock().clear(&ticket);
                return;
            }
        };

        let detector = Arc::clone(&self.detector);
        let pending = Arc::clone(&self.pending);
        let window = self.window;
        let zone = ticket.zone.clone();
        let generation = ticket.generation;

        let mut map = self.pending.lock();
        if let Some(previous) = map.remove(&zone) {
            previous.task.abort();
            debug!(zone = %zone, "replaced pending transition timer");
        }

        let task = handle.spawn(async move {
            tokio::time::sleep(window).await;
            detector.lock().clear(&ticket);
            let mut map = pending.lock();
            if map.get(&ticket.zone).map(|p| p.generation) == Some(ticket.generation) {
                map.remove(&ticket.zone);
            }
        });
        map.insert(zone, Pending { generation, task });
    }

    /// Cancel the pending timer of one zone, leaving its flag as is
    pub fn cancel(&self, zone: &EntryId) -> bool {
        match self.pending.lock().remove(zone) {
            Some(previous) => {
                previous.task.abort();
                true
            }
            None => false,
        }
    }

    /// Cancel every pending timer
    pub fn cancel_all(&self) {
        for (_, previous) in self.pending.lock().drain() {
            previous.task.abort();
        }
    }

    /// Zones with a timer still pending
    pub fn pending(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

impl Drop for TransitionTimers {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Arc<Mutex<ChangeDetector>>, TransitionTimers) {
        let detector = Arc::new(Mutex::new(ChangeDetector::new()));
        let timers = TransitionTimers::new(Arc::clone(&detector), Duration::from_millis(300));
        (detector, timers)
    }

    fn observe(detector: &Arc<Mutex<ChangeDetector>>, zone: &EntryId, minute: &str) -> Option<TransitionTicket> {
        detector.lock().observe(zone, minute)
    }

    #[tokio::test(start_paused = true)]
    async fn test_transition_clears_after_window() {
        let (detector, timers) = setup();
        let zone = EntryId::new("ny");

        for minute in ["09", "09", "10", "10"] {
            if let Some(ticket) = observe(&detector, &zone, minute) {
                timers.schedule(ticket);
            }
        }
        assert!(detector.lock().is_transitioning(&zone));
        assert_eq!(timers.pending(), 1);

        tokio::time::sleep(Duration::from_millis(299)).await;
        assert!(detector.lock().is_transitioning(&zone));

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(!detector.lock().is_transitioning(&zone));
        assert_eq!(timers.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_transition_survives_old_timer() {
        let (detector, timers) = setup();
        let zone = EntryId::new("ny");

        observe(&detector, &zone, "09");
        timers.schedule(observe(&detector, &zone, "10").unwrap());

        tokio::time::sleep(Duration::from_millis(200)).await;
        timers.schedule(observe(&detector, &zone, "11").unwrap());

        // First timer would have fired at 300ms
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(detector.lock().is_transitioning(&zone));

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!detector.lock().is_transitioning(&zone));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_all_stops_timers() {
        let (detector, timers) = setup();
        let zone = EntryId::new("ny");

        observe(&detector, &zone, "09");
        timers.schedule(observe(&detector, &zone, "10").unwrap());
        timers.cancel_all();

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(detector.lock().is_transitioning(&zone));
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn test_without_runtime_clears_immediately() {
        let (detector, timers) = setup();
        let zone = EntryId::new("ny");

        observe(&detector, &zone, "09");
        timers.schedule(observe(&detector, &zone, "10").unwrap());

        assert!(!detector.lock().is_transitioning(&zone));
    }
}
