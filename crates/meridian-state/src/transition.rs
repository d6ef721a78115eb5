//! Change detector - flags a zone for a short window when its minute changes
//!
//! The detector itself is timer-free. Each transition it starts carries a
//! generation number; the scheduler that owns the real timer hands the
//! ticket back to `clear`, and a ticket from an older transition is ignored.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use meridian_core::serde_helpers::humantime_duration;
use meridian_core::EntryId;

/// Transition highlighting configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    /// How long a zone stays flagged after its minute changes
    #[serde(with = "humantime_duration")]
    pub window: Duration,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        TransitionConfig {
            window: Duration::from_millis(300),
        }
    }
}

/// Per-zone transition state
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransitionState {
    pub last_rendered_minute: String,
    pub is_transitioning: bool,
    generation: u64,
}

/// Handle for clearing one specific transition
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TransitionTicket {
    pub zone: EntryId,
    pub generation: u64,
}

/// Tracks the last rendered minute of every zone
#[derive(Debug, Default)]
pub struct ChangeDetector {
    zones: HashMap<EntryId, TransitionState>,
    next_generation: u64,
}

impl ChangeDetector {
    pub fn new() -> Self {
        ChangeDetector::default()
    }

    /// Record the minute just rendered for `zone`.
    ///
    /// Starts a transition when a previous minute exists and differs, and
    /// returns the ticket that ends it. The first render never transitions.
    pub fn observe(&mut self, zone: &EntryId, minute: &str) -> Option<TransitionTicket> {
        let fired = match self.zones.get(zone) {
            Some(state) => state.last_rendered_minute != minute,
            None => false,
        };

        let generation = if fired {
            self.next_generation += 1;
            self.next_generation
        } else {
            0
        };

        let state = self.zones.entry(zone.clone()).or_default();
        state.last_rendered_minute = minute.to_string();
        if !fired {
            return None;
        }

        state.is_transitioning = true;
        state.generation = generation;
        Some(TransitionTicket {
            zone: zone.clone(),
            generation,
        })
    }

    /// End the transition `ticket` started. Returns false for a stale ticket.
    pub fn clear(&mut self, ticket: &TransitionTicket) -> bool {
        match self.zones.get_mut(&ticket.zone) {
            Some(state) if state.is_transitioning && state.generation == ticket.generation => {
                state.is_transitioning = false;
                true
            }
            _ => false,
        }
    }

    pub fn is_transitioning(&self, zone: &EntryId) -> bool {
        self.zones
            .get(zone)
            .map(|s| s.is_transitioning)
            .unwrap_or(false)
    }

    pub fn state(&self, zone: &EntryId) -> Option<&TransitionState> {
        self.zones.get(zone)
    }

    /// Drop all state for a zone that left the dashboard
    pub fn forget(&mut self, zone: &EntryId) {
        self.zones.remove(zone);
    }

    /// Drop state for zones not in `keep`
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&EntryId) -> bool,
    {
        self.zones.retain(|zone, _| keep(zone));
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}
