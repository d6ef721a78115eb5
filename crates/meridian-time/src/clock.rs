//! Offset clock - real time plus a user-controlled minute offset

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use meridian_core::serde_helpers::humantime_duration;
use meridian_core::{MeridianError, MeridianResult};

use crate::{SystemTimeSource, TimeSource};

/// Offset clock configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OffsetClockConfig {
    /// Offsets snap to multiples of this many minutes
    pub step_minutes: i32,
    /// Offsets are clamped to [-max, +max]
    pub max_offset_minutes: i32,
    /// How often real time is refreshed
    #[serde(with = "humantime_duration")]
    pub tick_interval: Duration,
}

impl Default for OffsetClockConfig {
    fn default() -> Self {
        // One day either side, half-hour steps
        OffsetClockConfig {
            step_minutes: 30,
            max_offset_minutes: 24 * 60,
            tick_interval: Duration::from_secs(1),
        }
    }
}

impl OffsetClockConfig {
    /// Configuration for planning a month ahead or behind
    pub fn extended() -> Self {
        OffsetClockConfig {
            step_minutes: 30,
            max_offset_minutes: 30 * 24 * 60,
            tick_interval: Duration::from_secs(1),
        }
    }

    /// Check the bound is a whole number of steps and the tick is non-zero
    pub fn validate(&self) -> MeridianResult<()> {
        if self.step_minutes <= 0 {
            return Err(MeridianError::InvalidConfig(format!(
                "step_minutes must be positive, got {}",
                self.step_minutes
            )));
        }
        if self.max_offset_minutes < 0 || self.max_offset_minutes % self.step_minutes != 0 {
            return Err(MeridianError::InvalidConfig(format!(
                "max_offset_minutes {} is not a non-negative multiple of {}",
                self.max_offset_minutes, self.step_minutes
            )));
        }
        if self.tick_interval.is_zero() {
            return Err(MeridianError::InvalidConfig(
                "tick_interval must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Snap to the nearest step (ties away from zero), then clamp to the bound
    pub fn snap(&self, minutes: i32) -> i32 {
        let step = i64::from(self.step_minutes.max(1));
        let max = i64::from(self.max_offset_minutes.max(0));
        let raw = i64::from(minutes);

        let snapped = raw.signum() * ((raw.abs() + step / 2) / step) * step;
        // max and -max both fit in i32
        snapped.clamp(-max, max) as i32
    }
}

/// Offset clock
///
/// Holds the last refreshed wall-clock instant and the user's offset.
/// Only `refresh` advances time; only the offset setters change the offset.
pub struct OffsetClock<S = SystemTimeSource> {
    /// Where real time comes from
    source: S,
    /// Wall-clock instant as of the last refresh
    now: DateTime<Utc>,
    /// User offset in minutes, always snapped and clamped
    offset_minutes: i32,
    /// User is dragging the offset control
    scrubbing: bool,
    /// Configuration
    config: OffsetClockConfig,
}

impl OffsetClock<SystemTimeSource> {
    /// Create a clock reading the system time
    pub fn new() -> Self {
        Self::with_source(SystemTimeSource, OffsetClockConfig::default())
    }
}

impl<S: TimeSource> OffsetClock<S> {
    /// Create a clock over an explicit time source
    pub fn with_source(source: S, config: OffsetClockConfig) -> Self {
        let now = source.now();
        OffsetClock {
            source,
            now,
            offset_minutes: 0,
            scrubbing: false,
            config,
        }
    }

    /// Re-read real time. Returns the new effective instant.
    pub fn refresh(&mut self) -> DateTime<Utc> {
        self.now = self.source.now();
        self.effective_instant()
    }

    /// Wall-clock instant as of the last refresh
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// `now + offset`: the moment every zone displays
    pub fn effective_instant(&self) -> DateTime<Utc> {
        let offset = chrono::Duration::minutes(i64::from(self.offset_minutes));
        self.now.checked_add_signed(offset).unwrap_or(self.now)
    }

    pub fn offset_minutes(&self) -> i32 {
        self.offset_minutes
    }

    /// Set the offset. Out-of-range values are clamped, not rejected.
    /// Returns the offset actually applied.
    pub fn set_offset(&mut self, minutes: i32) -> i32 {
        let applied = self.config.snap(minutes);
        if applied != self.offset_minutes {
            debug!(requested = minutes, applied, "offset changed");
        }
        self.offset_minutes = applied;
        applied
    }

    /// Set the offset from the current one
    pub fn update_offset<F>(&mut self, update: F) -> i32
    where
        F: FnOnce(i32) -> i32,
    {
        let next = update(self.offset_minutes);
        self.set_offset(next)
    }

    /// Return to the present. Idempotent.
    pub fn reset_offset(&mut self) {
        self.set_offset(0);
    }

    /// No time travel in effect
    pub fn is_present(&self) -> bool {
        self.offset_minutes == 0
    }

    pub fn set_scrubbing(&mut self, scrubbing: bool) {
        self.scrubbing = scrubbing;
    }

    pub fn is_scrubbing(&self) -> bool {
        self.scrubbing
    }

    pub fn config(&self) -> &OffsetClockConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

impl Default for OffsetClock<SystemTimeSource> {
    fn default() -> Self {
        Self::new()
    }
}
