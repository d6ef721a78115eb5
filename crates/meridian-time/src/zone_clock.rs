//! Zone Clock - derives everything a clock card shows for one zone
//!
//! Derivation is total. An unresolvable zone id produces the fallback facts
//! instead of an error, and the zone stays on the dashboard showing them.

use chrono::{DateTime, Utc};
use tracing::warn;

use meridian_core::TimeFormat;

use crate::{DayContext, LocalTime, LocalTimeFormatter};

/// Local hour at which night ends
pub const NIGHT_END_HOUR: u32 = 6;
/// Local hour at which night starts
pub const NIGHT_START_HOUR: u32 = 19;
/// Sleeping window is [0, SLEEP_END_HOUR)
pub const SLEEP_END_HOUR: u32 = 6;
/// Work hours are [WORK_START_HOUR, WORK_END_HOUR)
pub const WORK_START_HOUR: u32 = 9;
pub const WORK_END_HOUR: u32 = 18;

const FALLBACK_DIGITS: &str = "00";

/// Night is before 06:00 or from 19:00 on
#[inline]
pub fn is_night(hour: u32) -> bool {
    hour < NIGHT_END_HOUR || hour >= NIGHT_START_HOUR
}

#[inline]
pub fn is_sleeping_window(hour: u32) -> bool {
    hour < SLEEP_END_HOUR
}

#[inline]
pub fn is_work_hours_window(hour: u32) -> bool {
    (WORK_START_HOUR..WORK_END_HOUR).contains(&hour)
}

/// Display facts for one zone at one effective instant
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZoneDisplayFacts {
    pub hour_digits: String,
    pub minute_digits: String,
    /// "AM"/"PM" in 12-hour format, empty in 24-hour format
    pub day_period: String,
    pub is_night: bool,
    pub is_sleeping_window: bool,
    pub is_work_hours_window: bool,
    pub gmt_offset_label: String,
    pub weekday_date_label: String,
    pub day_context: Option<DayContext>,
}

impl ZoneDisplayFacts {
    /// Placeholder facts for a zone that cannot be resolved
    pub fn fallback() -> Self {
        ZoneDisplayFacts {
            hour_digits: FALLBACK_DIGITS.to_string(),
            minute_digits: FALLBACK_DIGITS.to_string(),
            day_period: String::new(),
            is_night: false,
            is_sleeping_window: false,
            is_work_hours_window: false,
            gmt_offset_label: String::new(),
            weekday_date_label: String::new(),
            day_context: None,
        }
    }

    /// Facts for a resolved local time
    pub fn from_local(local: &LocalTime, format: TimeFormat) -> Self {
        let hour = local.hour();
        let (hour_digits, day_period) = match format {
            TimeFormat::H12 => {
                let twelve = match hour % 12 {
                    0 => 12,
                    h => h,
                };
                let period = if hour < 12 { "AM" } else { "PM" };
                (twelve.to_string(), period.to_string())
            }
            TimeFormat::H24 => (format!("{hour:02}"), String::new()),
        };

        ZoneDisplayFacts {
            hour_digits,
            minute_digits: format!("{:02}", local.minute()),
            day_period,
            is_night: is_night(hour),
            is_sleeping_window: is_sleeping_window(hour),
            is_work_hours_window: is_work_hours_window(hour),
            gmt_offset_label: local.gmt_offset_label(),
            weekday_date_label: local.weekday_date_label(),
            day_context: None,
        }
    }

    /// Attach a relative day label
    pub fn with_day_context(mut self, day_context: Option<DayContext>) -> Self {
        self.day_context = day_context;
        self
    }

    /// Whether these are the placeholder facts of an unresolved zone
    pub fn is_fallback(&self) -> bool {
        self.gmt_offset_label.is_empty() && self.weekday_date_label.is_empty()
    }
}

/// Derives display facts through a `LocalTimeFormatter`
#[derive(Clone, Debug)]
pub struct ZoneClock<F> {
    formatter: F,
}

impl<F: LocalTimeFormatter> ZoneClock<F> {
    pub fn new(formatter: F) -> Self {
        ZoneClock { formatter }
    }

    /// Derive the facts for `zone_id` at `effective`
    pub fn derive_facts(
        &self,
        effective: DateTime<Utc>,
        zone_id: &str,
        format: TimeFormat,
    ) -> ZoneDisplayFacts {
        match self.formatter.local_time(effective, zone_id) {
            Ok(local) => ZoneDisplayFacts::from_local(&local, format),
            Err(err) => {
                warn!(zone = zone_id, error = %err, "falling back to placeholder time");
                ZoneDisplayFacts::fallback()
            }
        }
    }

    pub fn formatter(&self) -> &F {
        &self.formatter
    }
}
