//! Relative day labels between a zone's date and the viewer's date

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};

use crate::LocalTimeFormatter;

/// Where a zone's calendar date sits relative to the viewer's own
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DayContext {
    Tomorrow,
    Yesterday,
    /// Two or more days ahead
    DaysAhead(u32),
    /// Two or more days behind
    DaysBehind(u32),
}

impl DayContext {
    /// Map a whole-day difference to a label. Zero days has no label.
    pub fn from_day_difference(days: i64) -> Option<Self> {
        let magnitude = u32::try_from(days.unsigned_abs()).unwrap_or(u32::MAX);
        match days {
            0 => None,
            1 => Some(DayContext::Tomorrow),
            -1 => Some(DayContext::Yesterday),
            d if d > 1 => Some(DayContext::DaysAhead(magnitude)),
            _ => Some(DayContext::DaysBehind(magnitude)),
        }
    }

    /// Signed day difference this label stands for
    pub fn days(self) -> i64 {
        match self {
            DayContext::Tomorrow => 1,
            DayContext::Yesterday => -1,
            DayContext::DaysAhead(n) => i64::from(n),
            DayContext::DaysBehind(n) => -i64::from(n),
        }
    }
}

impl fmt::Display for DayContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayContext::Tomorrow => f.write_str("Tomorrow"),
            DayContext::Yesterday => f.write_str("Yesterday"),
            DayContext::DaysAhead(n) => write!(f, "+{n} Days"),
            DayContext::DaysBehind(n) => write!(f, "-{n} Days"),
        }
    }
}

/// Compares zone-local calendar dates against the viewer's date.
///
/// The difference is taken between calendar dates, never by dividing a
/// millisecond span, so it stays exact across DST shifts and month or year
/// boundaries.
#[derive(Clone, Debug)]
pub struct DayContextResolver<F> {
    formatter: F,
}

impl<F: LocalTimeFormatter> DayContextResolver<F> {
    pub fn new(formatter: F) -> Self {
        DayContextResolver { formatter }
    }

    /// Label for `zone_id` at `effective`, measured against the viewer's date
    /// at `real_now` (real time, not the offset instant).
    pub fn resolve(
        &self,
        effective: DateTime<Utc>,
        zone_id: &str,
        real_now: DateTime<Utc>,
    ) -> Option<DayContext> {
        let viewer_date = self.viewer_date(real_now)?;
        self.resolve_against(effective, zone_id, viewer_date)
    }

    /// Label for `zone_id` at `effective` against an explicit viewer date
    pub fn resolve_against(
        &self,
        effective: DateTime<Utc>,
        zone_id: &str,
        viewer_date: NaiveDate,
    ) -> Option<DayContext> {
        let zone_date = self.formatter.local_time(effective, zone_id).ok()?.date();
        DayContext::from_day_difference(zone_date.signed_duration_since(viewer_date).num_days())
    }

    /// The viewer's calendar date at `real_now`
    pub fn viewer_date(&self, real_now: DateTime<Utc>) -> Option<NaiveDate> {
        self.formatter
            .viewer_local_time(real_now)
            .ok()
            .map(|local| local.date())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TzFormatter;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_day_difference_mapping() {
        assert_eq!(DayContext::from_day_difference(0), None);
        assert_eq!(DayContext::from_day_difference(1), Some(DayContext::Tomorrow));
        assert_eq!(DayContext::from_day_difference(-1), Some(DayContext::Yesterday));
        assert_eq!(DayContext::from_day_difference(3), Some(DayContext::DaysAhead(3)));
        assert_eq!(DayContext::from_day_difference(-2), Some(DayContext::DaysBehind(2)));
    }

    #[test]
    fn test_labels() {
        assert_eq!(DayContext::Tomorrow.to_string(), "Tomorrow");
        assert_eq!(DayContext::Yesterday.to_string(), "Yesterday");
        assert_eq!(DayContext::DaysAhead(2).to_string(), "+2 Days");
        assert_eq!(DayContext::DaysBehind(4).to_string(), "-4 Days");
    }

    #[test]
    fn test_same_date_far_apart_in_hours() {
        // Honolulu and Kiritimati share a wall clock but sit a calendar day apart
        let resolver = DayContextResolver::new(TzFormatter::new("Pacific/Honolulu"));
        let now = utc(2024, 7, 10, 10, 30); // 00:30 in Honolulu, Jul 10

        assert_eq!(resolver.resolve(now, "Pacific/Honolulu", now), None);
        assert_eq!(
            resolver.resolve(now, "Pacific/Kiritimati", now),
            Some(DayContext::Tomorrow)
        );
        // 22:30 Jul 10 in Auckland
        assert_eq!(resolver.resolve(now, "Pacific/Auckland", now), None);
    }

    #[test]
    fn test_midnight_crossing_uses_calendar_dates() {
        // Viewer at 23:58 local, zone at 00:02 local: only four minutes apart
        // but a different calendar date.
        let resolver = DayContextResolver::new(TzFormatter::new("UTC"));
        let now = utc(2024, 12, 31, 23, 58);
        let effective = utc(2025, 1, 1, 0, 2);

        assert_eq!(resolver.resolve(effective, "UTC", now), Some(DayContext::Tomorrow));
        assert_eq!(resolver.resolve(now, "UTC", now), None);
    }

    #[test]
    fn test_multi_day_offsets_across_month_end() {
        let resolver = DayContextResolver::new(TzFormatter::new("UTC"));
        let now = utc(2024, 2, 28, 12, 0);

        let ahead = utc(2024, 3, 2, 12, 0);
        assert_eq!(resolver.resolve(ahead, "UTC", now), Some(DayContext::DaysAhead(3)));

        let behind = utc(2024, 2, 25, 12, 0);
        assert_eq!(resolver.resolve(behind, "UTC", now), Some(DayContext::DaysBehind(3)));
    }

    #[test]
    fn test_across_dst_change() {
        // 23 hours of wall time separate these two New York dates
        let resolver = DayContextResolver::new(TzFormatter::new("America/New_York"));
        let now = utc(2024, 3, 10, 4, 30); // 23:30 EST, Mar 9
        let effective = utc(2024, 3, 11, 3, 30); // 23:30 EDT, Mar 10

        assert_eq!(
            resolver.resolve(effective, "America/New_York", now),
            Some(DayContext::Tomorrow)
        );
    }

    #[test]
    fn test_unknown_zone_has_no_context() {
        let resolver = DayContextResolver::new(TzFormatter::new("UTC"));
        let now = utc(2024, 1, 1, 0, 0);

        assert_eq!(resolver.resolve(now, "Not/AZone", now), None);
    }

    #[test]
    fn test_days_round_trip() {
        for days in [-5i64, -1, 1, 7] {
            let ctx = DayContext::from_day_difference(days).unwrap();
            assert_eq!(ctx.days(), days);
        }
    }
}
