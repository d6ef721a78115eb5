//! Local wall-clock formatting per IANA zone
//!
//! `LocalTimeFormatter` is the only place a zone id is resolved. Everything
//! downstream works with the `LocalTime` it returns, so a mock formatter can
//! stand in for the tz database when pinning DST edge cases.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Offset, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use meridian_core::{detect_viewer_zone, MeridianError, MeridianResult};

/// Local wall-clock reading of an instant in one zone
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LocalTime {
    /// Wall-clock date and time in the zone
    pub wall: NaiveDateTime,
    /// Offset from UTC in effect at that instant, in seconds
    pub utc_offset_seconds: i32,
}

impl LocalTime {
    /// Hour of day, 0..=23
    #[inline]
    pub fn hour(&self) -> u32 {
        self.wall.hour()
    }

    #[inline]
    pub fn minute(&self) -> u32 {
        self.wall.minute()
    }

    /// Calendar date in the zone
    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.wall.date()
    }

    /// Short UTC offset label: "GMT", "GMT-5", "GMT+5:30"
    pub fn gmt_offset_label(&self) -> String {
        gmt_offset_label(self.utc_offset_seconds)
    }

    /// Short weekday, month and day: "Mon, Jan 5"
    pub fn weekday_date_label(&self) -> String {
        self.wall.format("%a, %b %-d").to_string()
    }
}

/// Render a UTC offset in seconds as a short GMT label
pub fn gmt_offset_label(offset_seconds: i32) -> String {
    if offset_seconds == 0 {
        return "GMT".to_string();
    }

    let sign = if offset_seconds < 0 { '-' } else { '+' };
    let total = offset_seconds.unsigned_abs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;

    if minutes == 0 {
        format!("GMT{sign}{hours}")
    } else {
        format!("GMT{sign}{hours}:{minutes:02}")
    }
}

/// Resolves instants to local wall-clock time in named zones
pub trait LocalTimeFormatter: Send + Sync {
    /// Local time of `instant` in `zone_id`.
    ///
    /// Fails with `UnsupportedZoneId` when the zone cannot be resolved.
    fn local_time(&self, instant: DateTime<Utc>, zone_id: &str) -> MeridianResult<LocalTime>;

    /// IANA id of the viewer's own zone
    fn viewer_zone(&self) -> &str;

    /// Local time of `instant` in the viewer's own zone
    fn viewer_local_time(&self, instant: DateTime<Utc>) -> MeridianResult<LocalTime> {
        self.local_time(instant, self.viewer_zone())
    }
}

impl<T: LocalTimeFormatter + ?Sized> LocalTimeFormatter for Arc<T> {
    fn local_time(&self, instant: DateTime<Utc>, zone_id: &str) -> MeridianResult<LocalTime> {
        (**self).local_time(instant, zone_id)
    }

    fn viewer_zone(&self) -> &str {
        (**self).viewer_zone()
    }
}

impl<T: LocalTimeFormatter + ?Sized> LocalTimeFormatter for &T {
    fn local_time(&self, instant: DateTime<Utc>, zone_id: &str) -> MeridianResult<LocalTime> {
        (**self).local_time(instant, zone_id)
    }

    fn viewer_zone(&self) -> &str {
        (**self).viewer_zone()
    }
}

/// Formatter backed by the tz database bundled with `chrono-tz`
#[derive(Clone, Debug)]
pub struct TzFormatter {
    viewer_zone: String,
}

impl TzFormatter {
    /// Create a formatter for a viewer in `viewer_zone`
    pub fn new(viewer_zone: impl Into<String>) -> Self {
        TzFormatter {
            viewer_zone: viewer_zone.into(),
        }
    }

    /// Create a formatter for the zone the host reports
    pub fn detect() -> Self {
        Self::new(detect_viewer_zone())
    }

    fn resolve(zone_id: &str) -> MeridianResult<Tz> {
        zone_id
            .parse::<Tz>()
            .map_err(|_| MeridianError::UnsupportedZoneId(zone_id.to_string()))
    }
}

impl LocalTimeFormatter for TzFormatter {
    fn local_time(&self, instant: DateTime<Utc>, zone_id: &str) -> MeridianResult<LocalTime> {
        let tz = Self::resolve(zone_id)?;
        let local = tz.from_utc_datetime(&instant.naive_utc());

        Ok(LocalTime {
            wall: local.naive_local(),
            utc_offset_seconds: local.offset().fix().local_minus_utc(),
        })
    }

    fn viewer_zone(&self) -> &str {
        &self.viewer_zone
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_gmt_offset_label_shapes() {
        assert_eq!(gmt_offset_label(0), "GMT");
        assert_eq!(gmt_offset_label(-5 * 3600), "GMT-5");
        assert_eq!(gmt_offset_label(5 * 3600 + 30 * 60), "GMT+5:30");
        assert_eq!(gmt_offset_label(-(9 * 3600 + 30 * 60)), "GMT-9:30");
        assert_eq!(gmt_offset_label(5 * 3600 + 45 * 60), "GMT+5:45");
    }

    #[test]
    fn test_tz_formatter_local_wall_clock() {
        let formatter = TzFormatter::new("UTC");
        let local = formatter
            .local_time(utc(2024, 1, 15, 12, 0), "Asia/Tokyo")
            .unwrap();

        assert_eq!(local.hour(), 21);
        assert_eq!(local.utc_offset_seconds, 9 * 3600);
        assert_eq!(local.gmt_offset_label(), "GMT+9");
    }

    #[test]
    fn test_tz_formatter_tracks_dst() {
        let formatter = TzFormatter::new("UTC");

        let winter = formatter
            .local_time(utc(2024, 3, 10, 6, 59), "America/New_York")
            .unwrap();
        let summer = formatter
            .local_time(utc(2024, 3, 10, 7, 0), "America/New_York")
            .unwrap();

        assert_eq!(winter.gmt_offset_label(), "GMT-5");
        assert_eq!(winter.hour(), 1);
        assert_eq!(summer.gmt_offset_label(), "GMT-4");
        assert_eq!(summer.hour(), 3);
    }

    #[test]
    fn test_tz_formatter_rejects_unknown_zone() {
        let formatter = TzFormatter::new("UTC");
        let err = formatter
            .local_time(utc(2024, 1, 1, 0, 0), "Not/AZone")
            .unwrap_err();

        assert!(matches!(err, MeridianError::UnsupportedZoneId(z) if z == "Not/AZone"));
    }

    #[test]
    fn test_weekday_date_label() {
        let formatter = TzFormatter::new("UTC");
        let local = formatter
            .local_time(utc(2026, 1, 5, 10, 0), "Europe/London")
            .unwrap();

        assert_eq!(local.weekday_date_label(), "Mon, Jan 5");
    }

    #[test]
    fn test_viewer_local_time_uses_viewer_zone() {
        let formatter = TzFormatter::new("Australia/Sydney");
        let local = formatter.viewer_local_time(utc(2024, 6, 30, 20, 0)).unwrap();

        assert_eq!(local.date(), NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
    }
}
