//! Zone entries and the values the dashboard is configured with

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::EntryId;

/// Zone id used when the viewer's own zone cannot be detected
pub const UTC_ZONE: &str = "UTC";

/// Label given to entries added without a known country
pub const INTERNATIONAL_LABEL: &str = "International";

/// Country given to fallback results whose zone id has no region segment
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// A configured clock. Identity is `id`.
///
/// Field names on the wire match the snapshot format written by earlier
/// releases (`name`, `zoneName`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeZoneEntry {
    pub id: EntryId,
    #[serde(rename = "name")]
    pub label: String,
    #[serde(rename = "zoneName")]
    pub zone_id: String,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl TimeZoneEntry {
    pub fn new(
        id: impl Into<EntryId>,
        label: impl Into<String>,
        zone_id: impl Into<String>,
        city: impl Into<String>,
    ) -> Self {
        TimeZoneEntry {
            id: id.into(),
            label: label.into(),
            zone_id: zone_id.into(),
            city: city.into(),
            country: None,
        }
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Build an entry for a resolved search result under a fresh id
    pub fn from_search_result(id: EntryId, result: &SearchResult) -> Self {
        let label = if result.country.trim().is_empty() {
            INTERNATIONAL_LABEL.to_string()
        } else {
            result.country.clone()
        };

        TimeZoneEntry {
            id,
            label,
            zone_id: result.zone_id.clone(),
            city: result.city.clone(),
            country: Some(result.country.clone()).filter(|c| !c.trim().is_empty()),
        }
    }
}

/// A zone picked from the catalog, with the place names shown for it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "zoneName")]
    pub zone_id: String,
    pub city: String,
    pub country: String,
}

impl SearchResult {
    /// Derive place names from the zone id alone.
    ///
    /// City is the last `/` segment with underscores turned into spaces,
    /// country is the first segment.
    pub fn from_zone_id(zone_id: &str) -> Self {
        SearchResult {
            zone_id: zone_id.to_string(),
            city: display_city(zone_id),
            country: zone_id
                .split('/')
                .next()
                .filter(|s| !s.is_empty())
                .unwrap_or(UNKNOWN_COUNTRY)
                .to_string(),
        }
    }
}

/// Human-readable city for a zone id ("America/Argentina/Buenos_Aires" -> "Buenos Aires")
pub fn display_city(zone_id: &str) -> String {
    let last = zone_id
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or(zone_id);
    last.replace('_', " ")
}

/// Clock display format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeFormat {
    #[default]
    #[serde(rename = "12h")]
    H12,
    #[serde(rename = "24h")]
    H24,
}

impl TimeFormat {
    #[inline]
    pub fn is_twelve_hour(self) -> bool {
        matches!(self, TimeFormat::H12)
    }
}

impl fmt::Display for TimeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeFormat::H12 => f.write_str("12h"),
            TimeFormat::H24 => f.write_str("24h"),
        }
    }
}

/// The viewer's own IANA zone, or UTC when the platform does not report one
pub fn detect_viewer_zone() -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|_| UTC_ZONE.to_string())
}

/// Zones shown on a cold start with no saved state
pub fn default_zones(viewer_zone: &str) -> Vec<TimeZoneEntry> {
    vec![
        TimeZoneEntry::new("local", "Local Time", viewer_zone, "Current Location"),
        TimeZoneEntry::new("utc", "Universal Coordinated Time", UTC_ZONE, "UTC"),
        TimeZoneEntry::new("ny", "Eastern Time", "America/New_York", "New York"),
        TimeZoneEntry::new("ldn", "Greenwich Mean Time", "Europe/London", "London"),
        TimeZoneEntry::new("tk", "Japan Standard Time", "Asia/Tokyo", "Tokyo"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_from_nested_zone_id() {
        let result = SearchResult::from_zone_id("America/Argentina/Buenos_Aires");

        assert_eq!(result.zone_id, "America/Argentina/Buenos_Aires");
        assert_eq!(result.city, "Buenos Aires");
        assert_eq!(result.country, "America");
    }

    #[test]
    fn test_fallback_from_bare_zone_id() {
        let result = SearchResult::from_zone_id("UTC");

        assert_eq!(result.city, "UTC");
        assert_eq!(result.country, "UTC");
    }

    #[test]
    fn test_fallback_from_empty_zone_id() {
        let result = SearchResult::from_zone_id("");

        assert_eq!(result.city, "");
        assert_eq!(result.country, UNKNOWN_COUNTRY);
    }

    #[test]
    fn test_entry_from_result_without_country() {
        let result = SearchResult {
            zone_id: "Etc/GMT+3".into(),
            city: "GMT+3".into(),
            country: String::new(),
        };
        let entry = TimeZoneEntry::from_search_result(EntryId::new("abc"), &result);

        assert_eq!(entry.label, INTERNATIONAL_LABEL);
        assert_eq!(entry.country, None);
    }

    #[test]
    fn test_entry_wire_field_names() {
        let entry = TimeZoneEntry::new("ny", "Eastern Time", "America/New_York", "New York");
        let json = serde_json::to_string(&entry).unwrap();

        assert_eq!(
            json,
            r#"{"id":"ny","name":"Eastern Time","zoneName":"America/New_York","city":"New York"}"#
        );
    }

    proptest::proptest! {
        #[test]
        fn test_fallback_city_has_no_underscores(zone in "[A-Za-z_]{1,12}(/[A-Za-z_]{1,12}){0,2}") {
            let result = SearchResult::from_zone_id(&zone);
            proptest::prop_assert!(!result.city.contains('_'));
            proptest::prop_assert_eq!(result.country.as_str(), zone.split('/').next().unwrap());
        }
    }

    #[test]
    fn test_default_zones_lead_with_viewer() {
        let zones = default_zones("Europe/Paris");

        assert_eq!(zones.len(), 5);
        assert_eq!(zones[0].zone_id, "Europe/Paris");
        assert_eq!(zones[1].zone_id, UTC_ZONE);
    }
}
