//! External lookup collaborators and their fallbacks
//!
//! Lookups may fail in any way. Callers always get a usable value back:
//! zone lookups fall back to names derived from the zone id, insight
//! lookups to a fixed placeholder.

use async_trait::async_trait;
use tracing::warn;

use meridian_core::{MeridianError, MeridianResult, SearchResult};

/// Shown when the insight lookup fails
pub const INSIGHT_UNAVAILABLE: &str = "The stars are quiet today. No AI insights available.";

/// Shown when the insight lookup succeeds with nothing to say
pub const INSIGHT_EMPTY: &str = "No insights available for this location.";

/// Resolves a zone id to place names
#[async_trait]
pub trait ZoneLookup: Send + Sync {
    async fn lookup(&self, zone_id: &str) -> MeridianResult<SearchResult>;
}

/// Fetches free-text trivia about a place
#[async_trait]
pub trait InsightLookup: Send + Sync {
    async fn insight(&self, city: &str, zone_id: &str) -> MeridianResult<String>;
}

/// Zone lookup that never leaves the process
#[derive(Clone, Copy, Debug, Default)]
pub struct OfflineLookup;

#[async_trait]
impl ZoneLookup for OfflineLookup {
    async fn lookup(&self, zone_id: &str) -> MeridianResult<SearchResult> {
        Ok(SearchResult::from_zone_id(zone_id))
    }
}

/// Insight lookup with nothing to offer
#[derive(Clone, Copy, Debug, Default)]
pub struct NoInsights;

#[async_trait]
impl InsightLookup for NoInsights {
    async fn insight(&self, _city: &str, _zone_id: &str) -> MeridianResult<String> {
        Err(MeridianError::Lookup("insights disabled".to_string()))
    }
}

/// Look up `zone_id`, degrading to the id-derived names on any failure
pub async fn resolve_zone<L>(lookup: &L, zone_id: &str) -> SearchResult
where
    L: ZoneLookup + ?Sized,
{
    match lookup.lookup(zone_id).await {
        Ok(result) if !result.zone_id.is_empty() && !result.city.trim().is_empty() => result,
        Ok(_) => {
            warn!(zone = zone_id, "zone lookup returned no usable names, using fallback");
            SearchResult::from_zone_id(zone_id)
        }
        Err(e) => {
            warn!(zone = zone_id, error = %e, "zone lookup failed, using fallback");
            SearchResult::from_zone_id(zone_id)
        }
    }
}

/// Fetch an insight, substituting the placeholder text on failure
pub async fn insight_or_placeholder<L>(lookup: &L, city: &str, zone_id: &str) -> String
where
    L: InsightLookup + ?Sized,
{
    match lookup.insight(city, zone_id).await {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => INSIGHT_EMPTY.to_string(),
        Err(e) => {
            warn!(city, zone = zone_id, error = %e, "insight lookup failed");
            INSIGHT_UNAVAILABLE.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingLookup;

    #[async_trait]
    impl ZoneLookup for FailingLookup {
        async fn lookup(&self, _zone_id: &str) -> MeridianResult<SearchResult> {
            Err(MeridianError::Lookup("status 503".to_string()))
        }
    }

    struct EmptyLookup;

    #[async_trait]
    impl ZoneLookup for EmptyLookup {
        async fn lookup(&self, zone_id: &str) -> MeridianResult<SearchResult> {
            Ok(SearchResult {
                zone_id: zone_id.to_string(),
                city: String::new(),
                country: String::new(),
            })
        }
    }

    struct CannedLookup;

    #[async_trait]
    impl ZoneLookup for CannedLookup {
        async fn lookup(&self, zone_id: &str) -> MeridianResult<SearchResult> {
            Ok(SearchResult {
                zone_id: zone_id.to_string(),
                city: "Saigon".to_string(),
                country: "Vietnam".to_string(),
            })
        }
    }

    struct FixedInsight(&'static str);

    #[async_trait]
    impl InsightLookup for FixedInsight {
        async fn insight(&self, _city: &str, _zone_id: &str) -> MeridianResult<String> {
            Ok(self.0.to_string())
        }
    }

    #[tokio::test]
    async fn test_failed_lookup_uses_fallback() {
        let result = resolve_zone(&FailingLookup, "America/New_York").await;

        assert_eq!(result, SearchResult::from_zone_id("America/New_York"));
        assert_eq!(result.city, "New York");
        assert_eq!(result.country, "America");
    }

    #[tokio::test]
    async fn test_empty_lookup_uses_fallback() {
        let result = resolve_zone(&EmptyLookup, "Asia/Ho_Chi_Minh").await;
        assert_eq!(result.city, "Ho Chi Minh");
    }

    #[tokio::test]
    async fn test_successful_lookup_is_kept() {
        let result = resolve_zone(&CannedLookup, "Asia/Ho_Chi_Minh").await;

        assert_eq!(result.city, "Saigon");
        assert_eq!(result.country, "Vietnam");
    }

    #[tokio::test]
    async fn test_offline_lookup_matches_fallback() {
        let result = resolve_zone(&OfflineLookup, "Europe/Zurich").await;
        assert_eq!(result, SearchResult::from_zone_id("Europe/Zurich"));
    }

    #[tokio::test]
    async fn test_insight_placeholders() {
        assert_eq!(
            insight_or_placeholder(&NoInsights, "Tokyo", "Asia/Tokyo").await,
            INSIGHT_UNAVAILABLE
        );
        assert_eq!(
            insight_or_placeholder(&FixedInsight("  "), "Tokyo", "Asia/Tokyo").await,
            INSIGHT_EMPTY
        );
        assert_eq!(
            insight_or_placeholder(&FixedInsight("Cherry blossoms."), "Tokyo", "Asia/Tokyo").await,
            "Cherry blossoms."
        );
    }
}
