//! Selectable zone catalog and search

use chrono_tz::TZ_VARIANTS;

/// Maximum number of ids a search returns
pub const SEARCH_LIMIT: usize = 12;

/// Queries shorter than this list the head of the catalog instead of filtering
pub const MIN_QUERY_LEN: usize = 2;

/// Every IANA zone id the bundled tz database knows, in database order
pub fn catalog() -> impl Iterator<Item = &'static str> {
    TZ_VARIANTS.iter().map(|tz| tz.name())
}

/// Whether `zone_id` names a zone in the catalog
pub fn is_known_zone(zone_id: &str) -> bool {
    zone_id.parse::<chrono_tz::Tz>().is_ok()
}

/// Case-insensitive substring search over the catalog
pub fn search(query: &str) -> Vec<&'static str> {
    let query = query.trim();
    if query.chars().count() < MIN_QUERY_LEN {
        return catalog().take(SEARCH_LIMIT).collect();
    }

    let needle = query.to_lowercase();
    catalog()
        .filter(|zone| zone.to_lowercase().contains(&needle))
        .take(SEARCH_LIMIT)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_query_lists_catalog_head() {
        let head: Vec<_> = catalog().take(SEARCH_LIMIT).collect();

        assert_eq!(search(""), head);
        assert_eq!(search("a"), head);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let hits = search("tokyo");
        assert!(hits.contains(&"Asia/Tokyo"));
    }

    #[test]
    fn test_search_caps_results() {
        let hits = search("america");
        assert_eq!(hits.len(), SEARCH_LIMIT);
        assert!(hits.iter().all(|z| z.to_lowercase().contains("america")));
    }

    #[test]
    fn test_search_without_match() {
        assert!(search("zzzz").is_empty());
    }

    #[test]
    fn test_known_zone() {
        assert!(is_known_zone("Europe/Paris"));
        assert!(!is_known_zone("Not/AZone"));
    }
}
