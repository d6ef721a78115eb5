//! Zone registry - the ordered list of configured clocks
//!
//! Entries change only by append and by filtered removal. Every mutation is
//! followed by a write of the full ordered list. Writes are best effort: a
//! failed write is logged and the in-memory change stands.

use std::collections::HashSet;

use rand::Rng;
use tracing::{debug, warn};

use meridian_core::{EntryId, MeridianError, MeridianResult, SearchResult, TimeZoneEntry};

use crate::KeyValueStore;

/// Key the zone list is persisted under
pub const ZONES_KEY: &str = "meridian_zones";

/// Where the registry's initial entries came from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOrigin {
    /// Read back from the store
    Persisted,
    /// Nothing stored yet
    Defaults,
    /// Stored value was unreadable or malformed
    Recovered,
}

/// Ordered zone registry backed by a key-value store
pub struct ZoneRegistry<S> {
    store: S,
    key: String,
    entries: Vec<TimeZoneEntry>,
    origin: LoadOrigin,
}

impl<S: KeyValueStore> ZoneRegistry<S> {
    /// Load from `store` under the default key
    pub fn load(store: S, defaults: Vec<TimeZoneEntry>) -> Self {
        Self::load_with_key(store, ZONES_KEY, defaults)
    }

    /// Load from `store` under `key`, falling back to `defaults`
    pub fn load_with_key(store: S, key: impl Into<String>, defaults: Vec<TimeZoneEntry>) -> Self {
        let key = key.into();

        let (entries, origin) = match store.get(&key) {
            Ok(Some(text)) => match decode_entries(&text) {
                Ok(entries) => (dedup_ids(entries), LoadOrigin::Persisted),
                Err(e) => {
                    warn!(key = %key, error = %e, "malformed zone snapshot, using defaults");
                    (defaults, LoadOrigin::Recovered)
                }
            },
            Ok(None) => (defaults, LoadOrigin::Defaults),
            Err(e) => {
                warn!(key = %key, error = %e, "zone snapshot unreadable, using defaults");
                (defaults, LoadOrigin::Recovered)
            }
        };

        let registry = ZoneRegistry {
            store,
            key,
            entries,
            origin,
        };
        if origin != LoadOrigin::Persisted {
            registry.persist();
        }
        debug!(zones = registry.entries.len(), ?origin, "zone registry loaded");
        registry
    }

    /// Append an entry. An entry whose id is already present is ignored.
    /// Returns whether the entry was added.
    pub fn add(&mut self, entry: TimeZoneEntry) -> bool {
        if self.contains(&entry.id) {
            warn!(id = %entry.id, "zone id already registered, ignoring add");
            return false;
        }
        debug!(id = %entry.id, zone = %entry.zone_id, "zone added");
        self.entries.push(entry);
        self.persist();
        true
    }

    /// Append a new entry for a resolved search result under a fresh id
    pub fn add_result<R: Rng + ?Sized>(&mut self, result: &SearchResult, rng: &mut R) -> EntryId {
        let id = EntryId::generate_unique(rng, |candidate| self.contains(candidate));
        self.add(TimeZoneEntry::from_search_result(id.clone(), result));
        id
    }

    /// Remove the entry with `id`. Removing an unknown id changes nothing.
    pub fn remove(&mut self, id: &EntryId) -> Option<TimeZoneEntry> {
        let position = self.entries.iter().position(|e| &e.id == id);
        let removed = position.map(|i| self.entries.remove(i));
        if removed.is_some() {
            debug!(id = %id, "zone removed");
        }
        self.persist();
        removed
    }

    /// All entries in display order
    pub fn all(&self) -> &[TimeZoneEntry] {
        &self.entries
    }

    pub fn get(&self, id: &EntryId) -> Option<&TimeZoneEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    pub fn contains(&self, id: &EntryId) -> bool {
        self.entries.iter().any(|e| &e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn origin(&self) -> LoadOrigin {
        self.origin
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// JSON snapshot of the current list, as written to the store
    pub fn snapshot(&self) -> String {
        // Vec of plain structs with string fields cannot fail to encode
        serde_json::to_string(&self.entries).unwrap_or_else(|_| "[]".to_string())
    }

    fn persist(&self) {
        if let Err(e) = self.store.set(&self.key, &self.snapshot()) {
            warn!(key = %self.key, error = %e, "failed to persist zones");
        }
    }
}

fn decode_entries(text: &str) -> MeridianResult<Vec<TimeZoneEntry>> {
    serde_json::from_str(text).map_err(|e| MeridianError::MalformedPersistedState(e.to_string()))
}

/// Keep the first entry for each id
fn dedup_ids(entries: Vec<TimeZoneEntry>) -> Vec<TimeZoneEntry> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|e| seen.insert(e.id.clone()))
        .collect()
}
