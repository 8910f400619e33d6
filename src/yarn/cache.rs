//! Expiring in-memory cache of parsed mapping entries

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::mapping::types::MappingEntry;

/// Shared, immutable entry list for one product version
pub type MappingSet = Arc<Vec<MappingEntry>>;

struct CacheEntry {
    entries: MappingSet,
    inserted_at: Instant,
}

/// Per product version map of parsed entries with write-based expiry
///
/// Expiry is checked lazily on read; there is no background sweep.
pub struct MappingCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl MappingCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    fn lock_entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Entries for a product version, if present and not expired
    pub fn get(&self, product_version: &str) -> Option<MappingSet> {
        self.get_at(product_version, Instant::now())
    }

    pub(crate) fn get_at(&self, product_version: &str, now: Instant) -> Option<MappingSet> {
        let mut entries = self.lock_entries();
        let expired = match entries.get(product_version) {
            None => return None,
            Some(entry) => now.saturating_duration_since(entry.inserted_at) >= self.ttl,
        };

        if expired {
            debug!("Cached mappings for {} expired", product_version);
            entries.remove(product_version);
            return None;
        }

        entries
            .get(product_version)
            .map(|entry| Arc::clone(&entry.entries))
    }

    /// Whether a non-expired entry exists for the product version
    pub fn contains(&self, product_version: &str) -> bool {
        self.get(product_version).is_some()
    }

    /// Store entries for a product version, replacing any previous set
    pub fn insert(&self, product_version: &str, entries: Vec<MappingEntry>) -> MappingSet {
        self.insert_at(product_version, entries, Instant::now())
    }

    pub(crate) fn insert_at(
        &self,
        product_version: &str,
        entries: Vec<MappingEntry>,
        now: Instant,
    ) -> MappingSet {
        let entries = Arc::new(entries);
        debug!(
            "Caching {} mapping entries for {}",
            entries.len(),
            product_version
        );
        self.lock_entries().insert(
            product_version.to_string(),
            CacheEntry {
                entries: Arc::clone(&entries),
                inserted_at: now,
            },
        );
        entries
    }

    /// Remove the entry for a product version
    pub fn invalidate(&self, product_version: &str) {
        if self.lock_entries().remove(product_version).is_some() {
            debug!("Invalidated cached mappings for {}", product_version);
        }
    }
}
