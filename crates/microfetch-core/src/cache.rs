//! Process-lifetime store of fetched content, addressable by a derived ID.
//!
//! Entries are never evicted or expired. The store grows for as long as the
//! process runs.

use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// URI scheme under which cache entries are exposed.
pub const RESOURCE_SCHEME: &str = "microfetch://";

/// A cached fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheEntry {
    pub id: String,
    pub url: String,
    pub content: String,
    pub fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn uri(&self) -> String {
        resource_uri(&self.id)
    }
}

/// Derive the identifier for `url`: `fetch_` plus 16 hex digits.
///
/// `DefaultHasher::new()` uses fixed keys, so the same URL maps to the same
/// identifier for the lifetime of the process.
pub fn cache_id(url: &str) -> String {
    let mut hasher = DefaultHasher::new();
    url.hash(&mut hasher);
    format!("fetch_{:016x}", hasher.finish())
}

pub fn resource_uri(id: &str) -> String {
    format!("{RESOURCE_SCHEME}{id}")
}

/// Extract the identifier from a `microfetch://<id>` URI.
pub fn parse_resource_uri(uri: &str) -> Option<&str> {
    uri.strip_prefix(RESOURCE_SCHEME).filter(|id| !id.is_empty())
}

/// Thread-safe map of cache identifiers to entries.
#[derive(Debug, Default)]
pub struct ResultCache {
    entries: RwLock<BTreeMap<String, CacheEntry>>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, CacheEntry>> {
        self.entries.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<String, CacheEntry>> {
        self.entries.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Store `content` for `url` and return its identifier.
    ///
    /// An existing entry under the same identifier is replaced whole.
    pub fn put(&self, url: &str, content: impl Into<String>) -> String {
        let id = cache_id(url);
        let entry = CacheEntry {
            id: id.clone(),
            url: url.to_string(),
            content: content.into(),
            fetched_at: Utc::now(),
        };

        let mut entries = self.write();
        if let Some(previous) = entries.get(&id) {
            if previous.url != url {
                tracing::warn!(
                    "Cache identifier collision on {id}: {} replaced by {url}",
                    previous.url
                );
            }
        }
        entries.insert(id.clone(), entry);
        tracing::debug!("Cached {url} as {id}");
        id
    }

    pub fn get(&self, id: &str) -> Option<CacheEntry> {
        self.read().get(id).cloned()
    }

    /// All entries, ordered by identifier.
    pub fn list(&self) -> Vec<CacheEntry> {
        self.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_is_idempotent_on_identifier() {
        let cache = ResultCache::new();
        let first = cache.put("https://example.com", "v1");
        let second = cache.put("https://example.com", "v2");
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&first).unwrap().content, "v2");
    }

    #[test]
    fn test_identifier_shape() {
        let id = cache_id("https://example.com");
        assert!(id.starts_with("fetch_"));
        assert_eq!(id.len(), "fetch_".len() + 16);
        assert!(id["fetch_".len()..].chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id, cache_id("https://example.org"));
    }

    #[test]
    fn test_get_missing() {
        let cache = ResultCache::new();
        assert!(cache.get("fetch_0000000000000000").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_list_returns_every_entry() {
        let cache = ResultCache::new();
        let a = cache.put("https://a.test", "A");
        let b = cache.put("https://b.test", "B");
        let listed = cache.list();
        assert_eq!(listed.len(), 2);
        let ids: Vec<&str> = listed.iter().map(|e| e.id.as_str()).collect();
        assert!(ids.contains(&a.as_str()));
        assert!(ids.contains(&b.as_str()));
    }

    #[test]
    fn test_resource_uri_round_trip() {
        let cache = ResultCache::new();
        let id = cache.put("https://a.test", "A");
        let entry = cache.get(&id).unwrap();
        assert_eq!(entry.uri(), format!("microfetch://{id}"));
        assert_eq!(parse_resource_uri(&entry.uri()), Some(id.as_str()));
        assert_eq!(parse_resource_uri("microfetch://"), None);
        assert_eq!(parse_resource_uri("https://a.test"), None);
    }

    #[test]
    fn test_concurrent_puts() {
        let cache = std::sync::Arc::new(ResultCache::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    for j in 0..50 {
                        cache.put(&format!("https://t{i}.test/{j}"), "x");
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(cache.len(), 400);
    }
}
