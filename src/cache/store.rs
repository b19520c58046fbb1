//! Backing store for tagged reads and rendered-path revisions.

use dashmap::DashMap;
use serde_json::Value;

use super::CacheTag;

/// A memoized read: JSON payload plus the tag generations it was loaded
/// under.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub value: Value,
    pub tags: Vec<(CacheTag, u64)>,
}

/// Shared cache store (external in production, concurrent-safe).
///
/// Tags never delete entries; bumping a tag's generation makes every entry
/// loaded under an older generation stale.
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> Option<CacheEntry>;
    fn put(&self, key: &str, entry: CacheEntry);
    fn remove(&self, key: &str);

    /// Current generation of `tag` (0 if never bumped).
    fn generation(&self, tag: &CacheTag) -> u64;
    /// Advance the generation of `tag`, returning the new value.
    fn bump(&self, tag: &CacheTag) -> u64;

    /// Mark a rendered path stale, returning its new revision.
    fn mark_path_stale(&self, path: &str) -> u64;
    fn path_revision(&self, path: &str) -> u64;
}

/// In-process [`CacheStore`] over `DashMap`.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entries: DashMap<String, CacheEntry>,
    generations: DashMap<CacheTag, u64>,
    paths: DashMap<String, u64>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl CacheStore for MemoryCacheStore {
    fn get(&self, key: &str) -> Option<CacheEntry> {
        self.entries.get(key).map(|e| e.clone())
    }

    fn put(&self, key: &str, entry: CacheEntry) {
        self.entries.insert(key.to_string(), entry);
    }

    fn remove(&self, key: &str) {
        self.entries.remove(key);
    }

    fn generation(&self, tag: &CacheTag) -> u64 {
        self.generations.get(tag).map(|g| *g).unwrap_or(0)
    }

    fn bump(&self, tag: &CacheTag) -> u64 {
        let mut generation = self.generations.entry(tag.clone()).or_insert(0);
        *generation += 1;
        *generation
    }

    fn mark_path_stale(&self, path: &str) -> u64 {
        let mut revision = self.paths.entry(path.to_string()).or_insert(0);
        *revision += 1;
        *revision
    }

    fn path_revision(&self, path: &str) -> u64 {
        self.paths.get(path).map(|r| *r).unwrap_or(0)
    }
}
