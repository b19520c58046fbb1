//! Tag-aware read-through cache.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::{CacheEntry, CacheStore, CacheTag, MemoryCacheStore};
use crate::debug;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cached loader failed: {0:#}")]
    Loader(anyhow::Error),

    #[error("cached value is not serializable: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Memoizes loader results by key, grouped under cache tags.
#[derive(Clone)]
pub struct TagRegistry {
    store: Arc<dyn CacheStore>,
}

impl TagRegistry {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryCacheStore::new()))
    }

    /// Return the memoized value for `key`, or run `loader` and memoize it
    /// under `tags`.
    ///
    /// Tag generations are captured before the loader runs: an invalidation
    /// that lands mid-load leaves the stored entry already stale. Loader
    /// errors are returned and not cached.
    pub fn cached_read<T, F>(
        &self,
        key: &str,
        tags: &[CacheTag],
        loader: F,
    ) -> Result<T, CacheError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> anyhow::Result<T>,
    {
        if let Some(entry) = self.store.get(key)
            && self.is_fresh(&entry)
        {
            match serde_json::from_value(entry.value) {
                Ok(value) => return Ok(value),
                Err(e) => {
                    debug!("cache"; "dropping undecodable entry `{}`: {}", key, e);
                    self.store.remove(key);
                }
            }
        }

        let generations = tags
            .iter()
            .map(|tag| (tag.clone(), self.store.generation(tag)))
            .collect();
        let value = loader().map_err(CacheError::Loader)?;
        self.store.put(
            key,
            CacheEntry {
                value: serde_json::to_value(&value)?,
                tags: generations,
            },
        );
        Ok(value)
    }

    /// Force the next read of every entry tagged `tag` to reload.
    pub fn invalidate(&self, tag: &CacheTag) -> u64 {
        self.store.bump(tag)
    }

    /// Mark one rendered path stale.
    pub fn invalidate_path(&self, path: &str) -> u64 {
        self.store.mark_path_stale(path)
    }

    #[cfg(test)]
    pub fn path_revision(&self, path: &str) -> u64 {
        self.store.path_revision(path)
    }

    #[cfg(test)]
    pub fn generation(&self, tag: &CacheTag) -> u64 {
        self.store.generation(tag)
    }

    fn is_fresh(&self, entry: &CacheEntry) -> bool {
        entry
            .tags
            .iter()
            .all(|(tag, generation)| self.store.generation(tag) == *generation)
    }
}

impl std::fmt::Debug for TagRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagRegistry").finish_non_exhaustive()
    }
}
