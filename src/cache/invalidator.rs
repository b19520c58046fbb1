//! Invalidation sink used by the revalidation dispatcher.

use parking_lot::Mutex;
use serde::Serialize;
use thiserror::Error;

use super::{CacheTag, TagRegistry};
use crate::debug;

/// One failed invalidation call. Logged, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidationError {
    #[error("failed to revalidate path `{path}`: {reason}")]
    Path { path: String, reason: String },

    #[error("failed to revalidate tag `{tag}`: {reason}")]
    Tag { tag: CacheTag, reason: String },
}

/// Issues invalidations against the rendered-page cache.
///
/// Calls must be idempotent; the dispatcher may issue them in any order and
/// in parallel.
pub trait Invalidator: Send + Sync {
    fn revalidate_path(&self, path: &str) -> Result<(), InvalidationError>;
    fn revalidate_tag(&self, tag: &CacheTag) -> Result<(), InvalidationError>;
}

impl Invalidator for TagRegistry {
    fn revalidate_path(&self, path: &str) -> Result<(), InvalidationError> {
        let revision = self.invalidate_path(path);
        debug!("cache"; "{} -> revision {}", path, revision);
        Ok(())
    }

    fn revalidate_tag(&self, tag: &CacheTag) -> Result<(), InvalidationError> {
        let generation = self.invalidate(tag);
        debug!("cache"; "{} -> generation {}", tag, generation);
        Ok(())
    }
}

/// A single recorded invalidation call.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", content = "target", rename_all = "lowercase")]
pub enum Invalidation {
    Path(String),
    Tag(CacheTag),
}

/// Records calls instead of performing them (`replay`, tests).
#[derive(Debug, Default)]
pub struct RecordingInvalidator {
    calls: Mutex<Vec<Invalidation>>,
}

impl RecordingInvalidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain recorded calls, sorted.
    pub fn take(&self) -> Vec<Invalidation> {
        let mut calls = std::mem::take(&mut *self.calls.lock());
        calls.sort();
        calls
    }

    /// Recorded path calls, sorted (duplicates kept).
    #[cfg(test)]
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<_> = self
            .calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                Invalidation::Path(p) => Some(p.clone()),
                Invalidation::Tag(_) => None,
            })
            .collect();
        paths.sort();
        paths
    }

    /// Recorded tag calls, sorted (duplicates kept).
    #[cfg(test)]
    pub fn tags(&self) -> Vec<CacheTag> {
        let mut tags: Vec<_> = self
            .calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                Invalidation::Tag(t) => Some(t.clone()),
                Invalidation::Path(_) => None,
            })
            .collect();
        tags.sort();
        tags
    }

    #[cfg(test)]
    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

impl Invalidator for RecordingInvalidator {
    fn revalidate_path(&self, path: &str) -> Result<(), InvalidationError> {
        self.calls.lock().push(Invalidation::Path(path.to_string()));
        Ok(())
    }

    fn revalidate_tag(&self, tag: &CacheTag) -> Result<(), InvalidationError> {
        self.calls.lock().push(Invalidation::Tag(tag.clone()));
        Ok(())
    }
}
