//! Cache-tag registry and invalidation sinks.
//!
//! # Module Structure
//!
//! - [`tag`]: `CacheTag` keys
//! - [`store`]: `CacheStore` trait and the in-process `DashMap` store
//! - [`registry`]: `cached_read` wrapper keyed by tag generations
//! - [`invalidator`]: `Invalidator` trait and the recording double

mod invalidator;
mod registry;
mod store;
mod tag;

pub use invalidator::{Invalidation, InvalidationError, Invalidator, RecordingInvalidator};
pub use registry::{CacheError, TagRegistry};
pub use store::{CacheEntry, CacheStore, MemoryCacheStore};
pub use tag::CacheTag;
