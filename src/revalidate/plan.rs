//! Pure invalidation planning.
//!
//! ```text
//! Idle -> Evaluating -> NoOp          (suppressed, or never visible)
//!                    -> Invalidating  (plan executed by the dispatcher)
//! ```
//!
//! | Transition                         | Paths                          |
//! |------------------------------------|--------------------------------|
//! | save while published               | new set                        |
//! | unpublish, delete of published doc | previous set                   |
//! | rename while either side published | previous set + new set + listing |
//! | any home singleton edit            | every locale root              |
//!
//! Tags: `site-index` once when the category feeds the index,
//! `singleton:<kind>` for singletons, `listing:<category>` for categories
//! with a listing page.

use std::collections::BTreeSet;

use serde::Serialize;

use super::RevalidationEvent;
use crate::cache::CacheTag;
use crate::core::{CanonicalPath, DocumentCategory, Site};
use crate::path::{PathSet, expand};

/// Everything one event must invalidate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InvalidationPlan {
    #[serde(serialize_with = "serialize_paths")]
    pub paths: PathSet,
    pub tags: BTreeSet<CacheTag>,
}

fn serialize_paths<S: serde::Serializer>(paths: &PathSet, s: S) -> Result<S::Ok, S::Error> {
    s.collect_seq(paths.iter())
}

impl InvalidationPlan {
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.tags.is_empty()
    }

    /// Number of invalidation calls the plan issues.
    pub fn len(&self) -> usize {
        self.paths.len() + self.tags.len()
    }

    /// Union with another plan; shared paths and tags collapse.
    pub fn merge(&mut self, other: InvalidationPlan) {
        self.paths.extend(other.paths);
        self.tags.extend(other.tags);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoOpReason {
    Suppressed,
    /// Neither side of the event was ever visible
    NotPublished,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "lowercase")]
pub enum Decision {
    #[serde(rename = "noop")]
    NoOp { reason: NoOpReason },
    Invalidate(InvalidationPlan),
}

impl Decision {
    pub fn plan(&self) -> Option<&InvalidationPlan> {
        match self {
            Self::NoOp { .. } => None,
            Self::Invalidate(plan) => Some(plan),
        }
    }
}

/// Decide what `event` invalidates.
pub fn plan(event: &RevalidationEvent, site: &Site) -> Decision {
    if event.context.suppress {
        return Decision::NoOp {
            reason: NoOpReason::Suppressed,
        };
    }
    match plan_unsuppressed(event, site) {
        Some(plan) => Decision::Invalidate(plan),
        None => Decision::NoOp {
            reason: NoOpReason::NotPublished,
        },
    }
}

/// Plan ignoring the suppress flag (bulk sessions replay suppressed events).
pub(super) fn plan_unsuppressed(
    event: &RevalidationEvent,
    site: &Site,
) -> Option<InvalidationPlan> {
    let new = event.new_doc();
    let previous = event.previous_doc();
    let new_live = new.is_some_and(|d| d.is_published());
    let previous_live = previous.is_some_and(|d| d.is_published());
    // Home edits touch every root whatever the status.
    let home = new.or(previous).is_some_and(|d| d.is_home());
    if !new_live && !previous_live && !home {
        return None;
    }

    let locales = &site.locales;
    let mut out = InvalidationPlan::default();
    if home {
        out.paths.extend(expand(&CanonicalPath::root(), locales));
    }

    if let Some(new) = new.filter(|d| d.is_published()) {
        out.paths.extend(expand(&new.canonical_path, locales));
    }
    if let Some(previous) = previous.filter(|_| previous_live && !new_live) {
        out.paths.extend(expand(&previous.canonical_path, locales));
    }
    if let (Some(new), Some(previous)) = (new, previous)
        && new.canonical_path != previous.canonical_path
    {
        out.paths.extend(expand(&previous.canonical_path, locales));
        out.paths.extend(expand(&new.canonical_path, locales));
        if let Some(listing) = site.routes.listing_path(new.category) {
            out.paths.extend(expand(listing, locales));
        }
    }

    let categories: BTreeSet<DocumentCategory> =
        new.iter().chain(previous.iter()).map(|d| d.category).collect();
    for category in categories {
        category_tags(category, site, &mut out.tags);
    }
    Some(out)
}

/// Tags owned by a category.
fn category_tags(category: DocumentCategory, site: &Site, tags: &mut BTreeSet<CacheTag>) {
    match category {
        DocumentCategory::Page | DocumentCategory::Post => {}
        DocumentCategory::Singleton(kind) => {
            tags.insert(CacheTag::singleton(kind));
        }
    }
    if site.routes.listing_path(category).is_some() {
        tags.insert(CacheTag::listing(category.class()));
    }
    if site.routes.feeds_index(category) {
        tags.insert(CacheTag::site_index());
    }
}
