//! Localized content documents and the storage seam.
//!
//! # Module Structure
//!
//! - [`store`]: `DocumentStore` trait and the in-memory mirror
//! - [`handle`]: memoized, re-creatable store client handle
//! - [`conflict`]: path collision detection across documents

pub mod conflict;
mod handle;
mod store;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{CanonicalPath, DocumentCategory, Locale, LocaleSet, Site};
use crate::path::{ValidationError, derive_canonical, localize};

pub use handle::StoreHandle;
pub use store::{DocumentFilter, DocumentStore, MemoryStore, StoreError};

/// Stable, locale-invariant document identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Arc<str>);

impl DocumentId {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Publication status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Draft,
    Published,
}

/// One locale's snapshot of a content document.
///
/// Field names follow the CMS wire format (`camelCase`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedDocument {
    pub id: DocumentId,
    pub locale: Locale,
    pub category: DocumentCategory,
    /// Human-editable source of the canonical path.
    #[serde(default)]
    pub slug: String,
    pub canonical_path: CanonicalPath,
    /// Derived at write time; absent on partially joined references.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub localized_path: Option<String>,
    #[serde(default)]
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl LocalizedDocument {
    /// Create a draft, deriving both paths from the slug.
    pub fn new(
        id: impl Into<DocumentId>,
        locale: Locale,
        category: DocumentCategory,
        slug: &str,
        site: &Site,
    ) -> Result<Self, ValidationError> {
        let canonical_path = derive_canonical(category, slug, &site.routes)?;
        let localized_path = Some(localize(&canonical_path, &locale, &site.locales));
        Ok(Self {
            id: id.into(),
            locale,
            category,
            slug: slug.to_string(),
            canonical_path,
            localized_path,
            status: Status::Draft,
            title: None,
            published_at: None,
            updated_at: None,
        })
    }

    #[inline]
    pub fn is_published(&self) -> bool {
        self.status == Status::Published
    }

    #[inline]
    pub fn is_home(&self) -> bool {
        self.category.is_home()
    }

    /// Publish. The first publish stamps `published_at`; later ones keep it.
    pub fn publish(&mut self, now: DateTime<Utc>) {
        self.status = Status::Published;
        self.published_at.get_or_insert(now);
        self.updated_at = Some(now);
    }

    pub fn unpublish(&mut self, now: DateTime<Utc>) {
        self.status = Status::Draft;
        self.updated_at = Some(now);
    }

    /// Change the slug, re-deriving canonical and localized paths.
    ///
    /// Returns the previous canonical path if it changed (a rename).
    pub fn rename(
        &mut self,
        slug: &str,
        site: &Site,
    ) -> Result<Option<CanonicalPath>, ValidationError> {
        let canonical = derive_canonical(self.category, slug, &site.routes)?;
        self.slug = slug.to_string();
        if canonical == self.canonical_path {
            return Ok(None);
        }
        self.localized_path = Some(localize(&canonical, &self.locale, &site.locales));
        Ok(Some(std::mem::replace(&mut self.canonical_path, canonical)))
    }

    /// Stored localized path, or the one derived from the canonical path.
    pub fn href(&self, locales: &LocaleSet) -> String {
        match self.localized_path.as_deref() {
            Some(path) if !path.is_empty() => path.to_string(),
            _ => localize(&self.canonical_path, &self.locale, locales),
        }
    }

    /// Date used as sitemap `lastmod`.
    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.updated_at.or(self.published_at)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_derives_paths() {
        let site = site();
        let d = LocalizedDocument::new("p1", locale("nl"), DocumentCategory::Post, "Launch", &site)
            .unwrap();
        assert_eq!(d.canonical_path, "/blog/launch");
        assert_eq!(d.localized_path.as_deref(), Some("/nl/blog/launch"));
        assert_eq!(d.status, Status::Draft);
    }

    #[test]
    fn test_home_paths() {
        let site = site();
        let en =
            LocalizedDocument::new("h", locale("en"), DocumentCategory::HOME, "", &site).unwrap();
        let nl =
            LocalizedDocument::new("h", locale("nl"), DocumentCategory::HOME, "", &site).unwrap();
        assert_eq!(en.localized_path.as_deref(), Some("/"));
        assert_eq!(nl.localized_path.as_deref(), Some("/nl"));
    }

    #[test]
    fn test_first_publish_sets_published_at() {
        let mut d = doc("p1", DocumentCategory::Post, "launch");
        let first = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();

        d.publish(first);
        assert!(d.is_published());
        assert_eq!(d.published_at, Some(first));

        d.unpublish(second);
        d.publish(second);
        assert_eq!(d.published_at, Some(first));
        assert_eq!(d.updated_at, Some(second));
    }

    #[test]
    fn test_rename() {
        let site = site();
        let mut d = doc("p1", DocumentCategory::Post, "launch");
        let old = d.rename("Launch Day", &site).unwrap();
        assert_eq!(old.unwrap(), "/blog/launch");
        assert_eq!(d.canonical_path, "/blog/launch-day");
        assert_eq!(d.localized_path.as_deref(), Some("/blog/launch-day"));

        // Same derived path is not a rename
        assert_eq!(d.rename("launch day", &site).unwrap(), None);
    }

    #[test]
    fn test_rename_rejects_invalid_slug() {
        let site = site();
        let mut d = doc("p1", DocumentCategory::Page, "about");
        assert!(d.rename("  ", &site).is_err());
        assert_eq!(d.canonical_path, "/about");
    }

    #[test]
    fn test_href_falls_back_to_derived() {
        let site = site();
        let mut d =
            LocalizedDocument::new("p", locale("nl"), DocumentCategory::Page, "about", &site)
                .unwrap();
        d.localized_path = None;
        assert_eq!(d.href(&site.locales), "/nl/about");
    }

    #[test]
    fn test_wire_format() {
        let json = r#"{
            "id": "p1",
            "locale": "en",
            "category": "post",
            "slug": "launch",
            "canonicalPath": "/blog/launch",
            "status": "published",
            "publishedAt": "2024-01-01T00:00:00Z"
        }"#;
        let d: LocalizedDocument = serde_json::from_str(json).unwrap();
        assert_eq!(d.id.as_str(), "p1");
        assert!(d.is_published());
        assert_eq!(d.localized_path, None);
        assert!(d.published_at.is_some());

        let back = serde_json::to_value(&d).unwrap();
        assert_eq!(back["canonicalPath"], "/blog/launch");
        assert!(back.get("localizedPath").is_none());
    }

    #[test]
    fn test_wire_format_rejects_bad_path() {
        let json = r#"{"id": "p1", "locale": "en", "category": "post", "canonicalPath": "/blog/"}"#;
        assert!(serde_json::from_str::<LocalizedDocument>(json).is_err());
    }
}
