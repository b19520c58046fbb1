//! Document storage seam and the in-memory mirror.
//!
//! The authoring backend owns persistence. The engine only reads through
//! [`DocumentStore`]; [`MemoryStore`] is a local mirror fed by document
//! hooks, used by serve mode and tests.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use thiserror::Error;

use super::{DocumentId, LocalizedDocument, Status};
use crate::core::{CanonicalPath, CategoryClass, Locale, LocaleSet};
use crate::path::{PathOwner, ValidationError, localize, validate};

/// Storage and document-integrity errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("home document must live at `/`, found `{0}`")]
    HomeNotAtRoot(CanonicalPath),

    #[error("locale `{0}` is not supported")]
    UnsupportedLocale(Locale),

    #[error("localized path `{found}` does not match derived `{expected}`")]
    LocalizedMismatch { expected: String, found: String },

    #[error("path `{path}` in locale `{locale}` is already owned by `{owner}`")]
    PathConflict {
        path: CanonicalPath,
        locale: Locale,
        owner: DocumentId,
    },

    #[error("path `{path}` starts with locale prefix `{locale}`")]
    LocaleShadowing { path: CanonicalPath, locale: Locale },

    #[error("singleton `{category}` in locale `{locale}` already exists as `{owner}`")]
    DuplicateSingleton {
        category: String,
        locale: Locale,
        owner: DocumentId,
    },

    #[error("document store unavailable: {0}")]
    Unavailable(String),
}

/// Query filter for [`DocumentStore::find_documents_by_category`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentFilter {
    /// Only documents with this status (`None` = any).
    pub status: Option<Status>,
}

impl DocumentFilter {
    pub fn published() -> Self {
        Self {
            status: Some(Status::Published),
        }
    }

    pub fn matches(&self, doc: &LocalizedDocument) -> bool {
        self.status.is_none_or(|s| s == doc.status)
    }
}

/// Read access to persisted documents.
pub trait DocumentStore: Send + Sync {
    fn find_documents_by_category(
        &self,
        class: CategoryClass,
        locale: &Locale,
        filter: &DocumentFilter,
    ) -> Result<Vec<LocalizedDocument>, StoreError>;
}

/// Check the path invariants of a single document.
pub fn check_document(doc: &LocalizedDocument, locales: &LocaleSet) -> Result<(), StoreError> {
    if !locales.contains(&doc.locale) {
        return Err(StoreError::UnsupportedLocale(doc.locale.clone()));
    }

    let owner = if doc.is_home() {
        PathOwner::Home
    } else {
        PathOwner::Document
    };
    validate(doc.canonical_path.as_str(), owner)?;
    if doc.is_home() && !doc.canonical_path.is_root() {
        return Err(StoreError::HomeNotAtRoot(doc.canonical_path.clone()));
    }

    if let Some(locale) = doc
        .canonical_path
        .first_segment()
        .and_then(|segment| locales.find_prefix(segment))
    {
        return Err(StoreError::LocaleShadowing {
            path: doc.canonical_path.clone(),
            locale: locale.clone(),
        });
    }

    if let Some(found) = &doc.localized_path {
        let expected = localize(&doc.canonical_path, &doc.locale, locales);
        if *found != expected {
            return Err(StoreError::LocalizedMismatch {
                expected,
                found: found.clone(),
            });
        }
    }
    Ok(())
}

type DocumentKey = (Locale, DocumentId);

/// Thread-safe in-memory document mirror.
#[derive(Debug)]
pub struct MemoryStore {
    locales: LocaleSet,
    docs: RwLock<BTreeMap<DocumentKey, LocalizedDocument>>,
}

impl MemoryStore {
    pub fn new(locales: LocaleSet) -> Self {
        Self {
            locales,
            docs: RwLock::new(BTreeMap::new()),
        }
    }

    /// Insert or replace a document, returning the previous snapshot.
    ///
    /// Rejects writes that break path invariants; the localized path is
    /// derived if the incoming snapshot lacks it.
    pub fn upsert(
        &self,
        mut doc: LocalizedDocument,
    ) -> Result<Option<LocalizedDocument>, StoreError> {
        check_document(&doc, &self.locales)?;
        doc.localized_path
            .get_or_insert_with(|| localize(&doc.canonical_path, &doc.locale, &self.locales));

        let mut docs = self.docs.write();
        for existing in docs.values() {
            if existing.id == doc.id || existing.locale != doc.locale {
                continue;
            }
            if existing.canonical_path == doc.canonical_path {
                return Err(StoreError::PathConflict {
                    path: doc.canonical_path.clone(),
                    locale: doc.locale.clone(),
                    owner: existing.id.clone(),
                });
            }
            if doc.category.singleton_kind().is_some() && existing.category == doc.category {
                return Err(StoreError::DuplicateSingleton {
                    category: doc.category.to_string(),
                    locale: doc.locale.clone(),
                    owner: existing.id.clone(),
                });
            }
        }

        Ok(docs.insert((doc.locale.clone(), doc.id.clone()), doc))
    }

    /// Remove a document, returning its last snapshot.
    pub fn remove(&self, locale: &Locale, id: &DocumentId) -> Option<LocalizedDocument> {
        self.docs.write().remove(&(locale.clone(), id.clone()))
    }

    #[cfg(test)]
    pub fn get(&self, locale: &Locale, id: &DocumentId) -> Option<LocalizedDocument> {
        self.docs.read().get(&(locale.clone(), id.clone())).cloned()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.docs.read().len()
    }
}

impl DocumentStore for MemoryStore {
    fn find_documents_by_category(
        &self,
        class: CategoryClass,
        locale: &Locale,
        filter: &DocumentFilter,
    ) -> Result<Vec<LocalizedDocument>, StoreError> {
        Ok(self
            .docs
            .read()
            .values()
            .filter(|d| d.category.class() == class && &d.locale == locale && filter.matches(d))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DocumentCategory, SingletonKind};
    use crate::document::testing::*;

    fn store() -> MemoryStore {
        MemoryStore::new(site().locales)
    }

    #[test]
    fn test_upsert_returns_previous() {
        let store = store();
        let d = doc("p1", DocumentCategory::Post, "launch");
        assert_eq!(store.upsert(d.clone()).unwrap(), None);

        let mut renamed = d.clone();
        renamed.rename("launch-day", &site()).unwrap();
        let previous = store.upsert(renamed).unwrap().unwrap();
        assert_eq!(previous.canonical_path, "/blog/launch");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_upsert_derives_missing_localized_path() {
        let store = store();
        let mut d =
            LocalizedDocument::new("p", locale("nl"), DocumentCategory::Page, "about", &site())
                .unwrap();
        d.localized_path = None;
        store.upsert(d).unwrap();
        let stored = store.get(&locale("nl"), &"p".into()).unwrap();
        assert_eq!(stored.localized_path.as_deref(), Some("/nl/about"));
    }

    #[test]
    fn test_path_conflict_same_locale() {
        let store = store();
        store.upsert(doc("a", DocumentCategory::Page, "about")).unwrap();
        let err = store.upsert(doc("b", DocumentCategory::Page, "about")).unwrap_err();
        assert!(matches!(err, StoreError::PathConflict { ref owner, .. } if owner.as_str() == "a"));
    }

    #[test]
    fn test_same_path_other_locale_is_fine() {
        let store = store();
        store.upsert(doc("a", DocumentCategory::Page, "about")).unwrap();
        let nl = LocalizedDocument::new("b", locale("nl"), DocumentCategory::Page, "about", &site())
            .unwrap();
        assert!(store.upsert(nl).is_ok());
    }

    #[test]
    fn test_locale_shadowing_rejected() {
        let store = store();
        let err = store.upsert(doc("a", DocumentCategory::Page, "nl/about")).unwrap_err();
        assert!(matches!(err, StoreError::LocaleShadowing { .. }));
    }

    #[test]
    fn test_reserved_root_for_non_home() {
        let mut d = doc("a", DocumentCategory::Page, "about");
        d.canonical_path = CanonicalPath::root();
        d.localized_path = None;
        assert_eq!(
            check_document(&d, &site().locales),
            Err(StoreError::Validation(ValidationError::ReservedRoot))
        );
    }

    #[test]
    fn test_home_must_be_root() {
        let mut d = doc("h", DocumentCategory::HOME, "");
        d.canonical_path = CanonicalPath::parse("/home").unwrap();
        d.localized_path = None;
        assert!(matches!(
            check_document(&d, &site().locales),
            Err(StoreError::HomeNotAtRoot(_))
        ));
    }

    #[test]
    fn test_localized_mismatch() {
        let mut d = doc("a", DocumentCategory::Page, "about");
        d.localized_path = Some("/nl/about".into());
        assert!(matches!(
            check_document(&d, &site().locales),
            Err(StoreError::LocalizedMismatch { .. })
        ));
    }

    #[test]
    fn test_unsupported_locale() {
        let mut d = doc("a", DocumentCategory::Page, "about");
        d.locale = locale("de");
        d.localized_path = None;
        assert!(matches!(
            check_document(&d, &site().locales),
            Err(StoreError::UnsupportedLocale(_))
        ));
    }

    #[test]
    fn test_duplicate_singleton() {
        let store = store();
        let contact = DocumentCategory::Singleton(SingletonKind::Contact);
        store.upsert(doc("c1", contact, "contact")).unwrap();
        let err = store.upsert(doc("c2", contact, "reach-us")).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateSingleton { .. }));
    }

    #[test]
    fn test_find_by_category() {
        let store = store();
        store.upsert(published("p1", DocumentCategory::Post, "one")).unwrap();
        store.upsert(doc("p2", DocumentCategory::Post, "two")).unwrap();
        store.upsert(published("a", DocumentCategory::Page, "about")).unwrap();

        let en = locale("en");
        let all_posts = store
            .find_documents_by_category(CategoryClass::Post, &en, &DocumentFilter::default())
            .unwrap();
        assert_eq!(all_posts.len(), 2);

        let live_posts = store
            .find_documents_by_category(CategoryClass::Post, &en, &DocumentFilter::published())
            .unwrap();
        assert_eq!(live_posts.len(), 1);
        assert_eq!(live_posts[0].id.as_str(), "p1");

        let any = DocumentFilter::default();
        let nl_posts = store
            .find_documents_by_category(CategoryClass::Post, &locale("nl"), &any)
            .unwrap();
        assert!(nl_posts.is_empty());
    }

    #[test]
    fn test_remove() {
        let store = store();
        store.upsert(doc("a", DocumentCategory::Page, "about")).unwrap();
        let removed = store.remove(&locale("en"), &"a".into()).unwrap();
        assert_eq!(removed.canonical_path, "/about");
        assert_eq!(store.len(), 0);
        assert!(store.remove(&locale("en"), &"a".into()).is_none());
    }
}
