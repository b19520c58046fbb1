//! Locale-scoped snapshot of published singleton documents.

use std::collections::BTreeMap;

use crate::cache::{CacheError, CacheTag, TagRegistry};
use crate::core::{CategoryClass, Locale, SingletonKind};
use crate::document::{DocumentFilter, DocumentStore, LocalizedDocument};

/// Published singletons of one locale, keyed by kind.
#[derive(Debug, Clone, PartialEq)]
pub struct SingletonSnapshot {
    locale: Locale,
    entries: BTreeMap<SingletonKind, LocalizedDocument>,
}

impl SingletonSnapshot {
    pub fn empty(locale: Locale) -> Self {
        Self {
            locale,
            entries: BTreeMap::new(),
        }
    }

    /// Build from documents already in hand. Non-singletons and other
    /// locales are ignored.
    pub fn from_documents(
        locale: Locale,
        docs: impl IntoIterator<Item = LocalizedDocument>,
    ) -> Self {
        let entries = docs
            .into_iter()
            .filter(|d| d.locale == locale)
            .filter_map(|d| d.category.singleton_kind().map(|kind| (kind, d)))
            .collect();
        Self { locale, entries }
    }

    /// Load through the registry, one cached read per kind tagged
    /// `singleton:<kind>`.
    pub fn load(
        store: &dyn DocumentStore,
        registry: &TagRegistry,
        locale: &Locale,
    ) -> Result<Self, CacheError> {
        let mut entries = BTreeMap::new();
        for kind in SingletonKind::ALL {
            let key = format!("singleton:{kind}:{locale}");
            let doc: Option<LocalizedDocument> =
                registry.cached_read(&key, &[CacheTag::singleton(kind)], || {
                    let found = store.find_documents_by_category(
                        CategoryClass::Singleton,
                        locale,
                        &DocumentFilter::published(),
                    )?;
                    Ok(found
                        .into_iter()
                        .find(|d| d.category.singleton_kind() == Some(kind)))
                })?;
            if let Some(doc) = doc {
                entries.insert(kind, doc);
            }
        }
        Ok(Self {
            locale: locale.clone(),
            entries,
        })
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn get(&self, kind: SingletonKind) -> Option<&LocalizedDocument> {
        self.entries.get(&kind)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
