//! Process-wide facade wiring the store, cache registry, and dispatcher.
//!
//! One `Engine` serves every request. It keeps a mirror of the documents it
//! has seen so link resolution and the sitemap can be computed locally, and
//! so hooks that omit the previous snapshot still get a correct plan.

use std::sync::Arc;

use anyhow::Result;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::cache::{CacheError, CacheTag, Invalidator, TagRegistry};
use crate::config::SiteConfig;
use crate::core::{DocumentCategory, Locale, Site};
use crate::document::{
    DocumentFilter, DocumentStore, LocalizedDocument, MemoryStore, StoreError, StoreHandle,
};
use crate::generator::{SITEMAP_KEY, Sitemap};
use crate::link::{Href, LinkDescriptor, ResolveContext, SingletonSnapshot, resolve};
use crate::log;
use crate::path::{ExpandError, canonical_to_localized_paths};
use crate::refresh::{RefreshError, RefreshReport, RefreshTrigger};
use crate::revalidate::{BulkSession, DocumentChange, Dispatched, Dispatcher, RevalidationEvent};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

pub struct Engine {
    site: Arc<Site>,
    store: StoreHandle<MemoryStore>,
    registry: TagRegistry,
    dispatcher: Dispatcher,
    refresh: RefreshTrigger,
    base_url: String,
}

impl Engine {
    /// Build from config. Invalidations go to the engine's own registry.
    pub fn from_config(config: &SiteConfig) -> Result<Self> {
        let site = config.to_site()?;
        let registry = TagRegistry::in_memory();
        let invalidator: Arc<dyn Invalidator> = Arc::new(registry.clone());
        Ok(Self::new(
            site,
            registry,
            invalidator,
            config.refresh_trigger()?,
            config.site.base_url(),
        ))
    }

    pub fn new(
        site: Site,
        registry: TagRegistry,
        invalidator: Arc<dyn Invalidator>,
        refresh: RefreshTrigger,
        base_url: &str,
    ) -> Self {
        let site = Arc::new(site);
        let locales = site.locales.clone();
        let store = StoreHandle::new(move || Ok(MemoryStore::new(locales.clone())));
        Self {
            dispatcher: Dispatcher::new(Arc::clone(&site), invalidator),
            site,
            store,
            registry,
            refresh,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    pub fn store(&self) -> Result<Arc<MemoryStore>, StoreError> {
        self.store.get()
    }

    // ========================================================================
    // lifecycle hooks
    // ========================================================================

    /// Persist `event` into the mirror, filling in the previous snapshot when
    /// the hook did not send one.
    ///
    /// Rejected writes (invalid path, path conflict) return an error and are
    /// never dispatched.
    pub fn apply(&self, event: RevalidationEvent) -> Result<RevalidationEvent, StoreError> {
        let store = self.store.get()?;
        let RevalidationEvent { change, context } = event;
        let change = match change {
            DocumentChange::Changed { new, previous } => {
                let mirrored = store.upsert(new.clone())?;
                DocumentChange::Changed {
                    new,
                    previous: previous.or(mirrored),
                }
            }
            DocumentChange::Deleted { previous } => {
                store.remove(&previous.locale, &previous.id);
                DocumentChange::Deleted { previous }
            }
        };
        Ok(RevalidationEvent { change, context })
    }

    /// Persist then dispatch one event.
    pub fn on_event(&self, event: RevalidationEvent) -> Result<Dispatched, StoreError> {
        let event = self.apply(event).inspect_err(|e| self.reconnect_on(e))?;
        Ok(self.dispatcher.dispatch(event))
    }

    /// Persist and record one event in a bulk session.
    pub fn on_bulk_event(
        &self,
        session: &BulkSession<'_>,
        event: RevalidationEvent,
    ) -> Result<(), StoreError> {
        session.record(self.apply(event).inspect_err(|e| self.reconnect_on(e))?);
        Ok(())
    }

    /// Drop the store client after the backend reported itself unavailable.
    fn reconnect_on(&self, err: &StoreError) {
        if matches!(err, StoreError::Unavailable(_)) {
            log!("store"; "unavailable, reconnecting on next request: {err}");
            self.store.reset();
        }
    }

    pub fn begin_bulk(&self) -> BulkSession<'_> {
        self.dispatcher.begin_bulk()
    }

    // ========================================================================
    // reads
    // ========================================================================

    /// Resolve a link for a page rendered in `locale`.
    pub fn resolve_href(
        &self,
        link: &LinkDescriptor,
        locale: &Locale,
    ) -> Result<Href, EngineError> {
        let store = self.store.get()?;
        let snapshot = SingletonSnapshot::load(store.as_ref(), &self.registry, locale)?;
        Ok(resolve(link, &snapshot, ResolveContext::new(locale, &self.site.locales)))
    }

    /// String-typed expansion for renderers that do not link this crate's types.
    pub fn canonical_to_localized_paths(
        &self,
        canonical: &str,
    ) -> Result<Vec<String>, ExpandError> {
        let codes: Vec<&str> = self.site.locales.iter().map(Locale::as_str).collect();
        canonical_to_localized_paths(canonical, &codes, self.site.locales.default_locale().as_str())
    }

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
        self.registry.cached_read(key, tags, loader)
    }

    /// The sitemap, served from cache until `site-index` is bumped.
    pub fn sitemap(&self) -> Result<String, EngineError> {
        let store = self.store.get()?;
        Ok(self.cached_read(SITEMAP_KEY, &[CacheTag::site_index()], || {
            Ok(Sitemap::collect(store.as_ref(), &self.site, &self.base_url)?.into_xml())
        })?)
    }

    /// Published documents of `category` in `locale`, newest first.
    ///
    /// Cached until `listing:<class>` is bumped. `None` when the category has
    /// no listing page.
    pub fn listing(
        &self,
        category: DocumentCategory,
        locale: &Locale,
    ) -> Result<Option<Vec<LocalizedDocument>>, EngineError> {
        if self.site.routes.listing_path(category).is_none() {
            return Ok(None);
        }
        let class = category.class();
        let tag = CacheTag::listing(class);
        let key = format!("{tag}:{locale}");
        let store = self.store.get()?;
        let docs = self.cached_read(&key, &[tag], || {
            let mut docs =
                store.find_documents_by_category(class, locale, &DocumentFilter::published())?;
            docs.sort_by(|a, b| {
                b.published_at
                    .cmp(&a.published_at)
                    .then_with(|| a.id.cmp(&b.id))
            });
            Ok(docs)
        })?;
        Ok(Some(docs))
    }

    // ========================================================================
    // refresh
    // ========================================================================

    pub fn refresh(&self, presented: Option<&str>) -> Result<RefreshReport, RefreshError> {
        self.refresh.trigger(presented, &self.dispatcher)
    }

    /// Unauthenticated one-shot refresh, for local use.
    pub fn refresh_local(&self) -> RefreshReport {
        self.refresh.run(&self.dispatcher)
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("site", &self.site)
            .field("store", &self.store)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
