//! Site-wide routing context: locales plus per-category route policy.

use super::{CanonicalPath, DocumentCategory, LocaleSet, SingletonKind};

/// Which categories contribute entries to the site index (sitemap).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexPolicy {
    pub pages: bool,
    pub posts: bool,
    pub singletons: Vec<SingletonKind>,
}

impl Default for IndexPolicy {
    fn default() -> Self {
        Self {
            pages: true,
            posts: true,
            singletons: vec![
                SingletonKind::Home,
                SingletonKind::Blog,
                SingletonKind::About,
                SingletonKind::Contact,
                SingletonKind::Services,
            ],
        }
    }
}

/// Per-category route policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePolicy {
    /// Listing page that links to every post (e.g. `/blog`).
    pub post_listing: Option<CanonicalPath>,
    pub index: IndexPolicy,
}

impl Default for RoutePolicy {
    fn default() -> Self {
        Self {
            post_listing: Some(CanonicalPath::from_validated("/blog")),
            index: IndexPolicy::default(),
        }
    }
}

impl RoutePolicy {
    /// Listing page whose content depends on documents of this category.
    pub fn listing_path(&self, category: DocumentCategory) -> Option<&CanonicalPath> {
        match category {
            DocumentCategory::Post => self.post_listing.as_ref(),
            DocumentCategory::Page | DocumentCategory::Singleton(_) => None,
        }
    }

    /// Whether documents of this category appear in the site index.
    pub fn feeds_index(&self, category: DocumentCategory) -> bool {
        match category {
            DocumentCategory::Page => self.index.pages,
            DocumentCategory::Post => self.index.posts,
            DocumentCategory::Singleton(kind) => self.index.singletons.contains(&kind),
        }
    }
}

/// Everything path derivation and revalidation need to know about the site.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Site {
    pub locales: LocaleSet,
    pub routes: RoutePolicy,
}

impl Site {
    pub fn new(locales: LocaleSet, routes: RoutePolicy) -> Self {
        Self { locales, routes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_only_for_posts() {
        let policy = RoutePolicy::default();
        assert_eq!(
            policy.listing_path(DocumentCategory::Post).map(CanonicalPath::as_str),
            Some("/blog")
        );
        assert_eq!(policy.listing_path(DocumentCategory::Page), None);
        assert_eq!(policy.listing_path(DocumentCategory::HOME), None);
    }

    #[test]
    fn test_feeds_index() {
        let policy = RoutePolicy::default();
        assert!(policy.feeds_index(DocumentCategory::Page));
        assert!(policy.feeds_index(DocumentCategory::Post));
        assert!(policy.feeds_index(DocumentCategory::HOME));
        assert!(!policy.feeds_index(DocumentCategory::Singleton(SingletonKind::Privacy)));
    }
}
