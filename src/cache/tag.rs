//! Cache tag keys.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::{CategoryClass, SingletonKind};

/// String key grouping cached reads for invalidation.
///
/// | Tag                  | Read                         |
/// |----------------------|------------------------------|
/// | `singleton:<kind>`   | one singleton, every locale  |
/// | `site-index`         | the sitemap                  |
/// | `listing:<category>` | category listing queries     |
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheTag(Arc<str>);

impl CacheTag {
    pub const SITE_INDEX: &'static str = "site-index";

    pub fn new(tag: impl Into<Arc<str>>) -> Self {
        Self(tag.into())
    }

    pub fn site_index() -> Self {
        Self::new(Self::SITE_INDEX)
    }

    pub fn singleton(kind: SingletonKind) -> Self {
        Self::new(format!("singleton:{kind}"))
    }

    pub fn listing(class: CategoryClass) -> Self {
        let name = match class {
            CategoryClass::Page => "page",
            CategoryClass::Post => "post",
            CategoryClass::Singleton => "singleton",
        };
        Self::new(format!("listing:{name}"))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_names() {
        assert_eq!(CacheTag::site_index().as_str(), "site-index");
        assert_eq!(CacheTag::singleton(SingletonKind::Home).as_str(), "singleton:home");
        assert_eq!(CacheTag::listing(CategoryClass::Post).as_str(), "listing:post");
    }
}
