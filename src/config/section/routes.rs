//! `[routes]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [routes]
//! post = "/blog"              # Listing page of every post ("" disables it)
//!
//! [routes.index]
//! pages = true
//! posts = true
//! singletons = ["home", "blog", "about", "contact", "services"]
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::core::{CanonicalPath, IndexPolicy, RoutePolicy, SingletonKind};
use crate::path::{PathOwner, ValidationError, normalize_for};

const FIELD_POST: FieldPath = FieldPath::new("routes.post");

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutesConfig {
    /// Listing path of the post category.
    pub post: String,
    pub index: IndexConfig,
}

/// Which categories feed the site index.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    pub pages: bool,
    pub posts: bool,
    pub singletons: Vec<SingletonKind>,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            post: "/blog".into(),
            index: IndexConfig::default(),
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        let policy = IndexPolicy::default();
        Self {
            pages: policy.pages,
            posts: policy.posts,
            singletons: policy.singletons,
        }
    }
}

impl RoutesConfig {
    fn post_listing(&self) -> Result<Option<CanonicalPath>, ValidationError> {
        if self.post.trim().is_empty() {
            return Ok(None);
        }
        normalize_for(&self.post, PathOwner::Document).map(Some)
    }

    pub fn route_policy(&self) -> Result<RoutePolicy, ValidationError> {
        Ok(RoutePolicy {
            post_listing: self.post_listing()?,
            index: IndexPolicy {
                pages: self.index.pages,
                posts: self.index.posts,
                singletons: self.index.singletons.clone(),
            },
        })
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if let Err(e) = self.post_listing() {
            diag.error_with_hint(
                FIELD_POST,
                e.to_string(),
                "use a path like \"/blog\", or \"\" to disable the listing",
            );
        }
    }
}
