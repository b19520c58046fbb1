//! Symbolic link resolution.
//!
//! Turns a [`LinkDescriptor`] authored in a content block into a concrete
//! localized href. Resolution is pure: it reads an already loaded
//! [`SingletonSnapshot`] and never touches the store.
//!
//! | Descriptor            | Found                     | Missing            |
//! |-----------------------|---------------------------|--------------------|
//! | `custom`              | href verbatim             | -                  |
//! | `singleton`           | snapshot entry's path     | locale root        |
//! | `document` (resolved) | document's localized path | -                  |
//! | `document` (id only)  | -                         | empty (omit link)  |

mod snapshot;

use serde::{Deserialize, Serialize};

use crate::core::{CanonicalPath, DocumentCategory, Locale, LocaleSet, SingletonKind};
use crate::document::{DocumentId, LocalizedDocument};
use crate::path::localize;

pub use snapshot::SingletonSnapshot;

/// A link as authored in a content block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LinkDescriptor {
    /// Free-form URL, possibly external.
    Custom { href: String },
    /// Reference to a singleton page by kind.
    #[serde(rename = "singleton")]
    SingletonRef { kind: SingletonKind },
    /// Relational reference to a page or post.
    #[serde(rename = "document")]
    DocumentRef {
        category: DocumentCategory,
        target: DocumentTarget,
    },
}

/// Relational target: joined document, or a bare id when the join was
/// skipped (e.g. depth-limited fetches).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentTarget {
    Resolved(Box<LocalizedDocument>),
    Id(DocumentId),
}

/// Locale scope of one render.
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    pub locale: &'a Locale,
    pub locales: &'a LocaleSet,
}

impl<'a> ResolveContext<'a> {
    pub fn new(locale: &'a Locale, locales: &'a LocaleSet) -> Self {
        Self { locale, locales }
    }

    /// Home path of the render locale (`/` or `/{locale}`).
    pub fn root(&self) -> String {
        localize(&CanonicalPath::root(), self.locale, self.locales)
    }
}

/// A resolved href. Empty means the renderer omits the link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Href(String);

impl Href {
    pub fn omitted() -> Self {
        Self::default()
    }

    /// The link could not be resolved and must not be rendered.
    #[inline]
    pub fn is_omitted(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Href {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for Href {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolve a link against a singleton snapshot of the render locale.
pub fn resolve(
    link: &LinkDescriptor,
    singletons: &SingletonSnapshot,
    ctx: ResolveContext<'_>,
) -> Href {
    match link {
        LinkDescriptor::Custom { href } => Href(href.clone()),
        LinkDescriptor::SingletonRef { kind } => match singletons.get(*kind) {
            Some(doc) => Href(doc.href(ctx.locales)),
            None => Href(ctx.root()),
        },
        LinkDescriptor::DocumentRef { target, .. } => match target {
            DocumentTarget::Resolved(doc) => Href(doc.href(ctx.locales)),
            DocumentTarget::Id(_) => Href::omitted(),
        },
    }
}
