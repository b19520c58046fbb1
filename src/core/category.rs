//! Document category definitions.
//!
//! Categories are a closed set: adding one is an exhaustive-match update in
//! every policy that branches on it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown document category `{0}`")]
pub struct UnknownCategory(pub String);

/// Kind of a singleton document (exactly one instance per locale).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SingletonKind {
    /// The home page, owner of the reserved root path
    Home,
    /// The blog overview page
    Blog,
    About,
    Contact,
    Services,
    Privacy,
}

impl SingletonKind {
    pub const ALL: [Self; 6] = [
        Self::Home,
        Self::Blog,
        Self::About,
        Self::Contact,
        Self::Services,
        Self::Privacy,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Blog => "blog",
            Self::About => "about",
            Self::Contact => "contact",
            Self::Services => "services",
            Self::Privacy => "privacy",
        }
    }
}

impl fmt::Display for SingletonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SingletonKind {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Coarse category class, used for store queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryClass {
    Page,
    Post,
    Singleton,
}

/// Category of a document, determines which derived caches an edit affects.
///
/// String form: `page`, `post`, `singleton:<kind>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DocumentCategory {
    Page,
    Post,
    Singleton(SingletonKind),
}

impl DocumentCategory {
    pub const HOME: Self = Self::Singleton(SingletonKind::Home);

    pub const fn class(self) -> CategoryClass {
        match self {
            Self::Page => CategoryClass::Page,
            Self::Post => CategoryClass::Post,
            Self::Singleton(_) => CategoryClass::Singleton,
        }
    }

    #[inline]
    pub const fn is_home(self) -> bool {
        matches!(self, Self::Singleton(SingletonKind::Home))
    }

    pub const fn singleton_kind(self) -> Option<SingletonKind> {
        match self {
            Self::Singleton(kind) => Some(kind),
            Self::Page | Self::Post => None,
        }
    }
}

impl fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page => f.write_str("page"),
            Self::Post => f.write_str("post"),
            Self::Singleton(kind) => write!(f, "singleton:{kind}"),
        }
    }
}

impl FromStr for DocumentCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "page" => Ok(Self::Page),
            "post" => Ok(Self::Post),
            other => match other.strip_prefix("singleton:") {
                Some(kind) => kind
                    .parse()
                    .map(Self::Singleton)
                    .map_err(|_| UnknownCategory(s.to_string())),
                None => Err(UnknownCategory(s.to_string())),
            },
        }
    }
}

impl TryFrom<String> for DocumentCategory {
    type Error = UnknownCategory;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DocumentCategory> for String {
    fn from(value: DocumentCategory) -> Self {
        value.to_string()
    }
}
