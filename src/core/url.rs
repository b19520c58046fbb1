//! Canonical path type for type-safe route handling.
//!
//! - Only constructed through the path normalizer (or strict validation)
//! - Locale-independent: locale prefixes are added by the expander

use std::borrow::Borrow;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::path::{PathOwner, validate};

/// Locale-independent route path of a document.
///
/// Invariants:
/// - Always starts with `/`
/// - Never ends with `/` (except the root itself)
/// - Never contains `//`
/// - Only `[A-Za-z0-9/_-]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalPath(Arc<str>);

impl CanonicalPath {
    /// Wrap a string that already satisfies the invariants.
    #[inline]
    pub(crate) fn from_validated(path: impl Into<Arc<str>>) -> Self {
        Self(path.into())
    }

    /// The reserved home path `/`.
    pub fn root() -> Self {
        Self(Arc::from("/"))
    }

    /// Parse a stored path in strict form (no repairs).
    ///
    /// Accepts the root, since the stored home document legitimately owns it.
    pub fn parse(path: &str) -> Result<Self, crate::path::ValidationError> {
        validate(path, PathOwner::Home)?;
        Ok(Self::from_validated(path))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if this is the reserved home path.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.0.as_ref() == "/"
    }

    /// First path segment (`/blog/launch` -> `blog`, `/` -> `None`).
    pub fn first_segment(&self) -> Option<&str> {
        self.segments().next()
    }

    /// Iterate path segments, skipping the leading slash.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }
}

impl std::fmt::Display for CanonicalPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for CanonicalPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CanonicalPath {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for CanonicalPath {
    fn eq(&self, other: &str) -> bool {
        self.0.as_ref() == other
    }
}

impl PartialEq<&str> for CanonicalPath {
    fn eq(&self, other: &&str) -> bool {
        self.0.as_ref() == *other
    }
}

impl Serialize for CanonicalPath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CanonicalPath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
