//! Locale path expansion and its inverse.
//!
//! ```text
//! canonical        en (default)     nl
//! =========        ============     ==
//! /                /                /nl
//! /blog/launch     /blog/launch     /nl/blog/launch
//! ```
//!
//! Every locale-aware URL derivation goes through [`localize`] and
//! [`strip_locale`] so the two stay exact inverses.

use std::collections::BTreeSet;

use super::{PathOwner, ValidationError, normalize_for};
use crate::core::{CanonicalPath, Locale, LocaleError, LocaleSet};

/// All route paths of one canonical path, across locales.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathSet(BTreeSet<String>);

impl PathSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>) -> bool {
        self.0.insert(path.into())
    }

    pub fn extend(&mut self, other: PathSet) {
        self.0.extend(other.0);
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.contains(path)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0.into_iter().collect()
    }
}

impl IntoIterator for PathSet {
    type Item = String;
    type IntoIter = std::collections::btree_set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<String> for PathSet {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Localized path of `canonical` for a single locale.
///
/// The home path degrades to `/{locale}` (never `/{locale}/`).
pub fn localize(canonical: &CanonicalPath, locale: &Locale, locales: &LocaleSet) -> String {
    if locales.is_default(locale) {
        canonical.as_str().to_string()
    } else if canonical.is_root() {
        format!("/{locale}")
    } else {
        format!("/{locale}{canonical}")
    }
}

/// Every locale-qualified route path of `canonical`.
pub fn expand(canonical: &CanonicalPath, locales: &LocaleSet) -> PathSet {
    locales
        .iter()
        .map(|locale| localize(canonical, locale, locales))
        .collect()
}

/// Recover `(locale, canonical)` from a possibly locale-prefixed path.
///
/// A leading segment equal to a prefixed locale is stripped; anything else
/// belongs to the default locale unchanged.
pub fn strip_locale<'a>(
    path: &str,
    locales: &'a LocaleSet,
) -> Result<(&'a Locale, CanonicalPath), ValidationError> {
    let canonical = normalize_for(path, PathOwner::Home)?;

    let Some(locale) = canonical
        .first_segment()
        .and_then(|segment| locales.find_prefix(segment))
    else {
        return Ok((locales.default_locale(), canonical));
    };

    let rest = &canonical.as_str()[locale.as_str().len() + 1..];
    let stripped = if rest.is_empty() {
        CanonicalPath::root()
    } else {
        CanonicalPath::from_validated(rest)
    };
    Ok((locale, stripped))
}

/// Errors from the string-typed renderer entry point.
#[derive(Debug, thiserror::Error)]
pub enum ExpandError {
    #[error(transparent)]
    Path(#[from] ValidationError),
    #[error(transparent)]
    Locale(#[from] LocaleError),
}

/// Renderer-facing expansion over plain strings.
///
/// Accepts `/` (home) as well as regular canonical paths.
pub fn canonical_to_localized_paths<S: AsRef<str>>(
    canonical: &str,
    locales: &[S],
    default: &str,
) -> Result<Vec<String>, ExpandError> {
    let canonical = CanonicalPath::parse(canonical)?;
    let locales = LocaleSet::from_codes(default, locales)?;
    Ok(locales
        .iter()
        .map(|locale| localize(&canonical, locale, &locales))
        .collect())
}
