//! Locale codes and the supported locale set.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Locale-related errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocaleError {
    #[error("invalid locale code `{0}` (expected e.g. `en` or `pt-BR`)")]
    InvalidCode(String),

    #[error("locale `{0}` is listed more than once")]
    Duplicate(String),

    #[error("default locale `{0}` is not in the supported locales")]
    DefaultNotSupported(String),
}

/// A locale code such as `en`, `nl` or `pt-BR`.
///
/// Doubles as the URL prefix segment for non-default locales.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Locale(Arc<str>);

impl Locale {
    /// Parse a locale code: two lowercase letters, optionally followed by
    /// `-` and a two-letter region.
    pub fn parse(code: &str) -> Result<Self, LocaleError> {
        let code = code.trim();
        let valid = match code.split_once('-') {
            Some((lang, region)) => is_lang(lang) && is_region(region),
            None => is_lang(code),
        };
        if valid {
            Ok(Self(Arc::from(code)))
        } else {
            Err(LocaleError::InvalidCode(code.to_string()))
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_lang(s: &str) -> bool {
    s.len() == 2 && s.bytes().all(|b| b.is_ascii_lowercase())
}

fn is_region(s: &str) -> bool {
    s.len() == 2 && s.bytes().all(|b| b.is_ascii_alphabetic())
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Locale {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for Locale {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Locale {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// The supported locales with their default.
///
/// The default locale is always first; the rest keep configuration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleSet {
    locales: Vec<Locale>,
}

impl LocaleSet {
    /// Build a set from a default locale and all supported locales.
    ///
    /// `supported` may or may not repeat the default.
    pub fn new(
        default: Locale,
        supported: impl IntoIterator<Item = Locale>,
    ) -> Result<Self, LocaleError> {
        let mut locales = vec![default.clone()];
        let mut seen_default = false;
        for locale in supported {
            if locale == default {
                if seen_default {
                    return Err(LocaleError::Duplicate(locale.to_string()));
                }
                seen_default = true;
                continue;
            }
            if locales.contains(&locale) {
                return Err(LocaleError::Duplicate(locale.to_string()));
            }
            locales.push(locale);
        }
        Ok(Self { locales })
    }

    /// Parse from raw codes, requiring the default to be listed.
    pub fn from_codes<S: AsRef<str>>(default: &str, codes: &[S]) -> Result<Self, LocaleError> {
        let default = Locale::parse(default)?;
        let supported = codes
            .iter()
            .map(|c| Locale::parse(c.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        if !supported.is_empty() && !supported.contains(&default) {
            return Err(LocaleError::DefaultNotSupported(default.to_string()));
        }
        Self::new(default, supported)
    }

    /// A set with only one (default) locale.
    pub fn single(default: Locale) -> Self {
        Self {
            locales: vec![default],
        }
    }

    #[inline]
    pub fn default_locale(&self) -> &Locale {
        &self.locales[0]
    }

    #[inline]
    pub fn is_default(&self, locale: &Locale) -> bool {
        self.default_locale() == locale
    }

    pub fn contains(&self, locale: &Locale) -> bool {
        self.locales.contains(locale)
    }

    /// All locales, default first.
    pub fn iter(&self) -> impl Iterator<Item = &Locale> {
        self.locales.iter()
    }

    /// Locales that carry a URL prefix.
    pub fn prefixed(&self) -> impl Iterator<Item = &Locale> {
        self.locales.iter().skip(1)
    }

    /// Find the prefixed locale whose code equals a URL segment.
    pub fn find_prefix(&self, segment: &str) -> Option<&Locale> {
        self.prefixed().find(|l| l.as_str() == segment)
    }

    pub fn len(&self) -> usize {
        self.locales.len()
    }
}

impl Default for LocaleSet {
    fn default() -> Self {
        Self::single(Locale(Arc::from("en")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locale(code: &str) -> Locale {
        Locale::parse(code).unwrap()
    }

    #[test]
    fn test_parse_locale() {
        assert_eq!(locale("en").as_str(), "en");
        assert_eq!(locale("pt-BR").as_str(), "pt-BR");
        assert_eq!(locale(" nl ").as_str(), "nl");
        assert!(Locale::parse("EN").is_err());
        assert!(Locale::parse("eng").is_err());
        assert!(Locale::parse("").is_err());
        assert!(Locale::parse("en-").is_err());
        assert!(Locale::parse("en/us").is_err());
    }

    #[test]
    fn test_default_first() {
        let set = LocaleSet::from_codes("nl", &["en", "nl", "de"]).unwrap();
        let codes: Vec<_> = set.iter().map(Locale::as_str).collect();
        assert_eq!(codes, vec!["nl", "en", "de"]);
        assert_eq!(set.default_locale().as_str(), "nl");
        assert_eq!(set.prefixed().count(), 2);
    }

    #[test]
    fn test_default_must_be_supported() {
        assert_eq!(
            LocaleSet::from_codes("fr", &["en", "nl"]),
            Err(LocaleError::DefaultNotSupported("fr".into()))
        );
    }

    #[test]
    fn test_duplicates_rejected() {
        assert_eq!(
            LocaleSet::from_codes("en", &["en", "nl", "nl"]),
            Err(LocaleError::Duplicate("nl".into()))
        );
        assert_eq!(
            LocaleSet::from_codes("en", &["en", "en"]),
            Err(LocaleError::Duplicate("en".into()))
        );
    }

    #[test]
    fn test_find_prefix() {
        let set = LocaleSet::from_codes("en", &["en", "nl"]).unwrap();
        assert_eq!(set.find_prefix("nl"), Some(&locale("nl")));
        // Default locale never appears as a prefix
        assert_eq!(set.find_prefix("en"), None);
        assert_eq!(set.find_prefix("blog"), None);
    }

    #[test]
    fn test_empty_supported_means_default_only() {
        let set = LocaleSet::from_codes::<&str>("en", &[]).unwrap();
        assert_eq!(set.len(), 1);
    }
}
