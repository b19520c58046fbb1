//! `[i18n]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [i18n]
//! default_locale = "en"       # Served without a URL prefix
//! locales = ["en", "nl"]      # Every other locale is served under `/<code>`
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::core::{LocaleError, LocaleSet};

const FIELD_LOCALES: FieldPath = FieldPath::new("i18n.locales");
const FIELD_DEFAULT: FieldPath = FieldPath::new("i18n.default_locale");

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct I18nConfig {
    pub default_locale: String,
    pub locales: Vec<String>,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            default_locale: "en".into(),
            locales: vec!["en".into()],
        }
    }
}

impl I18nConfig {
    pub fn locale_set(&self) -> Result<LocaleSet, LocaleError> {
        LocaleSet::from_codes(&self.default_locale, &self.locales)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let Err(e) = self.locale_set() else {
            return;
        };
        match &e {
            LocaleError::DefaultNotSupported(_) => diag.error_with_hint(
                FIELD_DEFAULT,
                e.to_string(),
                format!("add `{}` to {}", self.default_locale, FIELD_LOCALES),
            ),
            LocaleError::InvalidCode(code) if code == self.default_locale.trim() => {
                diag.error(FIELD_DEFAULT, e.to_string());
            }
            LocaleError::InvalidCode(_) | LocaleError::Duplicate(_) => {
                diag.error(FIELD_LOCALES, e.to_string());
            }
        }
    }
}
