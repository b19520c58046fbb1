//! `[site]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [site]
//! url = "https://example.com"   # Base URL for sitemap entries
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

const FIELD_URL: FieldPath = FieldPath::new("site.url");

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSectionConfig {
    /// Public base URL, without trailing slash once resolved.
    pub url: Option<String>,
}

impl SiteSectionConfig {
    /// Base URL used to turn localized paths into absolute `loc`s.
    pub fn base_url(&self) -> &str {
        self.url.as_deref().map_or("", |url| url.trim_end_matches('/'))
    }

    /// Validate site configuration.
    ///
    /// `url` must be a valid http(s) URL with a host.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let Some(url_str) = &self.url else {
            diag.warn(FIELD_URL, "not set, sitemap entries will be relative");
            return;
        };

        match url::Url::parse(url_str) {
            Ok(parsed) => {
                if !matches!(parsed.scheme(), "http" | "https") {
                    diag.error_with_hint(
                        FIELD_URL,
                        format!(
                            "scheme '{}' not supported, must be http or https",
                            parsed.scheme()
                        ),
                        "use format like https://example.com",
                    );
                }
                if parsed.host_str().is_none() {
                    diag.error_with_hint(
                        FIELD_URL,
                        "URL must have a valid host",
                        "use format like https://example.com",
                    );
                }
            }
            Err(e) => {
                diag.error_with_hint(
                    FIELD_URL,
                    format!("invalid URL: {e}"),
                    "use format like https://example.com",
                );
            }
        }
    }
}
