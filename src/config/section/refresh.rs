//! `[refresh]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [refresh]
//! secret_env = "LANES_REFRESH_SECRET"   # Or `secret = "..."` inline
//! paths = ["/", "/blog", "/services"]   # Home is always refreshed
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::core::CanonicalPath;
use crate::path::{PathOwner, ValidationError, normalize_for};

const FIELD_SECRET: FieldPath = FieldPath::new("refresh.secret");
const FIELD_SECRET_ENV: FieldPath = FieldPath::new("refresh.secret_env");
const FIELD_PATHS: FieldPath = FieldPath::new("refresh.paths");

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    pub secret: Option<String>,
    /// Environment variable holding the secret; wins over `secret`.
    pub secret_env: Option<String>,
    /// Canonical paths re-touched on every trigger.
    pub paths: Vec<String>,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            secret: None,
            secret_env: None,
            paths: vec!["/".into()],
        }
    }
}

impl RefreshConfig {
    /// The shared secret, or `None` when the endpoint is disabled.
    pub fn resolve_secret(&self) -> Option<String> {
        self.secret_env
            .as_deref()
            .and_then(|var| std::env::var(var).ok())
            .or_else(|| self.secret.clone())
            .filter(|s| !s.is_empty())
    }

    pub fn allow_list(&self) -> Result<Vec<CanonicalPath>, ValidationError> {
        self.paths
            .iter()
            .map(|raw| normalize_for(raw, PathOwner::Home))
            .collect()
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        for raw in &self.paths {
            if let Err(e) = normalize_for(raw, PathOwner::Home) {
                diag.error(FIELD_PATHS, format!("`{raw}`: {e}"));
            }
        }

        if self.secret.is_some() && self.secret_env.is_some() {
            diag.warn(FIELD_SECRET, "ignored because `refresh.secret_env` is set");
        }
        if let Some(var) = &self.secret_env
            && std::env::var(var).is_err()
        {
            diag.warn(FIELD_SECRET_ENV, format!("`{var}` is not set, refresh is disabled"));
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{ConfigDiagnostics, test_parse_config};

    #[test]
    fn test_refresh_defaults() {
        let config = test_parse_config("");
        let paths = config.refresh.allow_list().unwrap();
        assert_eq!(paths.len(), 1);
        assert!(paths[0].is_root());
        assert_eq!(config.refresh.resolve_secret(), None);
    }

    #[test]
    fn test_refresh_paths_normalized() {
        let config = test_parse_config("[refresh]\npaths = [\"/\", \"blog/\", \" /services \"]");
        let paths: Vec<_> = config
            .refresh
            .allow_list()
            .unwrap()
            .into_iter()
            .map(|p| p.as_str().to_string())
            .collect();
        assert_eq!(paths, vec!["/", "/blog", "/services"]);
    }

    #[test]
    fn test_refresh_invalid_path() {
        let config = test_parse_config("[refresh]\npaths = [\"/a//b\"]");
        let mut diag = ConfigDiagnostics::new();
        config.refresh.validate(&mut diag);
        let errors: Vec<_> = diag.errors().collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("/a//b"));
    }

    #[test]
    fn test_refresh_inline_secret() {
        let config = test_parse_config("[refresh]\nsecret = \"hunter2\"");
        assert_eq!(config.refresh.resolve_secret().as_deref(), Some("hunter2"));

        let config = test_parse_config("[refresh]\nsecret = \"\"");
        assert_eq!(config.refresh.resolve_secret(), None);
    }

    #[test]
    fn test_refresh_missing_env_falls_back() {
        let config = test_parse_config(
            "[refresh]\nsecret = \"inline\"\nsecret_env = \"LANES_TEST_UNSET_SECRET_VAR\"",
        );
        assert_eq!(config.refresh.resolve_secret().as_deref(), Some("inline"));
        let mut diag = ConfigDiagnostics::new();
        config.refresh.validate(&mut diag);
        assert_eq!(diag.warnings().count(), 2);
    }
}
