//! Path normalization: raw, author-entered strings to canonical paths.
//!
//! Rules, in order:
//!
//! | Step | Rule                                      | Failure              |
//! |------|-------------------------------------------|----------------------|
//! | 1    | trim whitespace                           | `empty`              |
//! | 2    | prepend `/` if missing                    |                      |
//! | 3    | strip one trailing `/`                    |                      |
//! | 4    | no `//` may remain                        | `double-slash`       |
//! | 5    | no trailing `/` may remain                | `trailing-slash`     |
//! | 6    | `/` is reserved for the home document     | `reserved-root`      |
//! | 7    | only `[A-Za-z0-9/_-]`                     | `invalid-characters` |
//!
//! The strict normalizer repairs one missing leading and one trailing slash
//! and rejects everything else. [`normalize_lenient`] also collapses `/` runs;
//! it is meant for machine-derived input such as slugs and allow-lists.

use thiserror::Error;

use crate::core::CanonicalPath;

/// Path validation failure, naming the first rule violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("path is empty")]
    Empty,

    #[error("path `{0}` must start with `/`")]
    NotAbsolute(String),

    #[error("path `{0}` must not end with `/`")]
    TrailingSlash(String),

    #[error("path `{0}` contains `//`")]
    DoubleSlash(String),

    #[error("path `{path}` contains invalid character `{ch}` (allowed: A-Z a-z 0-9 / _ -)")]
    InvalidCharacters { path: String, ch: char },

    #[error("`/` is reserved for the home document")]
    ReservedRoot,
}

impl ValidationError {
    /// Stable rule name, used in API responses.
    pub const fn rule(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::NotAbsolute(_) => "not-absolute",
            Self::TrailingSlash(_) => "trailing-slash",
            Self::DoubleSlash(_) => "double-slash",
            Self::InvalidCharacters { .. } => "invalid-characters",
            Self::ReservedRoot => "reserved-root",
        }
    }
}

/// Who is claiming a path. Only the home document may own `/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathOwner {
    Home,
    Document,
}

/// Normalize a raw path for a regular (non-home) document.
#[inline]
pub fn normalize(raw: &str) -> Result<CanonicalPath, ValidationError> {
    normalize_for(raw, PathOwner::Document)
}

/// Normalize a raw path on behalf of `owner`.
pub fn normalize_for(raw: &str, owner: PathOwner) -> Result<CanonicalPath, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty);
    }

    let mut path = if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    };

    if path.len() > 1 && path.ends_with('/') {
        path.pop();
    }

    finish(path, owner)
}

/// Normalize, collapsing every run of `/` instead of rejecting it.
pub fn normalize_lenient(raw: &str, owner: PathOwner) -> Result<CanonicalPath, ValidationError> {
    let segments: Vec<&str> = raw.trim().split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() && raw.trim().is_empty() {
        return Err(ValidationError::Empty);
    }
    finish(format!("/{}", segments.join("/")), owner)
}

/// Shared tail of the rule chain (steps 4-7).
fn finish(path: String, owner: PathOwner) -> Result<CanonicalPath, ValidationError> {
    if path.contains("//") {
        return Err(ValidationError::DoubleSlash(path));
    }
    if path.len() > 1 && path.ends_with('/') {
        return Err(ValidationError::TrailingSlash(path));
    }
    if path == "/" {
        return match owner {
            PathOwner::Home => Ok(CanonicalPath::root()),
            PathOwner::Document => Err(ValidationError::ReservedRoot),
        };
    }
    check_characters(&path)?;
    Ok(CanonicalPath::from_validated(path))
}

/// Validate an already-stored path in strict form, without repairing it.
pub fn validate(path: &str, owner: PathOwner) -> Result<(), ValidationError> {
    if path.trim().is_empty() {
        return Err(ValidationError::Empty);
    }
    if !path.starts_with('/') {
        return Err(ValidationError::NotAbsolute(path.to_string()));
    }
    if path.contains("//") {
        return Err(ValidationError::DoubleSlash(path.to_string()));
    }
    if path.len() > 1 && path.ends_with('/') {
        return Err(ValidationError::TrailingSlash(path.to_string()));
    }
    if path == "/" {
        return match owner {
            PathOwner::Home => Ok(()),
            PathOwner::Document => Err(ValidationError::ReservedRoot),
        };
    }
    check_characters(path)
}

fn check_characters(path: &str) -> Result<(), ValidationError> {
    match path
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '/' | '_' | '-')))
    {
        Some(ch) => Err(ValidationError::InvalidCharacters {
            path: path.to_string(),
            ch,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_trailing_slash() {
        assert_eq!(normalize("/about/").unwrap(), "/about");
    }

    #[test]
    fn test_adds_leading_slash() {
        assert_eq!(normalize("about").unwrap(), "/about");
        assert_eq!(normalize("services/websites").unwrap(), "/services/websites");
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(normalize("  /about  ").unwrap(), "/about");
    }

    #[test]
    fn test_double_slash() {
        let err = normalize("//about").unwrap_err();
        assert_eq!(err.rule(), "double-slash");
        assert_eq!(normalize("/a//b").unwrap_err().rule(), "double-slash");
    }

    #[test]
    fn test_trailing_slash_after_one_strip() {
        // Only one trailing slash is repaired
        assert_eq!(normalize("/about//").unwrap_err().rule(), "trailing-slash");
    }

    #[test]
    fn test_empty() {
        assert_eq!(normalize("").unwrap_err(), ValidationError::Empty);
        assert_eq!(normalize("   ").unwrap_err(), ValidationError::Empty);
    }

    #[test]
    fn test_reserved_root() {
        assert_eq!(normalize("/").unwrap_err().rule(), "reserved-root");
        assert!(normalize_for("/", PathOwner::Home).unwrap().is_root());
        assert!(normalize_for(" / ", PathOwner::Home).unwrap().is_root());
    }

    #[test]
    fn test_invalid_characters() {
        let err = normalize("/about us").unwrap_err();
        assert_eq!(err.rule(), "invalid-characters");
        assert_eq!(
            normalize("/blog/post.html").unwrap_err(),
            ValidationError::InvalidCharacters {
                path: "/blog/post.html".into(),
                ch: '.'
            }
        );
        assert_eq!(normalize("/über").unwrap_err().rule(), "invalid-characters");
    }

    #[test]
    fn test_allowed_characters() {
        assert_eq!(normalize("/A-z_09/x").unwrap(), "/A-z_09/x");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "/about/",
            "about",
            "  services/websites ",
            "/blog/launch-day",
            "/A_b-C",
            "x",
            "//about",
            "/",
            "/bad path",
        ];
        for raw in inputs {
            if let Ok(once) = normalize(raw) {
                assert_eq!(normalize(once.as_str()), Ok(once.clone()), "input {raw:?}");
            }
            if let Ok(once) = normalize_for(raw, PathOwner::Home) {
                assert_eq!(
                    normalize_for(once.as_str(), PathOwner::Home),
                    Ok(once.clone()),
                    "home input {raw:?}"
                );
            }
        }
    }

    #[test]
    fn test_lenient_collapses_runs() {
        assert_eq!(
            normalize_lenient("//blog///launch/", PathOwner::Document).unwrap(),
            "/blog/launch"
        );
        assert!(normalize_lenient("///", PathOwner::Home).unwrap().is_root());
        assert_eq!(
            normalize_lenient("///", PathOwner::Document).unwrap_err(),
            ValidationError::ReservedRoot
        );
        assert_eq!(
            normalize_lenient(" ", PathOwner::Home).unwrap_err(),
            ValidationError::Empty
        );
    }

    #[test]
    fn test_validate_strict() {
        assert!(validate("/about", PathOwner::Document).is_ok());
        assert_eq!(
            validate("about", PathOwner::Document).unwrap_err().rule(),
            "not-absolute"
        );
        assert_eq!(
            validate("/about/", PathOwner::Document).unwrap_err().rule(),
            "trailing-slash"
        );
        assert_eq!(
            validate("//about", PathOwner::Document).unwrap_err().rule(),
            "double-slash"
        );
        assert_eq!(
            validate("/", PathOwner::Document).unwrap_err().rule(),
            "reserved-root"
        );
        assert!(validate("/", PathOwner::Home).is_ok());
        assert_eq!(validate("", PathOwner::Home).unwrap_err().rule(), "empty");
    }
}
