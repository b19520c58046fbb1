//! Canonical path derivation from the human-editable slug field.
//!
//! | Category            | Slug              | Canonical path          |
//! |---------------------|-------------------|-------------------------|
//! | `singleton:home`    | (ignored)         | `/`                     |
//! | `post`              | `Launch Day!`     | `/blog/launch-day`      |
//! | `page`              | `Services/Web`    | `/services/web`         |
//! | `singleton:contact` | `Contact`         | `/contact`              |

use super::{PathOwner, ValidationError, normalize_lenient};
use crate::core::{CanonicalPath, DocumentCategory, RoutePolicy};

/// Slugify one path segment: transliterate to ASCII, lowercase, and join
/// alphanumeric runs with `-`.
pub fn slugify_segment(text: &str) -> String {
    let ascii = deunicode::deunicode(text);
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_dash = false;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Slugify every `/`-separated segment, dropping segments that slugify to
/// nothing.
pub fn slugify_path(text: &str) -> String {
    text.split('/')
        .map(slugify_segment)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Derive the canonical path of a document from its slug.
pub fn derive_canonical(
    category: DocumentCategory,
    slug: &str,
    routes: &RoutePolicy,
) -> Result<CanonicalPath, ValidationError> {
    if category.is_home() {
        return Ok(CanonicalPath::root());
    }
    if slug.trim().is_empty() {
        return Err(ValidationError::Empty);
    }

    let slugged = slugify_path(slug);
    if slugged.is_empty() {
        let ch = slug.trim().chars().next().unwrap_or('/');
        return Err(ValidationError::InvalidCharacters {
            path: slug.to_string(),
            ch,
        });
    }

    let base = match category {
        DocumentCategory::Post => routes.listing_path(category).cloned(),
        DocumentCategory::Page | DocumentCategory::Singleton(_) => None,
    };

    let raw = match base {
        Some(base) if !base.is_root() => format!("{base}/{slugged}"),
        _ => slugged,
    };
    normalize_lenient(&raw, PathOwner::Document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SingletonKind;

    #[test]
    fn test_slugify_segment() {
        assert_eq!(slugify_segment("Launch Day!"), "launch-day");
        assert_eq!(slugify_segment("  Hello,   World  "), "hello-world");
        assert_eq!(slugify_segment("Crème Brûlée"), "creme-brulee");
        assert_eq!(slugify_segment("snake_case ok"), "snake_case-ok");
        assert_eq!(slugify_segment("---"), "");
    }

    #[test]
    fn test_slugify_path() {
        assert_eq!(slugify_path("Services/Web Sites"), "services/web-sites");
        assert_eq!(slugify_path("/a//b/"), "a/b");
    }

    #[test]
    fn test_derive_post() {
        let routes = RoutePolicy::default();
        let path = derive_canonical(DocumentCategory::Post, "Launch", &routes).unwrap();
        assert_eq!(path, "/blog/launch");
    }

    #[test]
    fn test_derive_post_without_listing() {
        let routes = RoutePolicy {
            post_listing: None,
            ..RoutePolicy::default()
        };
        let path = derive_canonical(DocumentCategory::Post, "launch", &routes).unwrap();
        assert_eq!(path, "/launch");
    }

    #[test]
    fn test_derive_page_nested() {
        let routes = RoutePolicy::default();
        let path = derive_canonical(DocumentCategory::Page, "services/websites", &routes).unwrap();
        assert_eq!(path, "/services/websites");
    }

    #[test]
    fn test_derive_home_ignores_slug() {
        let routes = RoutePolicy::default();
        let path = derive_canonical(DocumentCategory::HOME, "anything", &routes).unwrap();
        assert!(path.is_root());
    }

    #[test]
    fn test_derive_singleton() {
        let routes = RoutePolicy::default();
        let category = DocumentCategory::Singleton(SingletonKind::Contact);
        assert_eq!(
            derive_canonical(category, "Contact Us", &routes).unwrap(),
            "/contact-us"
        );
    }

    #[test]
    fn test_derive_rejects_empty() {
        let routes = RoutePolicy::default();
        assert_eq!(
            derive_canonical(DocumentCategory::Page, " ", &routes),
            Err(ValidationError::Empty)
        );
        // Nothing survives slugification
        assert_eq!(
            derive_canonical(DocumentCategory::Post, "!!!", &routes)
                .unwrap_err()
                .rule(),
            "invalid-characters"
        );
    }

    #[test]
    fn test_derive_is_deterministic() {
        let routes = RoutePolicy::default();
        let a = derive_canonical(DocumentCategory::Post, "Über uns", &routes).unwrap();
        let b = derive_canonical(DocumentCategory::Post, "Über uns", &routes).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, "/blog/uber-uns");
    }
}
