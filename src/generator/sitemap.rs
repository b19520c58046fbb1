//! Sitemap generation.
//!
//! The sitemap is the site index: every published document in every locale,
//! with `hreflang` alternates linking the locale variants of one document.
//!
//! # Sitemap Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"
//!         xmlns:xhtml="http://www.w3.org/1999/xhtml">
//!   <url>
//!     <loc>https://example.com/about</loc>
//!     <lastmod>2025-01-01</lastmod>
//!     <xhtml:link rel="alternate" hreflang="en" href="https://example.com/about"/>
//!     <xhtml:link rel="alternate" hreflang="nl" href="https://example.com/nl/about"/>
//!   </url>
//! </urlset>
//! ```

use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::core::{CategoryClass, Site};
use crate::document::{DocumentFilter, DocumentId, DocumentStore, LocalizedDocument, StoreError};

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";

/// Cache key of the rendered sitemap.
pub const SITEMAP_KEY: &str = "sitemap.xml";

pub struct Sitemap {
    urls: Vec<UrlEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct UrlEntry {
    loc: String,
    lastmod: Option<String>,
    /// (hreflang, href), only when the document exists in several locales
    alternates: Vec<(String, String)>,
}

impl Sitemap {
    /// Collect index-feeding published documents across all locales.
    pub fn collect(
        store: &dyn DocumentStore,
        site: &Site,
        base_url: &str,
    ) -> Result<Self, StoreError> {
        let base_url = base_url.trim_end_matches('/');
        let filter = DocumentFilter::published();

        let mut by_id: BTreeMap<DocumentId, Vec<LocalizedDocument>> = BTreeMap::new();
        for locale in site.locales.iter() {
            for class in [CategoryClass::Page, CategoryClass::Post, CategoryClass::Singleton] {
                for doc in store.find_documents_by_category(class, locale, &filter)? {
                    if site.routes.feeds_index(doc.category) {
                        by_id.entry(doc.id.clone()).or_default().push(doc);
                    }
                }
            }
        }

        let mut urls = Vec::new();
        for variants in by_id.values() {
            let alternates: Vec<(String, String)> = if variants.len() > 1 {
                variants
                    .iter()
                    .map(|d| (d.locale.to_string(), absolute(base_url, &d.href(&site.locales))))
                    .collect()
            } else {
                Vec::new()
            };
            for doc in variants {
                urls.push(UrlEntry {
                    loc: absolute(base_url, &doc.href(&site.locales)),
                    lastmod: doc.last_modified().map(|t| t.format("%Y-%m-%d").to_string()),
                    alternates: alternates.clone(),
                });
            }
        }
        urls.sort_by(|a, b| a.loc.cmp(&b.loc));

        Ok(Self { urls })
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn into_xml(self) -> String {
        let mut xml = String::with_capacity(4096);

        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str("<urlset xmlns=\"");
        xml.push_str(SITEMAP_NS);
        xml.push_str("\" xmlns:xhtml=\"");
        xml.push_str(XHTML_NS);
        xml.push_str("\">\n");

        for entry in self.urls {
            xml.push_str("  <url>\n    <loc>");
            xml.push_str(&escape_xml(&entry.loc));
            xml.push_str("</loc>\n");
            if let Some(lastmod) = entry.lastmod {
                xml.push_str("    <lastmod>");
                xml.push_str(&lastmod);
                xml.push_str("</lastmod>\n");
            }
            for (lang, href) in &entry.alternates {
                xml.push_str("    <xhtml:link rel=\"alternate\" hreflang=\"");
                xml.push_str(&escape_xml(lang));
                xml.push_str("\" href=\"");
                xml.push_str(&escape_xml(href));
                xml.push_str("\"/>\n");
            }
            xml.push_str("  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }
}

fn absolute(base_url: &str, path: &str) -> String {
    format!("{base_url}{path}")
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> Cow<'_, str> {
    // Fast path: check if escaping is needed
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    Cow::Owned(
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&apos;"),
    )
}
