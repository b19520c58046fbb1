//! Derived artifacts built from published documents.
//!
//! - **Sitemap**: the site index (`sitemap.xml`), cached under `site-index`

pub mod sitemap;

pub use sitemap::{SITEMAP_KEY, Sitemap};
