//! `resolve` command.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::SiteConfig;
use crate::core::Locale;
use crate::document::LocalizedDocument;
use crate::link::{LinkDescriptor, ResolveContext, SingletonSnapshot, resolve};
use crate::utils::plural_s;
use crate::{debug, log};

/// Resolve one JSON link descriptor and print the href.
///
/// Singletons come from `singletons` (a JSON array of documents); without it
/// every singleton reference falls back to the locale root.
pub fn run_resolve(
    link: &str,
    locale: Option<&str>,
    singletons: Option<&Path>,
    config: &SiteConfig,
) -> Result<()> {
    let site = config.to_site()?;
    let link: LinkDescriptor = serde_json::from_str(link).context("invalid link descriptor")?;
    let locale = match locale {
        Some(code) => Locale::parse(code)?,
        None => site.locales.default_locale().clone(),
    };

    let snapshot = match singletons {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let docs: Vec<LocalizedDocument> = serde_json::from_str(&content)
                .with_context(|| format!("failed to parse {}", path.display()))?;
            let live = docs.into_iter().filter(|d| d.is_published());
            SingletonSnapshot::from_documents(locale.clone(), live)
        }
        None => SingletonSnapshot::empty(locale.clone()),
    };
    let n = snapshot.len();
    debug!("resolve"; "{} singleton{} for {}", n, plural_s(n), snapshot.locale());

    let href = resolve(&link, &snapshot, ResolveContext::new(&locale, &site.locales));
    if href.is_omitted() {
        log!("resolve"; "target unavailable, link omitted");
    } else {
        println!("{href}");
    }
    Ok(())
}
