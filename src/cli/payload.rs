//! `payload` command.
//!
//! Builds a hook payload from a slug, walking the document through the
//! requested lifecycle steps. Handy for writing `replay` files by hand.

use anyhow::{Result, bail};
use chrono::Utc;

use super::print_json;
use crate::config::SiteConfig;
use crate::core::{DocumentCategory, Locale, Site};
use crate::debug;
use crate::document::LocalizedDocument;
use crate::revalidate::{EventKind, HookPayload};

/// Lifecycle steps applied on top of a fresh draft.
#[derive(Debug, Default, Clone)]
pub struct Steps {
    pub publish: bool,
    pub rename_to: Option<String>,
    pub unpublish: bool,
    pub delete: bool,
}

pub struct PayloadArgs<'a> {
    pub id: &'a str,
    pub slug: &'a str,
    pub category: DocumentCategory,
    pub locale: Option<&'a str>,
    pub steps: Steps,
    pub pretty: bool,
}

pub fn run_payload(args: PayloadArgs<'_>, config: &SiteConfig) -> Result<()> {
    let site = config.to_site()?;
    let locale = match args.locale {
        Some(code) => Locale::parse(code)?,
        None => site.locales.default_locale().clone(),
    };
    if !site.locales.contains(&locale) {
        bail!("locale `{locale}` is not supported");
    }

    let doc = LocalizedDocument::new(args.id, locale, args.category, args.slug, &site)?;
    let payload = build(doc, &args.steps, &site)?;
    debug!("payload"; "{:?} {} -> {}", payload.op, payload.doc.id, payload.doc.canonical_path);
    print_json(&payload, args.pretty)
}

fn build(mut doc: LocalizedDocument, steps: &Steps, site: &Site) -> Result<HookPayload> {
    let now = Utc::now();
    if steps.publish {
        doc.publish(now);
    }

    let mut previous = None;
    if let Some(slug) = &steps.rename_to {
        let before = doc.clone();
        if doc.rename(slug, site)?.is_some() {
            previous = Some(before);
        }
    }
    if steps.unpublish {
        previous.get_or_insert_with(|| doc.clone());
        doc.unpublish(now);
    }

    let op = if steps.delete {
        EventKind::Delete
    } else {
        EventKind::Change
    };
    Ok(HookPayload {
        op,
        previous: previous.filter(|_| op == EventKind::Change),
        doc,
        suppress: false,
    })
}
