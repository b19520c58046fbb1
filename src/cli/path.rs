//! `normalize` and `expand` commands.

use anyhow::{Result, anyhow, bail};

use crate::config::SiteConfig;
use crate::core::CanonicalPath;
use crate::path::{
    PathOwner, ValidationError, localize, normalize_for, normalize_lenient, strip_locale,
};
use crate::{debug, log};

/// Print the canonical form of `raw`, or the rule it violates.
pub fn run_normalize(raw: &str, home: bool) -> Result<()> {
    let owner = if home { PathOwner::Home } else { PathOwner::Document };
    match normalize_for(raw, owner) {
        Ok(path) => {
            println!("{path}");
            Ok(())
        }
        Err(e) => {
            if let ValidationError::DoubleSlash(_) = e
                && let Ok(collapsed) = normalize_lenient(raw, owner)
            {
                log!("hint"; "did you mean `{}`?", collapsed);
            }
            bail!("{} [{}]", e, e.rule())
        }
    }
}

/// Print every localized path of `path`, default locale first.
///
/// Accepts a localized path too; its locale prefix is stripped first.
pub fn run_expand(path: &str, config: &SiteConfig) -> Result<()> {
    let site = config.to_site()?;
    CanonicalPath::parse(path).map_err(|e| anyhow!("{} [{}]", e, e.rule()))?;
    let (locale, canonical) = strip_locale(path, &site.locales)?;
    if !site.locales.is_default(locale) {
        debug!("expand"; "stripped `{}` prefix, canonical path is {}", locale, canonical);
    }
    for locale in site.locales.iter() {
        println!("{}", localize(&canonical, locale, &site.locales));
    }
    Ok(())
}
