//! Process-wide config, swapped in once after loading.

use crate::config::SiteConfig;
use arc_swap::ArcSwap;
use std::sync::{Arc, LazyLock};

static ACTIVE: LazyLock<ArcSwap<SiteConfig>> =
    LazyLock::new(|| ArcSwap::from_pointee(SiteConfig::default()));

/// Current config. Defaults until [`init_config`] runs.
#[inline]
pub fn cfg() -> Arc<SiteConfig> {
    ACTIVE.load_full()
}

/// Install the validated config and hand it back to the caller.
pub fn init_config(config: SiteConfig) -> Arc<SiteConfig> {
    let config = Arc::new(config);
    ACTIVE.store(Arc::clone(&config));
    config
}
