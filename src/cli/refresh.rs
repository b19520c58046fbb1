//! `refresh` command.

use anyhow::Result;

use super::print_json;
use crate::config::SiteConfig;
use crate::engine::Engine;

/// Run the refresh trigger once, locally, and print its report.
pub fn run_refresh(config: &SiteConfig, pretty: bool) -> Result<()> {
    let engine = Engine::from_config(config)?;
    print_json(&engine.refresh_local(), pretty)
}
