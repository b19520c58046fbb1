//! `serve` command.

use anyhow::Result;

use crate::config::SiteConfig;
use crate::engine::Engine;
use crate::server::bind_server;
use crate::{debug, log};

/// Bind and run the hook server until Ctrl+C.
pub fn run_serve(config: &SiteConfig) -> Result<()> {
    let engine = Engine::from_config(config)?;
    debug!("serve"; "config {}", config.config_path.display());
    debug!("serve"; "{:?}", engine);
    if config.refresh.resolve_secret().is_none() {
        log!("refresh"; "no secret configured, POST /refresh is disabled");
    }

    let server = bind_server()?;
    server.run(engine, config.rate_limiter(), config.serve.workers)
}
