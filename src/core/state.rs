//! Ctrl+C handling for `serve`.
//!
//! The first interrupt marks the process as stopping. Once a server is
//! registered it is unblocked so the request loop drains; before that the
//! process exits right away.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use anyhow::{Context, Result};
use tiny_http::Server;

use crate::{debug, log};

static STOPPING: AtomicBool = AtomicBool::new(false);

static SERVER: OnceLock<Arc<Server>> = OnceLock::new();

/// Install the interrupt handler. Call once, before anything blocks.
pub fn setup_shutdown_handler() -> Result<()> {
    ctrlc::set_handler(on_interrupt).context("failed to install Ctrl+C handler")
}

fn on_interrupt() {
    STOPPING.store(true, Ordering::SeqCst);
    match SERVER.get() {
        Some(server) => {
            log!("serve"; "interrupted, finishing in-flight requests");
            server.unblock();
        }
        None => std::process::exit(130),
    }
}

/// Hand the bound server to the interrupt handler. Later calls are ignored.
pub fn register_server(server: Arc<Server>) {
    if SERVER.set(server).is_err() {
        debug!("serve"; "server already registered for shutdown");
    }
}

/// New requests are refused with 503 once this is set.
pub fn is_shutdown() -> bool {
    STOPPING.load(Ordering::SeqCst)
}
