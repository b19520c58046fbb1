//! Hook server: document webhooks, the refresh trigger, and the sitemap.

mod lifecycle;
mod response;
mod routes;

pub use response::Reply;
pub use routes::{Incoming, route};

use crate::{config::cfg, debug, engine::Engine, log, ratelimit::TtlRateLimiter};
use anyhow::{Context, Result};
use std::io::Read;
use std::net::SocketAddr;
use std::sync::Arc;
use tiny_http::{Request, Server};

/// Largest accepted request body.
const MAX_BODY_BYTES: u64 = 1 << 20;

/// Bound server ready to accept requests
pub struct BoundServer {
    server: Arc<Server>,
}

/// Bind the HTTP server without starting the request loop
pub fn bind_server() -> Result<BoundServer> {
    let config = cfg();
    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);
    crate::core::register_server(Arc::clone(&server));

    log!("serve"; "http://{}", addr);
    Ok(BoundServer { server })
}

impl BoundServer {
    /// Start the request loop (blocking) until Ctrl+C.
    pub fn run(self, engine: Engine, limiter: TtlRateLimiter, workers: usize) -> Result<()> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("lanes-http-{i}"))
            .build()
            .context("failed to create request thread pool")?;

        let engine = Arc::new(engine);
        let limiter = Arc::new(limiter);
        for request in self.server.incoming_requests() {
            let engine = Arc::clone(&engine);
            let limiter = Arc::clone(&limiter);
            pool.spawn(move || {
                if let Err(e) = handle_request(request, &engine, limiter.as_ref()) {
                    log!("serve"; "request error: {e}");
                }
            });
        }
        Ok(())
    }
}

/// Handle a single HTTP request
fn handle_request(mut request: Request, engine: &Engine, limiter: &TtlRateLimiter) -> Result<()> {
    if crate::core::is_shutdown() {
        return response::send(request, Reply::unavailable());
    }

    let mut body = Vec::new();
    request
        .as_reader()
        .take(MAX_BODY_BYTES)
        .read_to_end(&mut body)
        .context("failed to read request body")?;

    let authorization = request
        .headers()
        .iter()
        .find(|h| h.field.equiv("Authorization"))
        .map(|h| h.value.as_str().to_string());

    let reply = {
        let incoming = Incoming {
            method: request.method().clone(),
            url: request.url(),
            authorization: authorization.as_deref(),
            client: request.remote_addr().map(SocketAddr::ip),
            body: &body,
        };
        let reply = route(&incoming, engine, limiter);
        debug!("serve"; "{} {} -> {}", incoming.method, incoming.url, reply.status);
        reply
    };

    response::send(request, reply)
}
