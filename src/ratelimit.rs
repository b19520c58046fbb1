//! Fixed-window rate limiting keyed by client.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Purge expired windows every this many checks.
const PURGE_EVERY: u64 = 256;

/// Admission check for an external trigger.
pub trait RateLimiter: Send + Sync {
    /// Record one hit for `key`; `false` when the key is over its limit.
    fn check(&self, key: &str) -> bool;
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    hits: u32,
}

/// In-process limiter with TTL-bounded entries.
#[derive(Debug)]
pub struct TtlRateLimiter {
    window: Duration,
    max_requests: u32,
    windows: DashMap<String, Window>,
    checks: AtomicU64,
}

impl TtlRateLimiter {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            window,
            max_requests,
            windows: DashMap::new(),
            checks: AtomicU64::new(0),
        }
    }

    fn check_at(&self, key: &str, now: Instant) -> bool {
        if self.checks.fetch_add(1, Ordering::Relaxed) % PURGE_EVERY == PURGE_EVERY - 1 {
            self.purge(now);
        }

        let mut window = self.windows.entry(key.to_string()).or_insert(Window {
            started: now,
            hits: 0,
        });
        if now.duration_since(window.started) >= self.window {
            *window = Window {
                started: now,
                hits: 0,
            };
        }
        window.hits = window.hits.saturating_add(1);
        window.hits <= self.max_requests
    }

    /// Drop windows that have expired.
    pub fn purge(&self, now: Instant) {
        self.windows
            .retain(|_, w| now.duration_since(w.started) < self.window);
    }

    /// Keys currently tracked.
    #[cfg(test)]
    pub fn tracked(&self) -> usize {
        self.windows.len()
    }
}

impl RateLimiter for TtlRateLimiter {
    fn check(&self, key: &str) -> bool {
        self.check_at(key, Instant::now())
    }
}
