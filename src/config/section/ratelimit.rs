//! `[ratelimit]` section configuration.
//!
//! Applies to the refresh endpoint, keyed by client address.
//!
//! ```toml
//! [ratelimit]
//! window_secs = 60
//! max_requests = 10
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

const FIELD_WINDOW: FieldPath = FieldPath::new("ratelimit.window_secs");
const FIELD_MAX: FieldPath = FieldPath::new("ratelimit.max_requests");

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub window_secs: u64,
    pub max_requests: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: 60,
            max_requests: 10,
        }
    }
}

impl RateLimitConfig {
    pub const fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.window_secs == 0 {
            diag.error(FIELD_WINDOW, "must be at least 1 second");
        }
        if self.max_requests == 0 {
            diag.error(FIELD_MAX, "must be at least 1");
        }
    }
}
