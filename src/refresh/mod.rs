//! Periodic refresh trigger.
//!
//! An external scheduler calls the refresh endpoint to re-touch a fixed
//! allow-list of high-traffic pages. It closes the staleness window left by
//! failed invalidations, so it must be idempotent and cheap.

use serde::Serialize;
use thiserror::Error;

use crate::core::{CanonicalPath, Site};
use crate::path::expand;
use crate::revalidate::{DispatchReport, Dispatcher, InvalidationPlan};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshError {
    #[error("refresh secret is missing or invalid")]
    Unauthorized,

    #[error("refresh is disabled (no secret configured)")]
    Disabled,
}

/// Body returned to the external caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshReport {
    pub count: usize,
    pub paths: Vec<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub failed: usize,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

#[derive(Debug, Clone)]
pub struct RefreshTrigger {
    paths: Vec<CanonicalPath>,
    secret: Option<blake3::Hash>,
}

impl RefreshTrigger {
    /// Build from an allow-list of canonical paths. Home is always included.
    pub fn new(allow_list: impl IntoIterator<Item = CanonicalPath>, secret: Option<&str>) -> Self {
        let mut paths = vec![CanonicalPath::root()];
        for path in allow_list {
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
        Self {
            paths,
            secret: secret
                .filter(|s| !s.is_empty())
                .map(|s| blake3::hash(s.as_bytes())),
        }
    }

    pub fn allow_list(&self) -> &[CanonicalPath] {
        &self.paths
    }

    /// Check a presented secret.
    ///
    /// Digests are compared, and `blake3::Hash` equality is constant-time.
    pub fn authorize(&self, presented: Option<&str>) -> Result<(), RefreshError> {
        let expected = self.secret.ok_or(RefreshError::Disabled)?;
        let presented = presented.ok_or(RefreshError::Unauthorized)?;
        if blake3::hash(presented.as_bytes()) == expected {
            Ok(())
        } else {
            Err(RefreshError::Unauthorized)
        }
    }

    /// Every localized path of the allow-list.
    pub fn plan(&self, site: &Site) -> InvalidationPlan {
        let mut plan = InvalidationPlan::default();
        for path in &self.paths {
            plan.paths.extend(expand(path, &site.locales));
        }
        plan
    }

    /// Re-touch the allow-list without authentication (local one-shot).
    pub fn run(&self, dispatcher: &Dispatcher) -> RefreshReport {
        let plan = self.plan(dispatcher.site());
        let DispatchReport { failed, .. } = dispatcher.execute(&plan);
        let paths = plan.paths.into_vec();
        RefreshReport {
            count: paths.len(),
            paths,
            failed: failed.len(),
        }
    }

    /// Authenticate, then re-touch the allow-list.
    pub fn trigger(
        &self,
        presented: Option<&str>,
        dispatcher: &Dispatcher,
    ) -> Result<RefreshReport, RefreshError> {
        self.authorize(presented)?;
        Ok(self.run(dispatcher))
    }
}
