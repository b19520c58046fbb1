//! Plan execution against an [`Invalidator`].

use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;

use super::{BulkSession, Decision, InvalidationPlan, RevalidationEvent, plan};
use crate::cache::{InvalidationError, Invalidator};
use crate::core::Site;
use crate::document::LocalizedDocument;
use crate::utils::plural_s;
use crate::{debug, log};

/// Outcome of executing one plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    /// Paths and tags invalidated successfully
    pub invalidated: usize,
    #[serde(serialize_with = "serialize_failures")]
    pub failed: Vec<InvalidationError>,
}

fn serialize_failures<S: serde::Serializer>(
    failed: &[InvalidationError],
    s: S,
) -> Result<S::Ok, S::Error> {
    s.collect_seq(failed.iter().map(ToString::to_string))
}

impl DispatchReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Result of dispatching one event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dispatched {
    /// The event's document, unmodified.
    pub document: LocalizedDocument,
    pub decision: Decision,
    pub report: DispatchReport,
}

/// Turns lifecycle events into invalidation calls.
#[derive(Clone)]
pub struct Dispatcher {
    site: Arc<Site>,
    invalidator: Arc<dyn Invalidator>,
}

impl Dispatcher {
    pub fn new(site: Arc<Site>, invalidator: Arc<dyn Invalidator>) -> Self {
        Self { site, invalidator }
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    /// Plan and execute one event.
    ///
    /// Never fails: invalidation errors are logged and reported, the
    /// document write they follow is already persisted.
    pub fn dispatch(&self, event: RevalidationEvent) -> Dispatched {
        let decision = plan(&event, &self.site);
        let report = match &decision {
            Decision::NoOp { reason } => {
                debug!("revalidate"; "{} {}: no-op ({:?})",
                    event.kind_label(), event.label(), reason);
                DispatchReport::default()
            }
            Decision::Invalidate(plan) => {
                let report = self.execute(plan);
                debug!("revalidate"; "{} {}: {} invalidated, {} failed",
                    event.kind_label(), event.label(), report.invalidated, report.failed.len());
                report
            }
        };
        Dispatched {
            document: event.into_document(),
            decision,
            report,
        }
    }

    /// Issue every call in `plan`. Calls are independent and run in
    /// parallel; one failure never stops the rest.
    pub fn execute(&self, plan: &InvalidationPlan) -> DispatchReport {
        let paths: Vec<&str> = plan.paths.iter().collect();
        let path_results: Vec<_> = paths
            .par_iter()
            .map(|path| self.invalidator.revalidate_path(path))
            .collect();
        let tag_results: Vec<_> = plan
            .tags
            .par_iter()
            .map(|tag| self.invalidator.revalidate_tag(tag))
            .collect();

        let mut report = DispatchReport::default();
        for result in path_results.into_iter().chain(tag_results) {
            match result {
                Ok(()) => report.invalidated += 1,
                Err(e) => {
                    log!("revalidate"; "{}", e);
                    report.failed.push(e);
                }
            }
        }
        if !report.failed.is_empty() {
            let n = report.failed.len();
            log!("revalidate"; "{} invalidation{} failed, stale until next refresh",
                n, plural_s(n));
        }
        report
    }

    /// Start collecting suppressed events for one combined flush.
    pub fn begin_bulk(&self) -> BulkSession<'_> {
        BulkSession::new(self)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher").field("site", &self.site).finish_non_exhaustive()
    }
}

impl RevalidationEvent {
    fn kind_label(&self) -> &'static str {
        match self.kind() {
            super::EventKind::Change => "change",
            super::EventKind::Delete => "delete",
        }
    }

    fn label(&self) -> String {
        let doc = self.new_doc().or(self.previous_doc());
        match doc {
            Some(doc) => format!("{}:{} ({})", doc.locale, doc.id, doc.category),
            None => String::from("<none>"),
        }
    }
}
