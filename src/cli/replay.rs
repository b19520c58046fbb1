//! `replay` command.
//!
//! Feeds recorded hook payloads through a fresh engine whose invalidator
//! only records calls, then prints what each event decided and every call
//! that would have been issued.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;

use super::print_json;
use crate::cache::{Invalidation, RecordingInvalidator, TagRegistry};
use crate::config::SiteConfig;
use crate::core::Locale;
use crate::document::conflict::{collect_path_sources, detect_conflicts, print_conflicts};
use crate::document::{DocumentId, LocalizedDocument};
use crate::engine::Engine;
use crate::revalidate::{
    Decision, DispatchReport, EventKind, HookPayload, RevalidationEvent,
};
use crate::utils::plural_count;
use crate::{debug, log};

#[derive(Debug, Serialize)]
struct ReplayEntry {
    index: usize,
    op: EventKind,
    id: DocumentId,
    locale: Locale,
    #[serde(flatten)]
    outcome: Outcome,
}

#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
enum Outcome {
    Dispatched {
        decision: Decision,
        report: DispatchReport,
    },
    /// Held back for the bulk flush.
    Deferred,
    Rejected { error: String },
}

#[derive(Debug, Serialize)]
struct ReplayOutput {
    events: Vec<ReplayEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bulk_flush: Option<DispatchReport>,
    invalidations: Vec<Invalidation>,
}

pub fn run_replay(file: &Path, bulk: bool, pretty: bool, config: &SiteConfig) -> Result<()> {
    let content =
        fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;
    let payloads: Vec<HookPayload> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", file.display()))?;

    let conflicts = detect_conflicts(
        &collect_path_sources(&final_states(&payloads)),
        &config.to_site()?.locales,
    );
    print_conflicts(&conflicts);

    let recorder = Arc::new(RecordingInvalidator::new());
    let engine = Engine::new(
        config.to_site()?,
        TagRegistry::in_memory(),
        recorder.clone(),
        config.refresh_trigger()?,
        config.site.base_url(),
    );

    let output = replay(&engine, &recorder, payloads, bulk);
    log!("replay"; "{}, {}", plural_count(output.events.len(), "event"),
        plural_count(output.invalidations.len(), "invalidation"));
    print_json(&output, pretty)
}

fn replay(
    engine: &Engine,
    recorder: &RecordingInvalidator,
    payloads: Vec<HookPayload>,
    bulk: bool,
) -> ReplayOutput {
    let session = bulk.then(|| engine.begin_bulk());
    let mut events = Vec::with_capacity(payloads.len());

    for (index, payload) in payloads.into_iter().enumerate() {
        let (op, id, locale) = (payload.op, payload.doc.id.clone(), payload.doc.locale.clone());
        let event = RevalidationEvent::from(payload);

        let outcome = match &session {
            Some(session) if event.context.suppress => engine
                .on_bulk_event(session, event)
                .map(|()| Outcome::Deferred),
            _ => engine.on_event(event).map(|dispatched| Outcome::Dispatched {
                decision: dispatched.decision,
                report: dispatched.report,
            }),
        }
        .unwrap_or_else(|e| {
            log!("replay"; "event {} ({}) rejected: {}", index, id, e);
            Outcome::Rejected {
                error: e.to_string(),
            }
        });

        debug!("replay"; "event {}: {:?}", index, outcome);
        events.push(ReplayEntry {
            index,
            op,
            id,
            locale,
            outcome,
        });
    }

    ReplayOutput {
        events,
        bulk_flush: session.map(|s| s.finish()),
        invalidations: recorder.take(),
    }
}

/// Last state of every document after applying the payloads in order.
fn final_states(payloads: &[HookPayload]) -> Vec<LocalizedDocument> {
    let mut docs = BTreeMap::new();
    for payload in payloads {
        let key = (payload.doc.locale.clone(), payload.doc.id.clone());
        match payload.op {
            EventKind::Change => {
                docs.insert(key, payload.doc.clone());
            }
            EventKind::Delete => {
                docs.remove(&key);
            }
        }
    }
    docs.into_values().collect()
}
