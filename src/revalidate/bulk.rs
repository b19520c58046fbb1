//! Bulk sessions: suppressed events flushed as one batch.
//!
//! Imports and seeding save many documents with `suppress = true`. A session
//! remembers what each of them would have invalidated and issues the union
//! once on [`BulkSession::finish`], so the site index is rebuilt once per
//! import rather than once per document.

use parking_lot::Mutex;

use super::{DispatchReport, Dispatcher, InvalidationPlan, RevalidationEvent, plan};
use crate::document::LocalizedDocument;
use crate::log;
use crate::utils::plural_s;

pub struct BulkSession<'a> {
    dispatcher: &'a Dispatcher,
    pending: Mutex<Pending>,
}

#[derive(Default)]
struct Pending {
    plan: InvalidationPlan,
    events: usize,
}

impl<'a> BulkSession<'a> {
    pub(super) fn new(dispatcher: &'a Dispatcher) -> Self {
        Self {
            dispatcher,
            pending: Mutex::new(Pending::default()),
        }
    }

    /// Record one event. Unsuppressed events dispatch immediately.
    pub fn record(&self, event: RevalidationEvent) -> LocalizedDocument {
        if !event.context.suppress {
            return self.dispatcher.dispatch(event).document;
        }
        let planned = plan::plan_unsuppressed(&event, self.dispatcher.site());
        let mut pending = self.pending.lock();
        pending.events += 1;
        if let Some(planned) = planned {
            pending.plan.merge(planned);
        }
        event.into_document()
    }

    /// Suppressed events recorded so far.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.pending.lock().events
    }

    /// Combined plan that [`finish`](Self::finish) will execute.
    #[cfg(test)]
    pub fn pending_plan(&self) -> InvalidationPlan {
        self.pending.lock().plan.clone()
    }

    /// Execute the merged plan once.
    pub fn finish(self) -> DispatchReport {
        let Pending { plan, events } = self.pending.into_inner();
        if plan.is_empty() {
            return DispatchReport::default();
        }
        log!("revalidate"; "bulk flush: {} event{}, {} call{}",
            events, plural_s(events), plan.len(), plural_s(plan.len()));
        self.dispatcher.execute(&plan)
    }
}
