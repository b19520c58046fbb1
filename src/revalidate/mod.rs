//! Revalidation on document lifecycle events.
//!
//! # Module Structure
//!
//! - [`event`]: events and the hook wire format
//! - [`plan`]: pure event -> `InvalidationPlan` decision
//! - [`dispatch`]: parallel, failure-isolated plan execution
//! - [`bulk`]: suppressed-event batching

mod bulk;
mod dispatch;
mod event;
mod plan;

#[cfg(test)]
mod tests;

pub use bulk::BulkSession;
pub use dispatch::{DispatchReport, Dispatched, Dispatcher};
pub use event::{DocumentChange, EventKind, HookContext, HookPayload, RevalidationEvent};
pub use plan::{Decision, InvalidationPlan, NoOpReason, plan};
