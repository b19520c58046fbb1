//! Lifecycle events emitted by the storage collaborator.

use serde::{Deserialize, Serialize};

use crate::core::DocumentCategory;
use crate::document::LocalizedDocument;

/// Per-call flags passed along with a hook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookContext {
    /// Skip revalidation entirely (bulk imports, seeding).
    #[serde(default)]
    pub suppress: bool,
}

impl HookContext {
    pub const SUPPRESSED: Self = Self { suppress: true };
}

/// What happened to the document.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentChange {
    /// Created or updated; `previous` is absent on create.
    Changed {
        new: LocalizedDocument,
        previous: Option<LocalizedDocument>,
    },
    /// Deleted after persisting; carries the last snapshot.
    Deleted { previous: LocalizedDocument },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Change,
    Delete,
}

/// One lifecycle event, old and new state included.
#[derive(Debug, Clone, PartialEq)]
pub struct RevalidationEvent {
    pub change: DocumentChange,
    pub context: HookContext,
}

impl RevalidationEvent {
    pub fn changed(new: LocalizedDocument, previous: Option<LocalizedDocument>) -> Self {
        Self {
            change: DocumentChange::Changed { new, previous },
            context: HookContext::default(),
        }
    }

    pub fn deleted(previous: LocalizedDocument) -> Self {
        Self {
            change: DocumentChange::Deleted { previous },
            context: HookContext::default(),
        }
    }

    pub fn with_context(mut self, context: HookContext) -> Self {
        self.context = context;
        self
    }

    pub fn kind(&self) -> EventKind {
        match self.change {
            DocumentChange::Changed { .. } => EventKind::Change,
            DocumentChange::Deleted { .. } => EventKind::Delete,
        }
    }

    /// New state (`None` on delete).
    pub fn new_doc(&self) -> Option<&LocalizedDocument> {
        match &self.change {
            DocumentChange::Changed { new, .. } => Some(new),
            DocumentChange::Deleted { .. } => None,
        }
    }

    pub fn previous_doc(&self) -> Option<&LocalizedDocument> {
        match &self.change {
            DocumentChange::Changed { previous, .. } => previous.as_ref(),
            DocumentChange::Deleted { previous } => Some(previous),
        }
    }

    /// The document handed back to the caller, unmodified.
    pub fn into_document(self) -> LocalizedDocument {
        match self.change {
            DocumentChange::Changed { new, .. } => new,
            DocumentChange::Deleted { previous } => previous,
        }
    }

    pub fn category(&self) -> DocumentCategory {
        match &self.change {
            DocumentChange::Changed { new, .. } => new.category,
            DocumentChange::Deleted { previous } => previous.category,
        }
    }
}

/// JSON body of `POST /hooks/document` and of `replay` files.
///
/// ```json
/// {"op": "change", "doc": {...}, "previous": {...}, "suppress": false}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookPayload {
    pub op: EventKind,
    /// New state on `change`, deleted state on `delete`.
    pub doc: LocalizedDocument,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<LocalizedDocument>,
    #[serde(default)]
    pub suppress: bool,
}

impl From<HookPayload> for RevalidationEvent {
    fn from(payload: HookPayload) -> Self {
        let event = match payload.op {
            EventKind::Change => Self::changed(payload.doc, payload.previous),
            EventKind::Delete => Self::deleted(payload.doc),
        };
        event.with_context(HookContext {
            suppress: payload.suppress,
        })
    }
}
