//! Dispatcher tests against recording and failing invalidators.

use std::sync::Arc;

use chrono::Utc;

use super::*;
use crate::cache::{CacheTag, InvalidationError, Invalidator, RecordingInvalidator};
use crate::core::{DocumentCategory, SingletonKind};
use crate::document::testing::*;
use crate::document::{LocalizedDocument, MemoryStore};

/// Fails every call whose target contains `needle`.
struct FailingInvalidator {
    needle: &'static str,
    inner: RecordingInvalidator,
}

impl Invalidator for FailingInvalidator {
    fn revalidate_path(&self, path: &str) -> Result<(), InvalidationError> {
        if path.contains(self.needle) {
            return Err(InvalidationError::Path {
                path: path.to_string(),
                reason: "upstream timeout".into(),
            });
        }
        self.inner.revalidate_path(path)
    }

    fn revalidate_tag(&self, tag: &CacheTag) -> Result<(), InvalidationError> {
        if tag.as_str().contains(self.needle) {
            return Err(InvalidationError::Tag {
                tag: tag.clone(),
                reason: "upstream timeout".into(),
            });
        }
        self.inner.revalidate_tag(tag)
    }
}

fn recording() -> (Dispatcher, Arc<RecordingInvalidator>) {
    let recorder = Arc::new(RecordingInvalidator::new());
    let dispatcher = Dispatcher::new(Arc::new(site()), recorder.clone());
    (dispatcher, recorder)
}

fn strs(tags: Vec<CacheTag>) -> Vec<String> {
    tags.into_iter().map(|t| t.to_string()).collect()
}

#[test]
fn test_post_lifecycle_end_to_end() {
    let (dispatcher, recorder) = recording();
    let site = site();
    let store = MemoryStore::new(site.locales.clone());

    // Create draft: nothing visible yet
    let draft = doc("p1", DocumentCategory::Post, "launch");
    assert_eq!(draft.canonical_path, "/blog/launch");
    let previous = store.upsert(draft.clone()).unwrap();
    let out = dispatcher.dispatch(RevalidationEvent::changed(draft.clone(), previous));
    assert_eq!(out.document, draft);
    assert!(recorder.take().is_empty());

    // Publish
    let mut live = draft.clone();
    live.publish(Utc::now());
    let previous = store.upsert(live.clone()).unwrap();
    dispatcher.dispatch(RevalidationEvent::changed(live.clone(), previous));
    assert_eq!(recorder.paths(), ["/blog/launch", "/nl/blog/launch"]);
    assert_eq!(
        recorder.tags().iter().filter(|t| t.as_str() == "site-index").count(),
        1
    );
    recorder.clear();

    // Rename
    let mut renamed = live.clone();
    renamed.rename("launch-day", &site).unwrap();
    let previous = store.upsert(renamed.clone()).unwrap();
    let out = dispatcher.dispatch(RevalidationEvent::changed(renamed.clone(), previous));
    assert_eq!(
        recorder.paths(),
        [
            "/blog",
            "/blog/launch",
            "/blog/launch-day",
            "/nl/blog",
            "/nl/blog/launch",
            "/nl/blog/launch-day"
        ]
    );
    assert_eq!(strs(recorder.tags()), ["listing:post", "site-index"]);
    assert!(out.report.is_clean());
    assert_eq!(out.report.invalidated, 8);
    recorder.clear();

    // Delete
    let deleted = store.remove(&renamed.locale, &renamed.id).unwrap();
    dispatcher.dispatch(RevalidationEvent::deleted(deleted));
    assert_eq!(recorder.paths(), ["/blog/launch-day", "/nl/blog/launch-day"]);
    assert_eq!(strs(recorder.tags()), ["listing:post", "site-index"]);
}

#[test]
fn test_suppressed_invalidates_nothing() {
    let (dispatcher, recorder) = recording();
    let live = published("a", DocumentCategory::Page, "about");
    let out = dispatcher.dispatch(
        RevalidationEvent::changed(live.clone(), None).with_context(HookContext::SUPPRESSED),
    );
    assert_eq!(out.document, live);
    assert!(matches!(
        out.decision,
        Decision::NoOp {
            reason: NoOpReason::Suppressed
        }
    ));
    assert!(recorder.take().is_empty());
}

#[test]
fn test_failure_is_isolated() {
    let failing = Arc::new(FailingInvalidator {
        needle: "/nl",
        inner: RecordingInvalidator::new(),
    });
    let dispatcher = Dispatcher::new(Arc::new(site()), failing.clone());

    let live = published("a", DocumentCategory::Page, "about");
    let out = dispatcher.dispatch(RevalidationEvent::changed(live.clone(), None));

    // Mutation result is untouched by the failure
    assert_eq!(out.document, live);
    assert_eq!(out.report.failed.len(), 1);
    assert_eq!(out.report.invalidated, 2);
    assert_eq!(failing.inner.paths(), ["/about"]);
    assert_eq!(strs(failing.inner.tags()), ["site-index"]);
}

#[test]
fn test_failed_tag_does_not_block_paths() {
    let failing = Arc::new(FailingInvalidator {
        needle: "site-index",
        inner: RecordingInvalidator::new(),
    });
    let dispatcher = Dispatcher::new(Arc::new(site()), failing.clone());

    let out = dispatcher.dispatch(RevalidationEvent::deleted(published(
        "a",
        DocumentCategory::Page,
        "about",
    )));
    assert_eq!(failing.inner.paths(), ["/about", "/nl/about"]);
    assert!(matches!(out.report.failed[0], InvalidationError::Tag { .. }));
}

#[test]
fn test_home_edit() {
    let (dispatcher, recorder) = recording();
    let before = published("h", DocumentCategory::HOME, "");
    let mut after = before.clone();
    after.title = Some("Welcome".into());

    dispatcher.dispatch(RevalidationEvent::changed(after, Some(before)));
    assert_eq!(recorder.paths(), ["/", "/nl"]);
    assert_eq!(strs(recorder.tags()), ["singleton:home", "site-index"]);
}

#[test]
fn test_bulk_session_flushes_once() {
    let (dispatcher, recorder) = recording();
    let session = dispatcher.begin_bulk();

    for slug in ["one", "two", "three"] {
        let post = published(slug, DocumentCategory::Post, slug);
        session.record(
            RevalidationEvent::changed(post, None).with_context(HookContext::SUPPRESSED),
        );
    }
    let contact = published("c", DocumentCategory::Singleton(SingletonKind::Contact), "contact");
    session.record(RevalidationEvent::changed(contact, None).with_context(HookContext::SUPPRESSED));

    // Nothing issued while recording
    assert!(recorder.take().is_empty());
    assert_eq!(session.len(), 4);

    let report = session.finish();
    assert!(report.is_clean());
    assert_eq!(recorder.paths().len(), 8);
    assert_eq!(
        strs(recorder.tags()),
        ["listing:post", "singleton:contact", "site-index"]
    );
}

#[test]
fn test_bulk_session_passes_through_unsuppressed() {
    let (dispatcher, recorder) = recording();
    let session = dispatcher.begin_bulk();
    let live: LocalizedDocument = published("a", DocumentCategory::Page, "about");
    session.record(RevalidationEvent::changed(live, None));
    assert_eq!(recorder.paths(), ["/about", "/nl/about"]);
    assert_eq!(session.len(), 0);
    assert!(session.finish().is_clean());
}

#[test]
fn test_bulk_session_of_drafts_is_silent() {
    let (dispatcher, recorder) = recording();
    let session = dispatcher.begin_bulk();
    let draft = doc("a", DocumentCategory::Page, "about");
    session.record(RevalidationEvent::changed(draft, None).with_context(HookContext::SUPPRESSED));
    assert!(session.pending_plan().is_empty());
    assert_eq!(session.finish(), DispatchReport::default());
    assert!(recorder.take().is_empty());
}
