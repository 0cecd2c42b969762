#![forbid(unsafe_code)]

//! Dispatch order and stop semantics of the input arbiter.
//!
//! # Invariants
//!
//! 1. Document capture → node capture (outer → target) → node bubble
//!    (target → outer) → document bubble.
//! 2. Within a scope, higher priority first; ties in registration order.
//! 3. `Stop` finishes the current scope; `StopImmediate` halts at once.
//!
//! Run: `cargo test -p scrim-runtime --test arbiter_ordering`

use std::cell::RefCell;
use std::cmp::Reverse;
use std::rc::Rc;

use proptest::prelude::*;
use scrim_core::{Document, Event, EventKind, KeyCode, Tag};
use scrim_harness::{Spy, TestDocument};
use scrim_runtime::{ListenerSpec, Page, Phase, Priority, Scope, Verdict};

type Log = Rc<RefCell<Vec<&'static str>>>;

fn logger(
    page: &mut Page<TestDocument>,
    spec: ListenerSpec,
    log: &Log,
    name: &'static str,
    verdict: Verdict,
) {
    let log = Rc::clone(log);
    page.arbiter_mut().register(spec, move |_, _| {
        log.borrow_mut().push(name);
        verdict
    });
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("SCRIM_LOG"))
        .with_test_writer()
        .try_init();
}

/// body > outer > inner
fn nested_page() -> (Page<TestDocument>, scrim_core::NodeId, scrim_core::NodeId) {
    init_tracing();
    let mut doc = TestDocument::new();
    let root = doc.root();
    let outer = doc.el(root, Tag::Div, &[]);
    let inner = doc.el(outer, Tag::Button, &[]);
    (Page::new(doc), outer, inner)
}

#[test]
fn phases_run_in_dom_order() {
    let (mut page, outer, inner) = nested_page();
    let log: Log = Rc::default();
    let click = EventKind::Click;

    let on_doc = ListenerSpec::document(click);
    let on_outer = ListenerSpec::node(outer, click);
    let on_inner = ListenerSpec::node(inner, click);

    // Registered deliberately out of order.
    logger(&mut page, on_doc, &log, "doc-bubble", Verdict::PASS);
    logger(&mut page, on_inner, &log, "inner-bubble", Verdict::PASS);
    logger(&mut page, on_outer.capture(), &log, "outer-capture", Verdict::PASS);
    logger(&mut page, on_outer, &log, "outer-bubble", Verdict::PASS);
    logger(&mut page, on_doc.capture(), &log, "doc-capture", Verdict::PASS);
    logger(&mut page, on_inner.capture(), &log, "inner-capture", Verdict::PASS);

    let outcome = page.dispatch(Event::click(inner));

    assert_eq!(
        *log.borrow(),
        vec![
            "doc-capture",
            "outer-capture",
            "inner-capture",
            "inner-bubble",
            "outer-bubble",
            "doc-bubble",
        ]
    );
    assert_eq!(outcome.invoked.len(), 6);
    assert_eq!(outcome.target, Some(inner));
    assert!(!outcome.stopped());
    assert!(!outcome.default_prevented);
}

#[test]
fn priority_then_registration_order() {
    let (mut page, _outer, inner) = nested_page();
    let log: Log = Rc::default();
    let spec = ListenerSpec::document(EventKind::Click).capture();

    logger(&mut page, spec, &log, "normal-a", Verdict::PASS);
    logger(&mut page, spec.priority(Priority::DISMISS), &log, "dismiss", Verdict::PASS);
    logger(&mut page, spec, &log, "normal-b", Verdict::PASS);
    logger(&mut page, spec.priority(Priority::FOCUS_TRAP), &log, "trap", Verdict::PASS);

    page.dispatch(Event::click(inner));
    assert_eq!(*log.borrow(), vec!["dismiss", "trap", "normal-a", "normal-b"]);
}

#[test]
fn stop_immediate_blocks_every_later_listener() {
    let (mut page, outer, inner) = nested_page();
    let click = EventKind::Click;
    let consumer = Spy::register_with(
        page.arbiter_mut(),
        ListenerSpec::document(click).capture().priority(Priority::DISMISS),
        Verdict::CONSUME,
    );
    let same_scope = Spy::register(page.arbiter_mut(), ListenerSpec::document(click).capture());
    let node = Spy::register(page.arbiter_mut(), ListenerSpec::node(outer, click));
    let bubble = Spy::register(page.arbiter_mut(), ListenerSpec::document(click));

    let outcome = page.dispatch(Event::click(inner));

    assert_eq!(consumer.hits(), 1);
    assert_eq!((same_scope.hits(), node.hits(), bubble.hits()), (0, 0, 0));
    assert_eq!(outcome.invoked, vec![consumer.id]);
    assert_eq!(outcome.stopped_by, Some(consumer.id));
    assert!(outcome.default_prevented);
}

#[test]
fn stop_finishes_current_scope_only() {
    let (mut page, outer, inner) = nested_page();
    let click = EventKind::Click;
    let stopper = Spy::register_with(
        page.arbiter_mut(),
        ListenerSpec::node(inner, click).priority(Priority(5)),
        Verdict::STOP,
    );
    let sibling = Spy::register(page.arbiter_mut(), ListenerSpec::node(inner, click));
    let parent = Spy::register(page.arbiter_mut(), ListenerSpec::node(outer, click));
    let document = Spy::register(page.arbiter_mut(), ListenerSpec::document(click));

    let outcome = page.dispatch(Event::click(inner));

    assert_eq!((stopper.hits(), sibling.hits()), (1, 1));
    assert_eq!((parent.hits(), document.hits()), (0, 0));
    assert_eq!(outcome.stopped_by, Some(stopper.id));
    assert!(!outcome.default_prevented);
}

#[test]
fn prevented_default_is_visible_downstream() {
    let (mut page, _outer, inner) = nested_page();
    let seen = Rc::new(RefCell::new(None));
    Spy::register_with(
        page.arbiter_mut(),
        ListenerSpec::document(EventKind::Click).capture(),
        Verdict::PREVENT_DEFAULT,
    );
    let record = Rc::clone(&seen);
    page.arbiter_mut().register(ListenerSpec::document(EventKind::Click), move |ctx, _| {
        *record.borrow_mut() = Some((ctx.default_prevented, ctx.phase, ctx.current));
        Verdict::PASS
    });

    let outcome = page.dispatch(Event::click(inner));
    assert!(outcome.default_prevented);
    assert_eq!(*seen.borrow(), Some((true, Phase::Bubble, Scope::Document)));
}

#[test]
fn key_without_focus_reaches_document_only() {
    let (mut page, outer, _inner) = nested_page();
    let node = Spy::register(page.arbiter_mut(), ListenerSpec::node(outer, EventKind::KeyDown));
    let document = Spy::register(page.arbiter_mut(), ListenerSpec::document(EventKind::KeyDown));

    let outcome = page.dispatch(Event::key(KeyCode::Escape));
    assert_eq!(outcome.target, None);
    assert_eq!((node.hits(), document.hits()), (0, 1));
}

#[test]
fn key_targets_focused_element_path() {
    let (mut page, outer, inner) = nested_page();
    assert!(page.document_mut().focus(inner));
    let node = Spy::register(page.arbiter_mut(), ListenerSpec::node(outer, EventKind::KeyDown));
    let outcome = page.dispatch(Event::key(KeyCode::Enter));
    assert_eq!(outcome.target, Some(inner));
    assert_eq!(node.hits(), 1);
}

#[test]
fn listeners_filter_by_event_kind() {
    let (mut page, _outer, inner) = nested_page();
    let keys = Spy::register(page.arbiter_mut(), ListenerSpec::document(EventKind::KeyDown));
    page.dispatch(Event::click(inner));
    assert_eq!(keys.hits(), 0);
}

#[test]
fn removed_listener_never_runs() {
    let (mut page, _outer, inner) = nested_page();
    let spy = Spy::register(page.arbiter_mut(), ListenerSpec::document(EventKind::Click));
    assert!(page.arbiter_mut().remove(spy.id));
    assert!(!page.arbiter_mut().remove(spy.id));
    page.dispatch(Event::click(inner));
    assert_eq!(spy.hits(), 0);
    assert!(page.arbiter().is_empty());
}

proptest! {
    /// For any path depth and listener mix, the run order is the step order
    /// (document capture, path capture, path bubble, document bubble), then
    /// priority, then registration.
    #[test]
    fn run_order_is_step_then_priority_then_registration(
        depth in 1usize..6,
        listeners in prop::collection::vec((0usize..8, any::<bool>(), -3i32..3), 0..24),
    ) {
        init_tracing();
        let mut doc = TestDocument::new();
        let mut path = vec![doc.root()];
        for _ in 0..depth {
            let parent = path[path.len() - 1];
            path.push(doc.el(parent, Tag::Div, &[]));
        }
        let target = path[path.len() - 1];
        let len = path.len();

        let mut page = Page::new(doc);
        let log: Rc<RefCell<Vec<usize>>> = Rc::default();
        let mut expected = Vec::new();
        for (i, &(slot, capture, priority)) in listeners.iter().enumerate() {
            // Slot 0 is the document, the rest land on a path node.
            let (spec, step) = if slot == 0 {
                let step = if capture { 0 } else { 1 + 2 * len };
                (ListenerSpec::document(EventKind::Click), step)
            } else {
                let at = (slot - 1) % len;
                let step = if capture { 1 + at } else { 1 + len + (len - 1 - at) };
                (ListenerSpec::node(path[at], EventKind::Click), step)
            };
            let spec = if capture { spec.capture() } else { spec };
            let record = Rc::clone(&log);
            page.arbiter_mut().register(spec.priority(Priority(priority)), move |_, _| {
                record.borrow_mut().push(i);
                Verdict::PASS
            });
            expected.push((step, Reverse(priority), i));
        }
        expected.sort();

        let outcome = page.dispatch(Event::click(target));
        let order: Vec<usize> = expected.iter().map(|&(_, _, i)| i).collect();
        prop_assert_eq!(&*log.borrow(), &order);
        prop_assert_eq!(outcome.invoked.len(), listeners.len());
    }
}
