#![forbid(unsafe_code)]

//! Dismissal gestures routed through the input arbiter.
//!
//! Every gesture the dialog acts on must be invisible to the rest of the
//! page: spies registered at normal priority in both phases never run.
//!
//! Run: `cargo test -p scrim-harness --test modal_dismissal`

use std::time::Duration;

use scrim_a11y::read_hidden;
use scrim_core::{
    Document, Event, EventKind, KeyCode, KeyEvent, KeyEventKind, PointerButton, PointerEvent,
    PointerEventKind,
};
use scrim_harness::{ContactPage, Spy, TestDocument, contact_page, escape};
use scrim_runtime::{ListenerSpec, Page};
use scrim_widgets::modal::{CloseReason, ModalConfig, ModalController};

struct Fixture {
    page: Page<TestDocument>,
    modal: ModalController,
    ids: ContactPage,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn fixture_with(config: ModalConfig) -> Fixture {
    init_tracing();
    let ids = contact_page();
    let mut page = Page::new(ids.doc.clone());
    let modal = ModalController::attach(&mut page, config).expect("contact page has a dialog");
    Fixture { page, modal, ids }
}

fn opened_with(config: ModalConfig) -> Fixture {
    let mut fx = fixture_with(config);
    fx.page.document_mut().focus(fx.ids.opener);
    let outcome = fx.page.dispatch(Event::click(fx.ids.opener));
    assert!(outcome.default_prevented, "opener click must not submit the form");
    fx.page.advance(Duration::from_millis(30));
    assert!(fx.modal.is_open());
    fx
}

fn opened() -> Fixture {
    opened_with(ModalConfig::default())
}

/// Normal-priority spies on both document phases.
fn page_spies(page: &mut Page<TestDocument>, kind: EventKind) -> (Spy, Spy) {
    let capture = Spy::register(page.arbiter_mut(), ListenerSpec::document(kind).capture());
    let bubble = Spy::register(page.arbiter_mut(), ListenerSpec::document(kind));
    (capture, bubble)
}

// --- Opening ---

#[test]
fn opener_click_opens_and_shows_dialog() {
    let fx = opened();
    let doc = fx.page.document();
    assert_eq!(read_hidden(doc, fx.ids.container), Some(false));
    assert!(doc.is_rendered(fx.ids.email));
    assert!(doc.scroll_locked());
    assert_eq!(doc.active_element(), Some(fx.ids.close_button));
    assert_eq!(fx.modal.focus_memory(), Some(fx.ids.opener));
}

#[test]
fn second_opener_click_changes_nothing() {
    let mut fx = opened();
    fx.page.dispatch(Event::click(fx.ids.opener));
    fx.page.flush();
    let doc = fx.page.document();
    assert_eq!(doc.scroll_lock_acquisitions(), 1);
    assert_eq!(doc.scroll_lock_depth(), 1);
    assert_eq!(fx.modal.focus_memory(), Some(fx.ids.opener));
}

// --- Escape ---

#[test]
fn escape_closes_and_is_consumed() {
    let mut fx = opened();
    let (capture, bubble) = page_spies(&mut fx.page, EventKind::KeyDown);

    let outcome = fx.page.dispatch(escape());

    assert!(!fx.modal.is_open());
    assert_eq!(fx.modal.last_close_reason(), Some(CloseReason::EscapePressed));
    assert_eq!((capture.hits(), bubble.hits()), (0, 0));
    assert!(outcome.default_prevented);
    assert!(outcome.stopped());
}

#[test]
fn escape_while_closed_reaches_page() {
    let mut fx = fixture_with(ModalConfig::default());
    let (capture, bubble) = page_spies(&mut fx.page, EventKind::KeyDown);

    let outcome = fx.page.dispatch(escape());

    assert_eq!((capture.hits(), bubble.hits()), (1, 1));
    assert!(!outcome.default_prevented);
    assert_eq!(fx.modal.last_close_reason(), None);
}

#[test]
fn escape_release_and_other_keys_are_ignored() {
    let mut fx = opened();
    let release = Event::Key(KeyEvent::new(KeyCode::Escape).with_kind(KeyEventKind::Release));
    fx.page.dispatch(release);
    fx.page.dispatch(Event::key(KeyCode::Enter));
    fx.page.dispatch(Event::key(KeyCode::Char('q')));
    assert!(fx.modal.is_open());
}

#[test]
fn escape_dismissal_can_be_disabled() {
    let mut fx = opened_with(ModalConfig::default().close_on_escape(false));
    let (_capture, bubble) = page_spies(&mut fx.page, EventKind::KeyDown);
    fx.page.dispatch(escape());
    assert!(fx.modal.is_open());
    assert_eq!(bubble.hits(), 1);
}

// --- Clicks ---

#[test]
fn backdrop_click_closes_and_is_consumed() {
    let mut fx = opened();
    let (capture, bubble) = page_spies(&mut fx.page, EventKind::Click);
    let container = Spy::register(
        fx.page.arbiter_mut(),
        ListenerSpec::node(fx.ids.container, EventKind::Click),
    );

    let outcome = fx.page.dispatch(Event::click(fx.ids.backdrop));

    assert!(!fx.modal.is_open());
    assert_eq!(fx.modal.last_close_reason(), Some(CloseReason::BackdropClicked));
    assert_eq!((capture.hits(), bubble.hits(), container.hits()), (0, 0, 0));
    assert!(outcome.default_prevented);
}

#[test]
fn closer_click_closes_and_restores_focus() {
    let mut fx = opened();
    let (_capture, bubble) = page_spies(&mut fx.page, EventKind::Click);

    fx.page.dispatch(Event::click(fx.ids.close_button));
    assert_eq!(fx.modal.last_close_reason(), Some(CloseReason::CloserActivated));
    assert_eq!(bubble.hits(), 0);

    fx.page.advance(Duration::from_millis(30));
    let doc = fx.page.document();
    assert_eq!(doc.active_element(), Some(fx.ids.opener));
    assert_eq!(read_hidden(doc, fx.ids.container), Some(true));
    assert!(!doc.scroll_locked());
}

#[test]
fn click_inside_box_stays_inside() {
    let mut fx = opened();
    let (capture, bubble) = page_spies(&mut fx.page, EventKind::Click);
    let container = Spy::register(
        fx.page.arbiter_mut(),
        ListenerSpec::node(fx.ids.container, EventKind::Click),
    );
    let field = Spy::register(
        fx.page.arbiter_mut(),
        ListenerSpec::node(fx.ids.email, EventKind::Click),
    );

    let outcome = fx.page.dispatch(Event::click(fx.ids.email));

    assert!(fx.modal.is_open());
    // Capture listeners still see it; nothing above the box does on the way up.
    assert_eq!(capture.hits(), 1);
    assert_eq!(field.hits(), 1);
    assert_eq!((container.hits(), bubble.hits()), (0, 0));
    assert!(outcome.stopped());
    assert!(!outcome.default_prevented);
}

#[test]
fn click_on_box_itself_does_not_close() {
    let mut fx = opened();
    fx.page.dispatch(Event::click(fx.ids.dialog_box));
    assert!(fx.modal.is_open());
}

#[test]
fn secondary_click_on_backdrop_does_not_close() {
    let mut fx = opened();
    let secondary = Event::Pointer(PointerEvent::new(
        PointerEventKind::Click(PointerButton::Secondary),
        fx.ids.backdrop,
    ));
    fx.page.dispatch(secondary);
    assert!(fx.modal.is_open());
}

#[test]
fn backdrop_dismissal_can_be_disabled() {
    let mut fx = opened_with(ModalConfig::default().close_on_backdrop(false));
    let (_capture, bubble) = page_spies(&mut fx.page, EventKind::Click);

    fx.page.dispatch(Event::click(fx.ids.backdrop));
    assert!(fx.modal.is_open());
    assert_eq!(bubble.hits(), 1);

    fx.page.dispatch(Event::click(fx.ids.close_button));
    assert!(!fx.modal.is_open());
}

#[test]
fn click_outside_container_passes_through() {
    let mut fx = opened();
    let (_capture, bubble) = page_spies(&mut fx.page, EventKind::Click);
    fx.page.dispatch(Event::click(fx.ids.home_link));
    assert!(fx.modal.is_open());
    assert_eq!(bubble.hits(), 1);
}

#[test]
fn closer_outside_container_does_not_close() {
    let ids = contact_page();
    let mut doc = ids.doc.clone();
    let root = doc.root();
    let stray = doc.el(root, scrim_core::Tag::Button, &[("data-close-modal", "")]);
    let mut page = Page::new(doc);
    let modal = ModalController::attach(&mut page, ModalConfig::default()).expect("attach");
    modal.open(page.context_mut());
    let (_capture, bubble) = page_spies(&mut page, EventKind::Click);

    page.dispatch(Event::click(stray));
    assert!(modal.is_open());
    assert_eq!(bubble.hits(), 1);
    assert!(!modal.markup().closers.contains(&stray));
}

#[test]
fn dismiss_clicks_while_closed_reach_page() {
    let mut fx = fixture_with(ModalConfig::default());
    let (capture, bubble) = page_spies(&mut fx.page, EventKind::Click);
    fx.page.dispatch(Event::click(fx.ids.backdrop));
    fx.page.dispatch(Event::click(fx.ids.close_button));
    assert_eq!((capture.hits(), bubble.hits()), (2, 2));
    assert_eq!(fx.page.document().scroll_lock_releases(), 0);
}

#[test]
fn box_lets_clicks_through_once_closed() {
    let mut fx = opened();
    fx.page.dispatch(escape());
    let (_capture, bubble) = page_spies(&mut fx.page, EventKind::Click);

    let outcome = fx.page.dispatch(Event::click(fx.ids.email));
    assert!(!outcome.stopped());
    assert_eq!(bubble.hits(), 1);
}

#[test]
fn full_cycle_balances_scroll_lock() {
    let mut fx = opened();
    fx.page.dispatch(escape());
    fx.page.dispatch(escape());
    fx.page.dispatch(Event::click(fx.ids.opener));
    fx.page.dispatch(Event::click(fx.ids.backdrop));
    fx.page.flush();

    let doc = fx.page.document();
    assert_eq!(doc.scroll_lock_acquisitions(), 2);
    assert_eq!(doc.scroll_lock_releases(), 2);
    assert_eq!(doc.scroll_lock_depth(), 0);
}
