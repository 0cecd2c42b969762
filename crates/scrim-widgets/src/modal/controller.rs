#![forbid(unsafe_code)]

//! Modal controller: one dialog's state, triggers and focus management.
//!
//! A [`ModalController`] is attached to a [`Page`]. Attaching resolves the
//! markup, normalizes the container to the closed state, and registers the
//! controller's listeners with the page's [`InputArbiter`]:
//!
//! | Listener | Scope / phase | Priority | Verdict when it acts |
//! |----------|---------------|----------|----------------------|
//! | dismiss click | document / capture | `DISMISS` | `CONSUME` |
//! | Escape | document / capture | `DISMISS` | `CONSUME` |
//! | Tab trap | document / capture | `FOCUS_TRAP` | `PREVENT_DEFAULT` |
//! | opener click | opener / bubble | `NORMAL` | `PREVENT_DEFAULT` |
//! | box click | box / bubble | `NORMAL` | `STOP` while open |
//!
//! # Invariants
//!
//! 1. `open()` on an open dialog and `close()` on a closed one are no-ops, so
//!    the scroll lock is acquired and released exactly once per cycle.
//! 2. Focus memory is captured once per open and consumed once per close.
//! 3. A dismiss gesture the controller acts on is consumed: no other listener
//!    observes it.
//! 4. Deferred focus tasks are tied to the transition that posted them; a
//!    task whose transition was superseded does nothing.
//!
//! # Failure Modes
//!
//! - Missing container: [`ModalController::attach`] returns
//!   [`AttachError::MissingContainer`]; `attach_if_present` returns `None`.
//! - Empty focusable set on open: focus stays where it was.
//! - Remembered element removed or no longer focusable on close: restoration
//!   is skipped.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use scrim_a11y::{focusable_in, publish_hidden};
use scrim_core::{Document, Event, EventKind, KeyCode, NodeId, Selector};
use scrim_runtime::{
    EventCtx, InputArbiter, ListenerId, ListenerSpec, Page, PageContext, Priority, Verdict,
};

use crate::modal::trap::{TabDecision, decide_tab};
use crate::modal::triggers::{ClickTarget, ModalMarkup, classify_click, is_untyped_button};
use crate::modal::{CloseReason, ModalConfig, ModalState};

/// Attribute mirrored while open when `mirror_open_attribute` is set.
const OPEN_ATTR: &str = "open";

/// Errors from attaching a controller to a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachError {
    /// No element carries the configured container id.
    MissingContainer(String),
}

impl fmt::Display for AttachError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingContainer(id) => write!(f, "no dialog container with id '{id}'"),
        }
    }
}

impl std::error::Error for AttachError {}

#[derive(Debug)]
struct ModalInner {
    state: ModalState,
    markup: ModalMarkup,
    config: ModalConfig,
    focus_memory: Option<NodeId>,
    /// Bumped on every transition; deferred tasks compare against it.
    generation: u64,
    last_close: Option<CloseReason>,
    listeners: Vec<ListenerId>,
}

/// Shared handle to one dialog's controller.
///
/// Cloning is cheap and every clone refers to the same dialog.
#[derive(Debug, Clone)]
pub struct ModalController {
    inner: Rc<RefCell<ModalInner>>,
}

impl ModalController {
    /// Resolve the markup, normalize it and register listeners.
    pub fn attach<D: Document + 'static>(
        page: &mut Page<D>,
        config: ModalConfig,
    ) -> Result<Self, AttachError> {
        let (arbiter, ctx) = page.split_mut();
        let markup = resolve_markup(&ctx.document, &config)?;
        normalize_markup(&mut ctx.document, &markup, &config);

        tracing::debug!(
            container = %markup.container,
            openers = markup.openers.len(),
            closers = markup.closers.len(),
            distinct_box = markup.has_distinct_box(),
            "modal attached"
        );

        let controller = Self {
            inner: Rc::new(RefCell::new(ModalInner {
                state: ModalState::Closed,
                markup,
                config,
                focus_memory: None,
                generation: 0,
                last_close: None,
                listeners: Vec::new(),
            })),
        };
        let listeners = controller.register_listeners(arbiter);
        controller.inner.borrow_mut().listeners = listeners;
        Ok(controller)
    }

    /// Attach if the page carries the dialog; otherwise the feature is simply
    /// absent from this page.
    pub fn attach_if_present<D: Document + 'static>(
        page: &mut Page<D>,
        config: ModalConfig,
    ) -> Option<Self> {
        match Self::attach(page, config) {
            Ok(controller) => Some(controller),
            Err(err) => {
                tracing::debug!(%err, "modal inactive on this page");
                None
            }
        }
    }

    // --- State Queries ---

    #[must_use]
    pub fn state(&self) -> ModalState {
        self.inner.borrow().state
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state().is_open()
    }

    #[must_use]
    pub fn markup(&self) -> ModalMarkup {
        self.inner.borrow().markup.clone()
    }

    /// Element to restore focus to on close, while open.
    #[must_use]
    pub fn focus_memory(&self) -> Option<NodeId> {
        self.inner.borrow().focus_memory
    }

    /// Why the dialog was last dismissed.
    #[must_use]
    pub fn last_close_reason(&self) -> Option<CloseReason> {
        self.inner.borrow().last_close
    }

    /// Listener ids registered by this controller.
    #[must_use]
    pub fn listener_ids(&self) -> Vec<ListenerId> {
        self.inner.borrow().listeners.clone()
    }

    // --- Transitions ---

    /// Present the dialog. Returns `false` if it was already open.
    pub fn open<D: Document + 'static>(&self, page: &mut PageContext<D>) -> bool {
        let mut inner = self.inner.borrow_mut();
        if !inner.state.open() {
            tracing::trace!(container = %inner.markup.container, "open ignored: already open");
            return false;
        }
        inner.generation += 1;

        let doc = &mut page.document;
        let container = inner.markup.container;
        inner.focus_memory = doc.active_element();
        doc.set_displayed(container, true);
        publish_hidden(doc, container, false);
        if inner.config.mirror_open_attribute {
            doc.set_attr(container, OPEN_ATTR, "");
        }
        doc.acquire_scroll_lock();

        tracing::debug!(
            container = %container,
            focus_memory = ?inner.focus_memory,
            "modal opened"
        );

        let handle = Rc::downgrade(&self.inner);
        let generation = inner.generation;
        page.tasks.post(inner.config.delay(), "modal.focus_first", move |doc: &mut D| {
            focus_first(&handle, generation, doc);
        });
        true
    }

    /// Dismiss the dialog. Returns `false` if it was already closed.
    pub fn close<D: Document + 'static>(&self, page: &mut PageContext<D>) -> bool {
        self.close_with(page, CloseReason::Programmatic)
    }

    fn close_with<D: Document + 'static>(
        &self,
        page: &mut PageContext<D>,
        reason: CloseReason,
    ) -> bool {
        let mut inner = self.inner.borrow_mut();
        if !inner.state.close() {
            tracing::trace!(container = %inner.markup.container, "close ignored: already closed");
            return false;
        }
        inner.generation += 1;
        inner.last_close = Some(reason);

        let doc = &mut page.document;
        let container = inner.markup.container;
        doc.set_displayed(container, false);
        publish_hidden(doc, container, true);
        if inner.config.mirror_open_attribute {
            doc.remove_attr(container, OPEN_ATTR);
        }
        doc.release_scroll_lock();

        let restore = inner.focus_memory.take();
        tracing::debug!(container = %container, ?reason, ?restore, "modal closed");

        if let Some(target) = restore {
            let handle = Rc::downgrade(&self.inner);
            let generation = inner.generation;
            page.tasks.post(
                inner.config.delay(),
                "modal.restore_focus",
                move |doc: &mut D| restore_focus(&handle, generation, target, doc),
            );
        }
        true
    }

    /// Remove this controller's listeners. The dialog's state is left as is.
    pub fn detach<D>(&self, arbiter: &mut InputArbiter<D>) {
        let listeners = std::mem::take(&mut self.inner.borrow_mut().listeners);
        for id in listeners {
            arbiter.remove(id);
        }
    }

    // --- Listener wiring ---

    fn register_listeners<D: Document + 'static>(
        &self,
        arbiter: &mut InputArbiter<D>,
    ) -> Vec<ListenerId> {
        let markup = self.markup();
        let mut ids = Vec::new();

        let this = self.clone();
        ids.push(arbiter.register(
            ListenerSpec::document(EventKind::Click)
                .capture()
                .priority(Priority::DISMISS),
            move |ctx, page| this.on_dismiss_click(ctx, page),
        ));

        let this = self.clone();
        ids.push(arbiter.register(
            ListenerSpec::document(EventKind::KeyDown)
                .capture()
                .priority(Priority::DISMISS),
            move |ctx, page| this.on_escape(ctx, page),
        ));

        let this = self.clone();
        ids.push(arbiter.register(
            ListenerSpec::document(EventKind::KeyDown)
                .capture()
                .priority(Priority::FOCUS_TRAP),
            move |ctx, page| this.on_tab(ctx, page),
        ));

        for &opener in &markup.openers {
            let this = self.clone();
            ids.push(arbiter.register(
                ListenerSpec::node(opener, EventKind::Click),
                move |_, page| {
                    this.open(page);
                    Verdict::PREVENT_DEFAULT
                },
            ));
        }

        if markup.has_distinct_box() {
            let this = self.clone();
            ids.push(arbiter.register(
                ListenerSpec::node(markup.dialog_box, EventKind::Click),
                move |_, _| {
                    if this.is_open() {
                        Verdict::STOP
                    } else {
                        Verdict::PASS
                    }
                },
            ));
        }

        ids
    }

    fn on_dismiss_click<D: Document + 'static>(
        &self,
        ctx: &EventCtx<'_>,
        page: &mut PageContext<D>,
    ) -> Verdict {
        let Event::Pointer(pointer) = ctx.event else {
            return Verdict::PASS;
        };
        if !pointer.is_primary_click() {
            return Verdict::PASS;
        }
        let classified = {
            let inner = self.inner.borrow();
            if !inner.state.is_open() {
                return Verdict::PASS;
            }
            classify_click(&page.document, &inner.markup, &inner.config, pointer.target)
                .with_backdrop_enabled(inner.config.close_on_backdrop)
        };
        let reason = match classified {
            ClickTarget::Closer(_) => CloseReason::CloserActivated,
            ClickTarget::Backdrop => CloseReason::BackdropClicked,
            ClickTarget::Dialog | ClickTarget::Outside => return Verdict::PASS,
        };
        self.close_with(page, reason);
        Verdict::CONSUME
    }

    fn on_escape<D: Document + 'static>(
        &self,
        ctx: &EventCtx<'_>,
        page: &mut PageContext<D>,
    ) -> Verdict {
        let Event::Key(key) = ctx.event else {
            return Verdict::PASS;
        };
        {
            let inner = self.inner.borrow();
            if !inner.state.is_open() || !inner.config.close_on_escape {
                return Verdict::PASS;
            }
        }
        if !key.is_press(KeyCode::Escape) {
            return Verdict::PASS;
        }
        self.close_with(page, CloseReason::EscapePressed);
        Verdict::CONSUME
    }

    fn on_tab<D: Document + 'static>(
        &self,
        ctx: &EventCtx<'_>,
        page: &mut PageContext<D>,
    ) -> Verdict {
        let Event::Key(key) = ctx.event else {
            return Verdict::PASS;
        };
        if !key.is_press(KeyCode::Tab) {
            return Verdict::PASS;
        }
        let container = {
            let inner = self.inner.borrow();
            if !inner.state.is_open() || !inner.config.trap_focus {
                return Verdict::PASS;
            }
            inner.markup.container
        };

        let doc = &mut page.document;
        let set = focusable_in(doc, container);
        let decision = decide_tab(&set, doc.active_element(), key.shift());
        tracing::trace!(?decision, candidates = set.len(), shift = key.shift(), "focus trap");
        match decision {
            TabDecision::Allow => Verdict::PASS,
            TabDecision::Suppress => Verdict::PREVENT_DEFAULT,
            TabDecision::MoveTo(target) => {
                doc.focus(target);
                Verdict::PREVENT_DEFAULT
            }
        }
    }
}

impl ClickTarget {
    /// Downgrade backdrop clicks to plain dialog clicks when backdrop
    /// dismissal is disabled.
    fn with_backdrop_enabled(self, enabled: bool) -> Self {
        match self {
            Self::Backdrop if !enabled => Self::Dialog,
            other => other,
        }
    }
}

fn resolve_markup<D: Document + ?Sized>(
    doc: &D,
    config: &ModalConfig,
) -> Result<ModalMarkup, AttachError> {
    let container = doc
        .element_by_id(&config.container_id)
        .ok_or_else(|| AttachError::MissingContainer(config.container_id.clone()))?;
    let dialog_box = doc
        .query_first(container, &Selector::class(config.box_class.as_str()))
        .unwrap_or(container);
    let openers = doc.query_all(doc.root(), &Selector::attr(config.opener_attr.as_str()));
    let closers = doc.query_all(container, &Selector::attr(config.closer_attr.as_str()));
    Ok(ModalMarkup {
        container,
        dialog_box,
        openers,
        closers,
    })
}

/// Force the closed presentation and make trigger buttons non-submitting.
fn normalize_markup<D: Document + ?Sized>(doc: &mut D, markup: &ModalMarkup, config: &ModalConfig) {
    if doc.node(markup.container).is_some_and(|n| n.is_displayed()) {
        tracing::debug!(container = %markup.container, "markup declared dialog visible; hiding");
    }
    doc.set_displayed(markup.container, false);
    publish_hidden(doc, markup.container, true);
    if config.mirror_open_attribute {
        doc.remove_attr(markup.container, OPEN_ATTR);
    }

    if config.normalize_button_types {
        for &id in markup.openers.iter().chain(&markup.closers) {
            if doc.node(id).is_some_and(is_untyped_button) {
                doc.set_attr(id, "type", "button");
            }
        }
    }
}

fn focus_first<D: Document + ?Sized>(
    handle: &Weak<RefCell<ModalInner>>,
    generation: u64,
    doc: &mut D,
) {
    let Some(inner) = handle.upgrade() else {
        return;
    };
    let inner = inner.borrow();
    if !inner.state.is_open() || inner.generation != generation {
        tracing::trace!("stale open focus task skipped");
        return;
    }
    match focusable_in(doc, inner.markup.container).first() {
        Some(first) => {
            doc.focus(first);
        }
        None => tracing::trace!(container = %inner.markup.container, "no focusable element"),
    }
}

fn restore_focus<D: Document + ?Sized>(
    handle: &Weak<RefCell<ModalInner>>,
    generation: u64,
    target: NodeId,
    doc: &mut D,
) {
    let Some(inner) = handle.upgrade() else {
        return;
    };
    let inner = inner.borrow();
    if inner.state.is_open() || inner.generation != generation {
        tracing::trace!("stale restore focus task skipped");
        return;
    }
    if !doc.can_focus(target) {
        tracing::trace!(node = %target, "focus memory no longer focusable");
        return;
    }
    doc.focus(target);
}
