#![forbid(unsafe_code)]

//! Ordered, phase-aware input dispatch.
//!
//! The [`InputArbiter`] is the single place where page listeners are
//! registered and where events are routed to them. Ordering is explicit rather
//! than an accident of registration order:
//!
//! 1. Document-scope [`Phase::Capture`] listeners.
//! 2. Capture listeners on each node from the outermost ancestor down to the
//!    target.
//! 3. Bubble listeners on each node from the target up to the outermost
//!    ancestor.
//! 4. Document-scope [`Phase::Bubble`] listeners.
//!
//! Within one node (or the document scope) listeners run by descending
//! [`Priority`], ties broken by registration order.
//!
//! # Consume semantics
//!
//! A listener answers with a [`Verdict`]. [`Propagation::Stop`] lets the
//! remaining listeners of the current node run and then halts;
//! [`Propagation::StopImmediate`] halts at once. A listener that consumes an
//! event with `StopImmediate` at [`Priority::DISMISS`] in the document capture
//! phase is therefore guaranteed that no other listener observes the event,
//! unless another listener shares that scope with a higher priority.
//!
//! # Failure Modes
//!
//! - Key events with no focused element target the document only (steps 1
//!   and 4).
//! - Pointer events targeting an unknown node likewise reach document-scope
//!   listeners only.
//! - `remove()` of an unknown id returns `false`.

use std::fmt;

use scrim_core::{Document, Event, EventKind, NodeId};

use crate::page::PageContext;

/// Identifier of a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    #[inline]
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Dispatch phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Capture,
    Bubble,
}

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Document,
    Node(NodeId),
}

/// Listener priority within a scope; higher runs first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Priority(pub i32);

impl Priority {
    /// Dismiss gestures (close on backdrop/closer/Escape).
    pub const DISMISS: Self = Self(1000);
    /// Focus containment.
    pub const FOCUS_TRAP: Self = Self(900);
    /// Ordinary page listeners.
    pub const NORMAL: Self = Self(0);
}

impl Default for Priority {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// How far an event may continue after a listener ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Propagation {
    #[default]
    Continue,
    /// Finish the current node, then halt.
    Stop,
    /// Halt immediately.
    StopImmediate,
}

/// A listener's decision about an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Verdict {
    pub propagation: Propagation,
    pub prevent_default: bool,
}

impl Verdict {
    /// Let the event continue untouched.
    pub const PASS: Self = Self {
        propagation: Propagation::Continue,
        prevent_default: false,
    };

    /// Prevent the default action, stop everything after this listener.
    pub const CONSUME: Self = Self {
        propagation: Propagation::StopImmediate,
        prevent_default: true,
    };

    /// Prevent the default action but keep propagating.
    pub const PREVENT_DEFAULT: Self = Self {
        propagation: Propagation::Continue,
        prevent_default: true,
    };

    /// Stop after the current node, leave the default action alone.
    pub const STOP: Self = Self {
        propagation: Propagation::Stop,
        prevent_default: false,
    };
}

/// Registration parameters for a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerSpec {
    pub scope: Scope,
    pub phase: Phase,
    pub kind: EventKind,
    pub priority: Priority,
}

impl ListenerSpec {
    /// Bubble-phase document listener at normal priority.
    #[must_use]
    pub const fn document(kind: EventKind) -> Self {
        Self {
            scope: Scope::Document,
            phase: Phase::Bubble,
            kind,
            priority: Priority::NORMAL,
        }
    }

    /// Bubble-phase listener on `node` at normal priority.
    #[must_use]
    pub const fn node(node: NodeId, kind: EventKind) -> Self {
        Self {
            scope: Scope::Node(node),
            phase: Phase::Bubble,
            kind,
            priority: Priority::NORMAL,
        }
    }

    #[must_use]
    pub const fn capture(mut self) -> Self {
        self.phase = Phase::Capture;
        self
    }

    #[must_use]
    pub const fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

/// What a listener sees about the event being dispatched.
#[derive(Debug, Clone, Copy)]
pub struct EventCtx<'a> {
    pub event: &'a Event,
    /// Resolved target; `None` when the event only reaches the document.
    pub target: Option<NodeId>,
    /// Scope whose listeners are currently running.
    pub current: Scope,
    pub phase: Phase,
    /// Whether an earlier listener prevented the default action.
    pub default_prevented: bool,
}

/// A listener callback.
pub type Handler<D> = Box<dyn FnMut(&EventCtx<'_>, &mut PageContext<D>) -> Verdict>;

struct Listener<D> {
    id: ListenerId,
    spec: ListenerSpec,
    handler: Handler<D>,
}

/// Record of a single dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub target: Option<NodeId>,
    /// Listeners that ran, in order.
    pub invoked: Vec<ListenerId>,
    /// Listener that halted propagation, if any.
    pub stopped_by: Option<ListenerId>,
    pub default_prevented: bool,
}

impl DispatchOutcome {
    #[must_use]
    pub fn was_invoked(&self, id: ListenerId) -> bool {
        self.invoked.contains(&id)
    }

    /// Whether propagation was halted before every listener ran.
    #[must_use]
    pub fn stopped(&self) -> bool {
        self.stopped_by.is_some()
    }
}

/// Registry and dispatcher of page listeners.
pub struct InputArbiter<D> {
    listeners: Vec<Listener<D>>,
    next_id: u64,
}

impl<D> Default for InputArbiter<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> fmt::Debug for InputArbiter<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputArbiter")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<D> InputArbiter<D> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 1,
        }
    }

    /// Register a listener.
    pub fn register(
        &mut self,
        spec: ListenerSpec,
        handler: impl FnMut(&EventCtx<'_>, &mut PageContext<D>) -> Verdict + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push(Listener {
            id,
            spec,
            handler: Box::new(handler),
        });
        id
    }

    /// Remove a listener.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        before != self.listeners.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Indices of listeners for one (scope, phase) step, in run order.
    fn step_listeners(&self, scope: Scope, phase: Phase, kind: EventKind) -> Vec<usize> {
        let mut matching: Vec<usize> = self
            .listeners
            .iter()
            .enumerate()
            .filter(|(_, l)| l.spec.scope == scope && l.spec.phase == phase && l.spec.kind == kind)
            .map(|(i, _)| i)
            .collect();
        // Registration order is id order; stable sort keeps it for ties.
        matching.sort_by_key(|&i| std::cmp::Reverse(self.listeners[i].spec.priority));
        matching
    }
}

impl<D: Document> InputArbiter<D> {
    /// Route `event` through every eligible listener.
    pub fn dispatch(&mut self, event: &Event, page: &mut PageContext<D>) -> DispatchOutcome {
        let target = match event {
            Event::Pointer(pointer) => Some(pointer.target),
            Event::Key(_) => page.document.active_element(),
        }
        .filter(|&id| page.document.node(id).is_some());

        let path = target
            .map(|id| page.document.path_to(id))
            .unwrap_or_default();

        let mut steps = Vec::with_capacity(path.len() * 2 + 2);
        steps.push((Scope::Document, Phase::Capture));
        steps.extend(path.iter().map(|&n| (Scope::Node(n), Phase::Capture)));
        steps.extend(path.iter().rev().map(|&n| (Scope::Node(n), Phase::Bubble)));
        steps.push((Scope::Document, Phase::Bubble));

        let kind = event.kind();
        let mut outcome = DispatchOutcome {
            target,
            ..DispatchOutcome::default()
        };

        'steps: for (scope, phase) in steps {
            let mut halt_after_step = false;
            for idx in self.step_listeners(scope, phase, kind) {
                let ctx = EventCtx {
                    event,
                    target,
                    current: scope,
                    phase,
                    default_prevented: outcome.default_prevented,
                };
                let listener = &mut self.listeners[idx];
                let verdict = (listener.handler)(&ctx, page);
                outcome.invoked.push(listener.id);
                outcome.default_prevented |= verdict.prevent_default;
                match verdict.propagation {
                    Propagation::Continue => {}
                    Propagation::Stop => {
                        if outcome.stopped_by.is_none() {
                            outcome.stopped_by = Some(listener.id);
                        }
                        halt_after_step = true;
                    }
                    Propagation::StopImmediate => {
                        outcome.stopped_by = Some(listener.id);
                        break 'steps;
                    }
                }
            }
            if halt_after_step {
                break;
            }
        }

        tracing::trace!(
            kind = ?kind,
            target = ?target,
            invoked = outcome.invoked.len(),
            stopped = outcome.stopped(),
            default_prevented = outcome.default_prevented,
            "event dispatched"
        );
        outcome
    }
}
