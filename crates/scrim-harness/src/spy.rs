#![forbid(unsafe_code)]

//! Listener spies.
//!
//! A [`Spy`] is a listener that counts how often it ran and passes every
//! event through. Tests use spies to prove that a consumed event never reached
//! another handler.

use std::cell::Cell;
use std::rc::Rc;

use scrim_runtime::{InputArbiter, ListenerId, ListenerSpec, Verdict};

/// Shared invocation counter for a registered spy listener.
#[derive(Debug, Clone)]
pub struct Spy {
    pub id: ListenerId,
    hits: Rc<Cell<u32>>,
}

impl Spy {
    /// Register a pass-through spy.
    pub fn register<D: 'static>(arbiter: &mut InputArbiter<D>, spec: ListenerSpec) -> Self {
        Self::register_with(arbiter, spec, Verdict::PASS)
    }

    /// Register a spy that answers every event with `verdict`.
    pub fn register_with<D: 'static>(
        arbiter: &mut InputArbiter<D>,
        spec: ListenerSpec,
        verdict: Verdict,
    ) -> Self {
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let id = arbiter.register(spec, move |_, _| {
            counter.set(counter.get() + 1);
            verdict
        });
        Self { id, hits }
    }

    /// Number of times the listener ran.
    #[must_use]
    pub fn hits(&self) -> u32 {
        self.hits.get()
    }
}
