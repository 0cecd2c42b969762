#![forbid(unsafe_code)]

//! A page: one document, its listeners, and its deferred tasks.
//!
//! [`PageContext`] is what listeners and widget operations mutate: the
//! document and the task queue. [`Page`] adds the [`InputArbiter`] that routes
//! events into listeners, and drives the task clock.

use std::time::Duration;

use scrim_core::{Document, Event};
use web_time::Instant;

use crate::arbiter::{DispatchOutcome, InputArbiter};
use crate::tasks::TaskQueue;

/// Mutable state shared by listeners and widget operations.
#[derive(Debug)]
pub struct PageContext<D> {
    pub document: D,
    pub tasks: TaskQueue<D>,
}

impl<D> PageContext<D> {
    #[must_use]
    pub fn new(document: D) -> Self {
        Self {
            document,
            tasks: TaskQueue::new(),
        }
    }

    /// Run tasks due after `elapsed` more logical time.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        self.tasks.advance(&mut self.document, elapsed)
    }

    /// Run every pending task.
    pub fn flush(&mut self) -> usize {
        self.tasks.flush(&mut self.document)
    }
}

/// A document with its input arbiter and task queue.
#[derive(Debug)]
pub struct Page<D> {
    ctx: PageContext<D>,
    arbiter: InputArbiter<D>,
    last_pump: Instant,
}

impl<D: Document> Page<D> {
    #[must_use]
    pub fn new(document: D) -> Self {
        Self {
            ctx: PageContext::new(document),
            arbiter: InputArbiter::new(),
            last_pump: Instant::now(),
        }
    }

    #[must_use]
    pub fn document(&self) -> &D {
        &self.ctx.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.ctx.document
    }

    #[must_use]
    pub fn context(&self) -> &PageContext<D> {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut PageContext<D> {
        &mut self.ctx
    }

    #[must_use]
    pub fn arbiter(&self) -> &InputArbiter<D> {
        &self.arbiter
    }

    pub fn arbiter_mut(&mut self) -> &mut InputArbiter<D> {
        &mut self.arbiter
    }

    /// Borrow the arbiter and context together, for widgets that register
    /// listeners while normalizing markup.
    pub fn split_mut(&mut self) -> (&mut InputArbiter<D>, &mut PageContext<D>) {
        (&mut self.arbiter, &mut self.ctx)
    }

    /// Deliver one event.
    pub fn dispatch(&mut self, event: Event) -> DispatchOutcome {
        self.arbiter.dispatch(&event, &mut self.ctx)
    }

    /// Advance the logical clock by `elapsed`, running due tasks.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        self.ctx.advance(elapsed)
    }

    /// Run every pending task regardless of due time.
    pub fn flush(&mut self) -> usize {
        self.ctx.flush()
    }

    /// Advance the logical clock by the wall time since the last pump.
    pub fn pump(&mut self) -> usize {
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(self.last_pump);
        self.last_pump = now;
        self.advance(elapsed)
    }

    /// Consume the page, returning the document.
    pub fn into_document(self) -> D {
        self.ctx.document
    }
}
