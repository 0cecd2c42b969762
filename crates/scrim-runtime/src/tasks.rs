#![forbid(unsafe_code)]

//! Deferred task queue.
//!
//! Tasks are posted with a delay on a logical clock and run against the
//! document when the clock is advanced past their due time. This is the only
//! asynchrony in a page: handlers run to completion, then whatever they posted
//! runs on a later tick.
//!
//! # Invariants
//!
//! 1. Tasks run in `(due, post order)` order; tasks with equal due times run
//!    FIFO.
//! 2. Each task runs at most once. A cancelled task never runs.
//! 3. The clock only moves forward.
//!
//! # Failure Modes
//!
//! - `cancel()` for an unknown or already-run id returns `false`.
//! - `advance(Duration::ZERO)` runs only tasks already due.

use std::fmt;
use std::time::Duration;

/// A unit of deferred work.
pub type Task<D> = Box<dyn FnOnce(&mut D)>;

/// Handle for a posted task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

impl TaskId {
    #[inline]
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

struct Scheduled<D> {
    id: TaskId,
    due: Duration,
    label: &'static str,
    task: Task<D>,
}

/// FIFO queue of delayed tasks on a logical clock.
pub struct TaskQueue<D> {
    now: Duration,
    next_id: u64,
    pending: Vec<Scheduled<D>>,
}

impl<D> Default for TaskQueue<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> fmt::Debug for TaskQueue<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskQueue")
            .field("now", &self.now)
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl<D> TaskQueue<D> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 1,
            pending: Vec::new(),
        }
    }

    /// Current logical time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of tasks waiting to run.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Labels of pending tasks in run order.
    #[must_use]
    pub fn pending_labels(&self) -> Vec<&'static str> {
        let mut order: Vec<_> = self.pending.iter().collect();
        order.sort_by_key(|s| (s.due, s.id.0));
        order.into_iter().map(|s| s.label).collect()
    }

    /// Post `task` to run `delay` after the current logical time.
    pub fn post(
        &mut self,
        delay: Duration,
        label: &'static str,
        task: impl FnOnce(&mut D) + 'static,
    ) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        let due = self.now + delay;
        tracing::trace!(task = label, id = id.0, due_ms = due.as_millis() as u64, "task posted");
        self.pending.push(Scheduled {
            id,
            due,
            label,
            task: Box::new(task),
        });
        id
    }

    /// Cancel a pending task.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|s| s.id != id);
        before != self.pending.len()
    }

    /// Advance the clock by `elapsed` and run every task now due.
    ///
    /// Returns the number of tasks run.
    pub fn advance(&mut self, target: &mut D, elapsed: Duration) -> usize {
        self.now += elapsed;
        let mut ran = 0;
        while let Some(next) = self.take_next(self.now) {
            tracing::trace!(task = next.label, id = next.id.0, "task run");
            (next.task)(target);
            ran += 1;
        }
        ran
    }

    /// Run every pending task, moving the clock to the last due time.
    pub fn flush(&mut self, target: &mut D) -> usize {
        let horizon = self
            .pending
            .iter()
            .map(|s| s.due)
            .max()
            .unwrap_or(self.now)
            .max(self.now);
        let elapsed = horizon - self.now;
        self.advance(target, elapsed)
    }

    fn take_next(&mut self, now: Duration) -> Option<Scheduled<D>> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, s)| s.due <= now)
            .min_by_key(|(_, s)| (s.due, s.id.0))
            .map(|(i, _)| i)?;
        Some(self.pending.remove(idx))
    }
}
