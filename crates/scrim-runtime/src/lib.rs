#![forbid(unsafe_code)]

//! Event routing and deferred work for scrim pages.
//!
//! - [`InputArbiter`]: explicit, priority-ordered listener registry with
//!   capture/bubble phases and consume semantics.
//! - [`TaskQueue`]: FIFO deferred tasks on a logical clock.
//! - [`Page`]: a document bundled with both.

pub mod arbiter;
pub mod page;
pub mod tasks;

pub use arbiter::{
    DispatchOutcome, EventCtx, Handler, InputArbiter, ListenerId, ListenerSpec, Phase, Priority,
    Propagation, Scope, Verdict,
};
pub use page::{Page, PageContext};
pub use tasks::{Task, TaskId, TaskQueue};
