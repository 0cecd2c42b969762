#![forbid(unsafe_code)]

//! scrim public facade.
//!
//! Re-exports the crates of the workspace under short module names and offers
//! a [`prelude`] for the common case of attaching one dialog to a page.

pub use scrim_a11y as a11y;
pub use scrim_core as dom;
pub use scrim_runtime as runtime;
pub use scrim_widgets as widgets;

#[cfg(feature = "tracing-json")]
pub use scrim_core::logging;

/// Common imports.
pub mod prelude {
    pub use scrim_core::{
        Document, Event, EventKind, KeyCode, KeyEvent, Modifiers, Node, NodeId, Selector, Tag,
    };
    pub use scrim_runtime::{DispatchOutcome, ListenerSpec, Page, Priority, Verdict};
    #[cfg(feature = "policy-config")]
    pub use scrim_widgets::modal::ConfigError;
    pub use scrim_widgets::modal::{
        AttachError, CloseReason, ModalConfig, ModalController, ModalState,
    };
}
