#![forbid(unsafe_code)]

//! Core types for scrim: input events, the element tree model, and the
//! [`Document`](document::Document) trait through which dialog logic sees a
//! page.

pub mod document;
pub mod event;
#[cfg(feature = "tracing-json")]
pub mod logging;
pub mod node;

pub use document::Document;
pub use event::{
    Event, EventKind, KeyCode, KeyEvent, KeyEventKind, Modifiers, PointerButton, PointerEvent,
    PointerEventKind,
};
pub use node::{Node, NodeId, Selector, Tag};
