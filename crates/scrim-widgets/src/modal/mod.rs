#![forbid(unsafe_code)]

//! Modal dialog controller, focus trap and trigger classification.
//!
//! # Focus Management
//!
//! - **Auto-focus**: the first focusable element receives focus one deferred
//!   tick after the dialog opens.
//! - **Focus trap**: Tab and Shift+Tab wrap inside the dialog while it is open.
//! - **Focus restore**: the element focused before opening is refocused one
//!   tick after closing, if it can still take focus.
//!
//! # Dismissal
//!
//! Escape, closer controls and backdrop clicks are handled in the document
//! capture phase at [`Priority::DISMISS`](scrim_runtime::Priority::DISMISS)
//! and consumed, so no other page listener can act on them.
//!
//! # Example
//!
//! ```ignore
//! use scrim_runtime::Page;
//! use scrim_widgets::modal::{ModalConfig, ModalController};
//!
//! let mut page = Page::new(document);
//! let modal = ModalController::attach_if_present(&mut page, ModalConfig::default());
//!
//! page.dispatch(Event::click(opener));   // opens, posts focus task
//! page.advance(Duration::from_millis(30)); // focus lands in the dialog
//! page.dispatch(Event::key(KeyCode::Escape)); // closes, consumed
//! ```

mod config;
mod controller;
mod state;
pub mod trap;
mod triggers;

#[cfg(feature = "policy-config")]
pub use config::ConfigError;
pub use config::{DEFAULT_FOCUS_DELAY_MS, ModalConfig};
pub use controller::{AttachError, ModalController};
pub use state::{CloseReason, ModalState};
pub use trap::{TabDecision, decide_tab};
pub use triggers::{ClickTarget, ModalMarkup, classify_click};
