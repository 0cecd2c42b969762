#![forbid(unsafe_code)]

//! Test harness for scrim: an instrumented in-memory document, reference page
//! fixtures, and listener spies.

pub mod document;
pub mod fixtures;
pub mod spy;

pub use document::TestDocument;
pub use fixtures::{ContactPage, bare_page, contact_page};
pub use spy::Spy;

use scrim_core::{Event, KeyCode, KeyEvent, Modifiers};

/// Escape press.
#[must_use]
pub fn escape() -> Event {
    Event::key(KeyCode::Escape)
}

/// Tab press, optionally with Shift.
#[must_use]
pub fn tab(shift: bool) -> Event {
    let modifiers = if shift {
        Modifiers::SHIFT
    } else {
        Modifiers::empty()
    };
    Event::Key(KeyEvent::new(KeyCode::Tab).with_modifiers(modifiers))
}
