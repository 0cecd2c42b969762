#![forbid(unsafe_code)]

//! Input events delivered to a page.
//!
//! Events are deliberately small value types: a key press carries the key code
//! and modifier state, a pointer event carries the element it landed on. The
//! document decides the target of key events (the focused element).

use bitflags::bitflags;

use crate::node::NodeId;

/// An input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A keyboard event.
    Key(KeyEvent),
    /// A pointer event with a resolved target element.
    Pointer(PointerEvent),
}

impl Event {
    /// The listener filter this event matches.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Key(key) => match key.kind {
                KeyEventKind::Press => EventKind::KeyDown,
                KeyEventKind::Release => EventKind::KeyUp,
            },
            Self::Pointer(pointer) => match pointer.kind {
                PointerEventKind::Click(_) => EventKind::Click,
                PointerEventKind::Down(_) => EventKind::PointerDown,
            },
        }
    }

    /// Convenience constructor for a key press with no modifiers.
    #[must_use]
    pub const fn key(code: KeyCode) -> Self {
        Self::Key(KeyEvent::new(code))
    }

    /// Convenience constructor for a primary-button click on `target`.
    #[must_use]
    pub const fn click(target: NodeId) -> Self {
        Self::Pointer(PointerEvent::new(
            PointerEventKind::Click(PointerButton::Primary),
            target,
        ))
    }
}

/// Coarse event classification used to filter listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    KeyDown,
    KeyUp,
    Click,
    PointerDown,
}

/// Key codes the dialog machinery cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Escape,
    Tab,
    Enter,
    Backspace,
    Up,
    Down,
    Left,
    Right,
    Char(char),
}

/// Whether a key was pressed or released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    #[default]
    Press,
    Release,
}

bitflags! {
    /// Modifier keys held during an event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
        const META  = 0b1000;
    }
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// Create a key press with no modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
            kind: KeyEventKind::Press,
        }
    }

    /// Set the modifier state.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Set the press/release kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Whether Shift was held.
    #[inline]
    #[must_use]
    pub const fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }

    /// Whether this is a press of `code`.
    #[inline]
    #[must_use]
    pub fn is_press(&self, code: KeyCode) -> bool {
        self.kind == KeyEventKind::Press && self.code == code
    }
}

/// Pointer buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Pointer event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    /// A full press-and-release activation.
    Click(PointerButton),
    /// Button pressed.
    Down(PointerButton),
}

/// A pointer event that landed on `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub target: NodeId,
}

impl PointerEvent {
    #[must_use]
    pub const fn new(kind: PointerEventKind, target: NodeId) -> Self {
        Self { kind, target }
    }

    /// Whether this is a primary-button click.
    #[must_use]
    pub const fn is_primary_click(&self) -> bool {
        matches!(self.kind, PointerEventKind::Click(PointerButton::Primary))
    }
}
