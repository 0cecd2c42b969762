#![forbid(unsafe_code)]

//! Open/closed state of one dialog.

use std::fmt;

/// Whether a dialog is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ModalState {
    #[default]
    Closed,
    Open,
}

impl ModalState {
    #[inline]
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }

    /// Transition to `Open`. Returns `false` if already open.
    pub fn open(&mut self) -> bool {
        let changed = !self.is_open();
        *self = Self::Open;
        changed
    }

    /// Transition to `Closed`. Returns `false` if already closed.
    pub fn close(&mut self) -> bool {
        let changed = self.is_open();
        *self = Self::Closed;
        changed
    }
}

impl fmt::Display for ModalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => f.write_str("closed"),
            Self::Open => f.write_str("open"),
        }
    }
}

/// What dismissed a dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloseReason {
    /// Escape was pressed.
    EscapePressed,
    /// The backdrop was clicked.
    BackdropClicked,
    /// A closer control was activated.
    CloserActivated,
    /// `close()` was called directly.
    Programmatic,
}
