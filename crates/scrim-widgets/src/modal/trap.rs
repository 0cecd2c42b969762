#![forbid(unsafe_code)]

//! Tab-key focus containment.
//!
//! [`decide_tab`] is the whole trap: given the current focusable set, the
//! active element and the Shift state, it says whether the browser's default
//! tab order may proceed or focus must be redirected.
//!
//! # Rules
//!
//! | Set | Active | Shift | Decision |
//! |-----|--------|-------|----------|
//! | empty | any | any | `Suppress` |
//! | non-empty | first | yes | `MoveTo(last)` |
//! | non-empty | last | no | `MoveTo(first)` |
//! | non-empty | otherwise | any | `Allow` |
//!
//! Focus outside the set is left to the default order, so several open
//! dialogs never redirect the same keypress.

use scrim_a11y::FocusableSet;
use scrim_core::NodeId;

/// Outcome of a Tab press inside an open dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabDecision {
    /// Let the default tab order move focus.
    Allow,
    /// Swallow the key without moving focus.
    Suppress,
    /// Swallow the key and focus this element instead.
    MoveTo(NodeId),
}

impl TabDecision {
    /// Whether the key's default action must be prevented.
    #[must_use]
    pub const fn prevents_default(self) -> bool {
        !matches!(self, Self::Allow)
    }
}

/// Decide what a Tab (or Shift+Tab) press does.
#[must_use]
pub fn decide_tab(set: &FocusableSet, active: Option<NodeId>, shift: bool) -> TabDecision {
    let (Some(first), Some(last)) = (set.first(), set.last()) else {
        return TabDecision::Suppress;
    };
    match active {
        Some(id) if shift && id == first => TabDecision::MoveTo(last),
        Some(id) if !shift && id == last => TabDecision::MoveTo(first),
        _ => TabDecision::Allow,
    }
}
