#![forbid(unsafe_code)]

//! Hidden-signal publication for assistive technology.
//!
//! A dialog container publishes exactly one boolean: `aria-hidden`. Showing a
//! container also drops the HTML `hidden` attribute so the two signals never
//! disagree.

use scrim_core::{Document, NodeId};

pub const ARIA_HIDDEN: &str = "aria-hidden";
pub const HIDDEN: &str = "hidden";

/// Publish `hidden` on `id`. Returns `false` if the node is unknown.
pub fn publish_hidden<D: Document + ?Sized>(doc: &mut D, id: NodeId, hidden: bool) -> bool {
    if !hidden && !doc.remove_attr(id, HIDDEN) {
        return false;
    }
    doc.set_attr(id, ARIA_HIDDEN, if hidden { "true" } else { "false" })
}

/// Read the published signal. `None` when absent or not a boolean.
#[must_use]
pub fn read_hidden<D: Document + ?Sized>(doc: &D, id: NodeId) -> Option<bool> {
    match doc.node(id)?.attr(ARIA_HIDDEN)? {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}
