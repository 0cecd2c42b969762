#![forbid(unsafe_code)]

//! Click classification against a dialog's markup.

use scrim_core::{Document, Node, NodeId};

use crate::modal::ModalConfig;

/// Resolved elements of one dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalMarkup {
    pub container: NodeId,
    /// Inner box; equals `container` when the markup has none.
    pub dialog_box: NodeId,
    pub openers: Vec<NodeId>,
    pub closers: Vec<NodeId>,
}

impl ModalMarkup {
    /// Whether the markup has a box distinct from the container.
    #[must_use]
    pub fn has_distinct_box(&self) -> bool {
        self.dialog_box != self.container
    }
}

/// Where a click landed relative to a dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// On (or inside) a closer control.
    Closer(NodeId),
    /// On the backdrop.
    Backdrop,
    /// Inside the dialog box, not on a closer.
    Dialog,
    /// Outside the container.
    Outside,
}

/// Classify a click on `target`.
///
/// Closers win over everything else. The backdrop is any element carrying the
/// backdrop class, plus (when the markup has a distinct box) everything in the
/// container outside the box.
pub fn classify_click<D: Document + ?Sized>(
    doc: &D,
    markup: &ModalMarkup,
    config: &ModalConfig,
    target: NodeId,
) -> ClickTarget {
    if !doc.contains(markup.container, target) {
        return ClickTarget::Outside;
    }

    let mut on_backdrop_class = false;
    let mut current = Some(target);
    while let Some(id) = current {
        let Some(node) = doc.node(id) else { break };
        if node.has_attr(&config.closer_attr) {
            return ClickTarget::Closer(id);
        }
        on_backdrop_class |= node.has_class(&config.backdrop_class);
        if id == markup.container {
            break;
        }
        current = node.parent();
    }

    if on_backdrop_class
        || (markup.has_distinct_box() && !doc.contains(markup.dialog_box, target))
    {
        ClickTarget::Backdrop
    } else {
        ClickTarget::Dialog
    }
}

/// Whether `node` is a `<button>` missing an explicit `type`.
pub(crate) fn is_untyped_button(node: &Node) -> bool {
    *node.tag() == scrim_core::Tag::Button && !node.has_attr("type")
}
