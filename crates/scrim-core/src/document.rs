#![forbid(unsafe_code)]

//! The injectable page view.
//!
//! [`Document`] is everything dialog logic reads from or writes to the page:
//! the element tree, the focused element, and the document-level scroll lock.
//! Tree queries are provided methods built on [`Document::node`], so an
//! implementation only has to expose storage, focus and scrolling.
//!
//! # Invariants
//!
//! - Query results are in document (pre-order) order.
//! - A node is *connected* when its parent chain reaches [`Document::root`];
//!   detached nodes may still be reachable by id but are never rendered.
//! - A node is *rendered* (has a layout box) when it is connected and neither
//!   it nor any ancestor has display `none`.
//!
//! # Failure Modes
//!
//! - Queries on unknown ids return `None` / empty results (no panic).
//! - `focus()` on an element that cannot take focus returns `false` and
//!   leaves the active element unchanged.

use crate::node::{Node, NodeId, Selector, Tag};

/// Read/write view of a page.
pub trait Document {
    /// Root of the tree (the `<body>` or equivalent).
    fn root(&self) -> NodeId;

    /// Look up a node by id.
    fn node(&self, id: NodeId) -> Option<&Node>;

    /// Mutable node lookup.
    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node>;

    /// The element currently holding input focus.
    fn active_element(&self) -> Option<NodeId>;

    /// Move input focus to `id`. Returns `false` when the element cannot
    /// receive focus, in which case the active element is unchanged.
    fn focus(&mut self, id: NodeId) -> bool;

    /// Acquire one hold on the document scroll lock.
    fn acquire_scroll_lock(&mut self);

    /// Release one hold on the document scroll lock.
    fn release_scroll_lock(&mut self);

    /// Whether any scroll lock hold is outstanding.
    fn scroll_locked(&self) -> bool;

    // --- Tree queries ---

    /// Whether `id`'s parent chain reaches the root.
    fn is_connected(&self, id: NodeId) -> bool {
        let root = self.root();
        let mut current = Some(id);
        while let Some(cur) = current {
            if cur == root {
                return true;
            }
            current = self.node(cur).and_then(Node::parent);
        }
        false
    }

    /// Whether `id` has a layout box.
    fn is_rendered(&self, id: NodeId) -> bool {
        if !self.is_connected(id) {
            return false;
        }
        let mut current = Some(id);
        while let Some(cur) = current {
            match self.node(cur) {
                Some(node) if node.is_displayed() => current = node.parent(),
                _ => return false,
            }
        }
        true
    }

    /// Whether `id` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(cur) = current {
            if cur == ancestor {
                return true;
            }
            current = self.node(cur).and_then(Node::parent);
        }
        false
    }

    /// Path from the outermost ancestor down to `id`, inclusive.
    fn path_to(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut current = self.node(id).map(|_| id);
        while let Some(cur) = current {
            path.push(cur);
            current = self.node(cur).and_then(Node::parent);
        }
        path.reverse();
        path
    }

    /// Descendants of `scope` in document order, excluding `scope`.
    fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = match self.node(scope) {
            Some(node) => node.children().iter().rev().copied().collect(),
            None => return out,
        };
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(node) = self.node(id) {
                stack.extend(node.children().iter().rev().copied());
            }
        }
        out
    }

    /// All descendants of `scope` matching `selector`, in document order.
    fn query_all(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&id| self.node(id).is_some_and(|n| selector.matches(n)))
            .collect()
    }

    /// First descendant of `scope` matching `selector`.
    fn query_first(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|&id| self.node(id).is_some_and(|n| selector.matches(n)))
    }

    /// Find a connected element by its `id` attribute.
    fn element_by_id(&self, element_id: &str) -> Option<NodeId> {
        let root = self.root();
        let selector = Selector::id(element_id);
        if self.node(root).is_some_and(|n| selector.matches(n)) {
            return Some(root);
        }
        self.query_first(root, &selector)
    }

    /// Whether `id` could take focus right now.
    ///
    /// Natively focusable elements (`a[href]`, enabled form controls) and
    /// elements with a `tabindex` qualify, provided they are rendered.
    fn can_focus(&self, id: NodeId) -> bool {
        let Some(node) = self.node(id) else {
            return false;
        };
        let focusable = is_natively_focusable(node) || node.tab_index().is_some();
        focusable && !node.is_disabled() && self.is_rendered(id)
    }

    // --- Mutation helpers ---

    /// Set an attribute; returns `false` if the node is unknown.
    fn set_attr(&mut self, id: NodeId, name: &str, value: &str) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.set_attr(name, value);
                true
            }
            None => {
                #[cfg(feature = "tracing")]
                tracing::trace!(node = %id, "mutation on unknown node ignored");
                false
            }
        }
    }

    /// Remove an attribute; returns `false` if the node is unknown.
    fn remove_attr(&mut self, id: NodeId, name: &str) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.remove_attr(name);
                true
            }
            None => {
                #[cfg(feature = "tracing")]
                tracing::trace!(node = %id, "mutation on unknown node ignored");
                false
            }
        }
    }

    /// Set a node's display; returns `false` if the node is unknown.
    fn set_displayed(&mut self, id: NodeId, displayed: bool) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.set_displayed(displayed);
                true
            }
            None => {
                #[cfg(feature = "tracing")]
                tracing::trace!(node = %id, "mutation on unknown node ignored");
                false
            }
        }
    }
}

/// Elements that accept focus without a `tabindex`.
#[must_use]
pub fn is_natively_focusable(node: &Node) -> bool {
    match node.tag() {
        Tag::A => node.has_attr("href"),
        Tag::Button | Tag::Input | Tag::Select | Tag::TextArea => true,
        _ => false,
    }
}
