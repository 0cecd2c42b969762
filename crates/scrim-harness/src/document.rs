#![forbid(unsafe_code)]

//! Arena-backed [`Document`] with instrumentation.
//!
//! `TestDocument` behaves like a minimal browser document for the parts the
//! dialog logic touches, and records what happened to it: every successful
//! focus move, and every scroll-lock acquire/release.

use scrim_core::{Document, Node, NodeId, Tag};

/// In-memory document for tests.
#[derive(Debug, Clone)]
pub struct TestDocument {
    nodes: Vec<Node>,
    active: Option<NodeId>,
    focus_log: Vec<NodeId>,
    lock_depth: u32,
    lock_acquisitions: u32,
    lock_releases: u32,
}

impl Default for TestDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl TestDocument {
    /// A document holding only a `<body>` root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(Tag::Body)],
            active: None,
            focus_log: Vec::new(),
            lock_depth: 0,
            lock_acquisitions: 0,
            lock_releases: 0,
        }
    }

    /// Append `node` as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not a node of this document.
    pub fn append(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        assert!(
            self.node(parent).is_some(),
            "append: unknown parent {parent}"
        );
        let id = NodeId::new(self.nodes.len() as u32);
        node.set_parent(Some(parent));
        self.nodes.push(node);
        self.nodes[parent.get() as usize].push_child(id);
        id
    }

    /// Shorthand for appending a tag with attributes.
    pub fn el(&mut self, parent: NodeId, tag: Tag, attrs: &[(&str, &str)]) -> NodeId {
        let node = attrs
            .iter()
            .fold(Node::new(tag), |node, (k, v)| node.with_attr(*k, *v));
        self.append(parent, node)
    }

    /// Detach `id` (and its subtree) from the tree. Focus inside the removed
    /// subtree falls back to nothing, as in a browser.
    pub fn remove(&mut self, id: NodeId) {
        let Some(parent) = self.node(id).and_then(Node::parent) else {
            return;
        };
        if let Some(active) = self.active
            && self.contains(id, active)
        {
            self.active = None;
        }
        self.nodes[parent.get() as usize].remove_child(id);
        self.nodes[id.get() as usize].set_parent(None);
    }

    /// Drop focus without moving it anywhere.
    pub fn blur(&mut self) {
        self.active = None;
    }

    /// Successful focus moves, oldest first.
    #[must_use]
    pub fn focus_log(&self) -> &[NodeId] {
        &self.focus_log
    }

    /// Outstanding scroll lock holds.
    #[must_use]
    pub fn scroll_lock_depth(&self) -> u32 {
        self.lock_depth
    }

    /// Total number of `acquire_scroll_lock` calls.
    #[must_use]
    pub fn scroll_lock_acquisitions(&self) -> u32 {
        self.lock_acquisitions
    }

    /// Total number of `release_scroll_lock` calls.
    #[must_use]
    pub fn scroll_lock_releases(&self) -> u32 {
        self.lock_releases
    }
}

impl Document for TestDocument {
    fn root(&self) -> NodeId {
        NodeId::new(0)
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.get() as usize)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.get() as usize)
    }

    fn active_element(&self) -> Option<NodeId> {
        self.active
    }

    fn focus(&mut self, id: NodeId) -> bool {
        if !self.can_focus(id) {
            tracing::trace!(node = %id, "focus refused");
            return false;
        }
        self.active = Some(id);
        self.focus_log.push(id);
        true
    }

    fn acquire_scroll_lock(&mut self) {
        self.lock_depth += 1;
        self.lock_acquisitions += 1;
    }

    fn release_scroll_lock(&mut self) {
        self.lock_depth = self.lock_depth.saturating_sub(1);
        self.lock_releases += 1;
    }

    fn scroll_locked(&self) -> bool {
        self.lock_depth > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removing_subtree_clears_focus_inside_it() {
        let mut doc = TestDocument::new();
        let root = doc.root();
        let wrapper = doc.el(root, Tag::Div, &[]);
        let button = doc.el(wrapper, Tag::Button, &[]);
        assert!(doc.focus(button));
        doc.remove(wrapper);
        assert_eq!(doc.active_element(), None);
        assert!(!doc.focus(button));
        assert_eq!(doc.focus_log(), &[button]);
    }

    #[test]
    fn scroll_lock_counts() {
        let mut doc = TestDocument::new();
        doc.acquire_scroll_lock();
        doc.acquire_scroll_lock();
        doc.release_scroll_lock();
        assert!(doc.scroll_locked());
        doc.release_scroll_lock();
        assert!(!doc.scroll_locked());
        assert_eq!(doc.scroll_lock_acquisitions(), 2);
        assert_eq!(doc.scroll_lock_releases(), 2);
    }
}
