#![forbid(unsafe_code)]

//! Focusable-set computation.
//!
//! [`ContainerSnapshot::capture`] reads the parts of a container subtree that
//! decide focusability; [`compute_focusable`] is a pure function over that
//! snapshot. Tests can build snapshots by hand without any document.
//!
//! # Membership
//!
//! An element is in the set when all of the following hold:
//!
//! 1. It is natively focusable (`a[href]`, `button`, `input`, `select`,
//!    `textarea`) or carries `tabindex >= 0`.
//! 2. It is not disabled.
//! 3. It is rendered, or it currently holds focus.
//!
//! Order is document order. The set is never cached: callers recompute it on
//! every Tab press because the dialog's contents may change while open.

use ahash::AHashMap;
use scrim_core::document::is_natively_focusable;
use scrim_core::{Document, NodeId, Tag};

/// Focus-relevant facts about one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusCandidate {
    pub id: NodeId,
    /// Focusable without a `tabindex` (`a[href]`, form controls).
    pub native: bool,
    pub tab_index: Option<i32>,
    pub disabled: bool,
    /// Has a layout box.
    pub rendered: bool,
}

impl FocusCandidate {
    /// A rendered, enabled candidate with no `tabindex`.
    #[must_use]
    pub const fn native(id: NodeId) -> Self {
        Self {
            id,
            native: true,
            tab_index: None,
            disabled: false,
            rendered: true,
        }
    }

    /// A rendered, non-native candidate with the given `tabindex`.
    #[must_use]
    pub const fn with_tab_index(id: NodeId, tab_index: i32) -> Self {
        Self {
            id,
            native: false,
            tab_index: Some(tab_index),
            disabled: false,
            rendered: true,
        }
    }

    #[must_use]
    pub const fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    #[must_use]
    pub const fn rendered(mut self, rendered: bool) -> Self {
        self.rendered = rendered;
        self
    }
}

/// Snapshot of a container subtree, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerSnapshot {
    pub candidates: Vec<FocusCandidate>,
    /// The document's active element at capture time.
    pub active: Option<NodeId>,
}

impl ContainerSnapshot {
    /// Capture the descendants of `container`.
    pub fn capture<D: Document + ?Sized>(doc: &D, container: NodeId) -> Self {
        let candidates = doc
            .descendants(container)
            .into_iter()
            .filter_map(|id| {
                let node = doc.node(id)?;
                let hidden_input =
                    *node.tag() == Tag::Input && node.attr("type") == Some("hidden");
                Some(FocusCandidate {
                    id,
                    native: is_natively_focusable(node) && !hidden_input,
                    tab_index: node.tab_index(),
                    disabled: node.is_disabled(),
                    rendered: doc.is_rendered(id) && !hidden_input,
                })
            })
            .collect();
        Self {
            candidates,
            active: doc.active_element(),
        }
    }
}

/// Ordered set of focusable elements.
#[derive(Debug, Clone, Default)]
pub struct FocusableSet {
    order: Vec<NodeId>,
    positions: AHashMap<NodeId, usize>,
}

impl FocusableSet {
    fn from_order(order: Vec<NodeId>) -> Self {
        let positions = order.iter().enumerate().map(|(i, &id)| (id, i)).collect();
        Self { order, positions }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn first(&self) -> Option<NodeId> {
        self.order.first().copied()
    }

    #[must_use]
    pub fn last(&self) -> Option<NodeId> {
        self.order.last().copied()
    }

    /// Index of `id` in focus order.
    #[must_use]
    pub fn position(&self, id: NodeId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.positions.contains_key(&id)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[NodeId] {
        &self.order
    }
}

/// Compute the focusable set of a captured container.
#[must_use]
pub fn compute_focusable(snapshot: &ContainerSnapshot) -> FocusableSet {
    let order = snapshot
        .candidates
        .iter()
        .filter(|c| {
            let eligible = c.native || c.tab_index.is_some_and(|t| t >= 0);
            let visible = c.rendered || snapshot.active == Some(c.id);
            eligible && !c.disabled && visible
        })
        .map(|c| c.id)
        .collect();
    FocusableSet::from_order(order)
}

/// Capture and compute in one step.
pub fn focusable_in<D: Document + ?Sized>(doc: &D, container: NodeId) -> FocusableSet {
    compute_focusable(&ContainerSnapshot::capture(doc, container))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn id(n: u32) -> NodeId {
        NodeId::new(n)
    }

    #[test]
    fn empty_snapshot_yields_empty_set() {
        let set = compute_focusable(&ContainerSnapshot::default());
        assert!(set.is_empty());
        assert_eq!(set.first(), None);
        assert_eq!(set.last(), None);
    }

    #[test]
    fn membership_rule() {
        let snapshot = ContainerSnapshot {
            candidates: vec![
                FocusCandidate::native(id(1)),
                FocusCandidate::native(id(2)).disabled(true),
                FocusCandidate::with_tab_index(id(3), 0),
                FocusCandidate::with_tab_index(id(4), -1),
                FocusCandidate::native(id(5)).rendered(false),
                FocusCandidate {
                    id: id(6),
                    native: false,
                    tab_index: None,
                    disabled: false,
                    rendered: true,
                },
                FocusCandidate::with_tab_index(id(7), 3),
            ],
            active: None,
        };
        let set = compute_focusable(&snapshot);
        assert_eq!(set.as_slice(), &[id(1), id(3), id(7)]);
        assert_eq!(set.position(id(3)), Some(1));
        assert!(!set.contains(id(4)));
    }

    #[test]
    fn native_with_negative_tab_index_stays_focusable() {
        let mut button = FocusCandidate::native(id(1));
        button.tab_index = Some(-1);
        let snapshot = ContainerSnapshot {
            candidates: vec![button],
            active: None,
        };
        assert_eq!(compute_focusable(&snapshot).as_slice(), &[id(1)]);
    }

    #[test]
    fn unrendered_active_element_is_kept() {
        let snapshot = ContainerSnapshot {
            candidates: vec![
                FocusCandidate::native(id(1)).rendered(false),
                FocusCandidate::native(id(2)).rendered(false),
            ],
            active: Some(id(2)),
        };
        assert_eq!(compute_focusable(&snapshot).as_slice(), &[id(2)]);
    }

    proptest! {
        #[test]
        fn result_preserves_document_order(
            flags in proptest::collection::vec(any::<(bool, bool, bool)>(), 0..24),
        ) {
            let candidates: Vec<_> = flags
                .iter()
                .enumerate()
                .map(|(i, &(native, disabled, rendered))| FocusCandidate {
                    id: id(i as u32),
                    native,
                    tab_index: None,
                    disabled,
                    rendered,
                })
                .collect();
            let snapshot = ContainerSnapshot { candidates, active: None };
            let set = compute_focusable(&snapshot);
            let ids = set.as_slice();
            prop_assert!(ids.windows(2).all(|w| w[0] < w[1]));
            for (i, &(native, disabled, rendered)) in flags.iter().enumerate() {
                prop_assert_eq!(set.contains(id(i as u32)), native && !disabled && rendered);
            }
        }
    }
}
