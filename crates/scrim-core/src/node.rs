#![forbid(unsafe_code)]

//! Element tree model.
//!
//! A [`Node`] is the slice of an element that dialog logic needs: its tag,
//! attributes, tree links and whether it is displayed. Nodes are addressed by
//! [`NodeId`] and owned by a [`Document`](crate::document::Document)
//! implementation.
//!
//! # Invariants
//!
//! - `class` and `id` are ordinary attributes; [`Node::has_class`] splits the
//!   `class` value on ASCII whitespace.
//! - `children` is in document order.

use std::fmt;

use ahash::AHashMap;

/// Handle to a node owned by a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw id value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Element tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    A,
    Body,
    Button,
    Div,
    Form,
    Input,
    Section,
    Select,
    Span,
    TextArea,
    Other(String),
}

impl Tag {
    /// Parse a tag name, case-insensitively.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "a" => Self::A,
            "body" => Self::Body,
            "button" => Self::Button,
            "div" => Self::Div,
            "form" => Self::Form,
            "input" => Self::Input,
            "section" => Self::Section,
            "select" => Self::Select,
            "span" => Self::Span,
            "textarea" => Self::TextArea,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Lowercase tag name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::A => "a",
            Self::Body => "body",
            Self::Button => "button",
            Self::Div => "div",
            Self::Form => "form",
            Self::Input => "input",
            Self::Section => "section",
            Self::Select => "select",
            Self::Span => "span",
            Self::TextArea => "textarea",
            Self::Other(name) => name,
        }
    }

    /// Form controls that honor the `disabled` attribute.
    #[must_use]
    pub const fn is_form_control(&self) -> bool {
        matches!(
            self,
            Self::Button | Self::Input | Self::Select | Self::TextArea
        )
    }
}

/// An element in a document tree.
#[derive(Debug, Clone)]
pub struct Node {
    tag: Tag,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attributes: AHashMap<String, String>,
    displayed: bool,
}

impl Node {
    /// Create a detached, displayed node with no attributes.
    #[must_use]
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            parent: None,
            children: Vec::new(),
            attributes: AHashMap::new(),
            displayed: true,
        }
    }

    #[must_use]
    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Link this node under `parent`. Tree owners keep both sides in sync.
    pub fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    pub fn push_child(&mut self, child: NodeId) {
        self.children.push(child);
    }

    pub fn remove_child(&mut self, child: NodeId) {
        self.children.retain(|&c| c != child);
    }

    // --- Attributes ---

    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attributes.remove(name)
    }

    /// The `id` attribute.
    #[must_use]
    pub fn element_id(&self) -> Option<&str> {
        self.attr("id")
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|list| list.split_ascii_whitespace().any(|c| c == class))
    }

    /// Parsed `tabindex`, if present and numeric.
    #[must_use]
    pub fn tab_index(&self) -> Option<i32> {
        self.attr("tabindex").and_then(|v| v.trim().parse().ok())
    }

    /// Whether the `disabled` attribute applies to this element.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.tag.is_form_control() && self.has_attr("disabled")
    }

    // --- Display ---

    /// Whether this node's own display is not `none`.
    #[must_use]
    pub fn is_displayed(&self) -> bool {
        self.displayed
    }

    pub fn set_displayed(&mut self, displayed: bool) {
        self.displayed = displayed;
    }

    /// Builder-style attribute setter.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder-style display setter.
    #[must_use]
    pub fn with_displayed(mut self, displayed: bool) -> Self {
        self.displayed = displayed;
        self
    }
}

/// A single-term selector.
///
/// Markup markers are always a single attribute, class or id, so compound
/// selectors are not modeled.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// `#id`
    Id(String),
    /// `.class`
    Class(String),
    /// `[attr]`
    Attr(String),
    /// `tag`
    Tag(Tag),
}

impl Selector {
    #[must_use]
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    #[must_use]
    pub fn class(class: impl Into<String>) -> Self {
        Self::Class(class.into())
    }

    #[must_use]
    pub fn attr(name: impl Into<String>) -> Self {
        Self::Attr(name.into())
    }

    #[must_use]
    pub fn matches(&self, node: &Node) -> bool {
        match self {
            Self::Id(id) => node.element_id() == Some(id.as_str()),
            Self::Class(class) => node.has_class(class),
            Self::Attr(name) => node.has_attr(name),
            Self::Tag(tag) => node.tag() == tag,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "#{id}"),
            Self::Class(class) => write!(f, ".{class}"),
            Self::Attr(name) => write!(f, "[{name}]"),
            Self::Tag(tag) => f.write_str(tag.name()),
        }
    }
}
