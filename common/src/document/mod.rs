//! Document seam between the annotation core and the host editor.
//!
//! The core never owns the document. It reads and mutates it through
//! [`DocumentTree`], which mirrors the small part of a DOM the tool needs:
//! ancestor walks, a live selection, range extraction and node insertion.
//! [`InlineDocument`] is the in-memory implementation used by the frontend
//! and by the tests.

use std::collections::BTreeMap;
use std::fmt;

pub mod inline;
pub mod selection;
pub mod span;

pub use inline::InlineDocument;

/// Stable handle of a node. Ids are never reused, so a handle to a removed
/// node stays detectably detached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One end of a range: a text node and a character offset inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boundary {
    pub node: NodeId,
    pub offset: usize,
}

/// A pair of boundaries in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub start: Boundary,
    pub end: Boundary,
}

impl Range {
    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

/// Where extracted content was cut out, and where new nodes go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertionPoint {
    pub parent: NodeId,
    pub index: usize,
}

/// An inline element: tag, class list, attributes and inline style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub classes: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    /// CSS property name to value, e.g. `color` or `font-style`.
    pub style: BTreeMap<String, String>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            style: BTreeMap::new(),
        }
    }

    pub fn with_class(mut self, class: &str) -> Self {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }

    /// Inline style in CSS text form, e.g. `color: red; font-style: italic`.
    pub fn style_text(&self) -> String {
        self.style
            .iter()
            .map(|(property, value)| format!("{}: {}", property, value))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Operations the annotation core performs on a host document.
///
/// Offsets are counted in characters of the document's text content.
pub trait DocumentTree {
    fn root(&self) -> NodeId;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// The element data of `node`, or `None` for text nodes and unknown ids.
    fn element(&self, node: NodeId) -> Option<&Element>;

    /// Whether `node` is still reachable from the root.
    fn is_attached(&self, node: NodeId) -> bool;

    /// Whether both ends of `range` point into attached text at valid offsets.
    fn is_range_attached(&self, range: &Range) -> bool {
        self.text_offsets(range).is_some()
    }

    /// The host's live selection, if any.
    fn selection(&self) -> Option<Range>;

    fn set_selection(&mut self, range: Option<Range>);

    /// Paints (or, with `None`, removes) the cosmetic highlight that stands in
    /// for the native selection. Never changes document structure.
    fn set_fake_highlight(&mut self, range: Option<Range>);

    /// Document-wide `(start, end)` character offsets of an attached range.
    fn text_offsets(&self, range: &Range) -> Option<(usize, usize)>;

    /// The range covering `[start, end)`, if those offsets exist.
    fn range_at(&self, start: usize, end: usize) -> Option<Range>;

    /// Sets the selection to the full extent of `element` and returns it.
    fn expand_to_tag(&mut self, element: NodeId) -> Option<Range>;

    /// Elements whose text extent overlaps `range`, ancestors included.
    fn elements_in_range(&self, range: &Range) -> Vec<NodeId>;

    /// Detaches the content of `range` from the document, splitting text and
    /// elements at the boundaries. Returns the detached top-level nodes in
    /// order and the point they were cut from.
    fn extract_contents(&mut self, range: &Range) -> Option<(Vec<NodeId>, InsertionPoint)>;

    /// Creates a detached element.
    fn create_element(&mut self, element: Element) -> NodeId;

    fn append_child(&mut self, parent: NodeId, child: NodeId);

    fn insert_node(&mut self, at: InsertionPoint, node: NodeId);

    /// Detaches and returns all children of `node`, in order.
    fn take_children(&mut self, node: NodeId) -> Vec<NodeId>;

    /// Detaches `node` from its parent and returns the position it held.
    fn remove(&mut self, node: NodeId) -> Option<InsertionPoint>;
}
