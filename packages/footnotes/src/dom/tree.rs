//! The tree interface the annotator works against.

use std::fmt::Debug;

use super::position::DocumentPosition;

/// Element lookup, inspection and mutation over a document tree.
///
/// The annotator never touches a concrete tree type; it only calls these
/// methods. [`Document`](super::Document) is the in-crate implementation.
///
/// Node handles are cheap copies. Query methods return elements in document
/// order and never include the scope element itself.
pub trait DocumentTree {
    /// Handle to a node in the tree.
    type Node: Copy + Eq + Debug;

    /// Find an element by its `id` attribute.
    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// Whether `node` is a live element of this tree.
    fn is_element(&self, node: Self::Node) -> bool;

    /// Tag name of an element, without namespace prefix.
    fn tag_name(&self, node: Self::Node) -> Option<&str>;

    /// Attribute value, or `None` when the attribute is absent.
    fn attribute(&self, node: Self::Node, name: &str) -> Option<&str>;

    /// Whether the element's class list contains `class`.
    fn has_class(&self, node: Self::Node, class: &str) -> bool;

    /// Add `class` to the element's class list if missing.
    fn add_class(&mut self, node: Self::Node, class: &str);

    /// Remove `class` from the element's class list.
    fn remove_class(&mut self, node: Self::Node, class: &str);

    /// Descendant elements of `scope` that carry any of `names`.
    fn elements_with_attributes(&self, scope: Self::Node, names: &[&str]) -> Vec<Self::Node>;

    /// Descendant elements of `scope` whose class list contains `class`.
    fn elements_with_class(&self, scope: Self::Node, class: &str) -> Vec<Self::Node>;

    /// Last element child, skipping text and comments.
    fn last_element_child(&self, node: Self::Node) -> Option<Self::Node>;

    /// Number of element children.
    fn element_child_count(&self, node: Self::Node) -> usize;

    /// Parent element, if the node has one.
    fn parent_element(&self, node: Self::Node) -> Option<Self::Node>;

    /// Concatenated text of the node and its descendants.
    fn text_content(&self, node: Self::Node) -> String;

    /// Where `other` lies relative to `node`.
    fn compare_document_position(&self, node: Self::Node, other: Self::Node)
        -> DocumentPosition;

    /// Create a detached element.
    fn create_element(&mut self, tag: &str, attributes: &[(&str, &str)]) -> Self::Node;

    /// Append `child` as the last child of `parent`, detaching it first.
    fn append_child(&mut self, parent: Self::Node, child: Self::Node);

    /// Insert `node` as the next sibling of `reference`, detaching it first.
    fn insert_after(&mut self, reference: Self::Node, node: Self::Node);

    /// Append a text node.
    fn append_text(&mut self, parent: Self::Node, text: &str);

    /// Parse `markup` and append the resulting nodes. Implementations that
    /// cannot parse the markup append it as text instead.
    fn append_markup(&mut self, parent: Self::Node, markup: &str);

    /// Detach a node and its subtree from the tree.
    fn remove(&mut self, node: Self::Node);

    /// Remove every child of `node`.
    fn empty(&mut self, node: Self::Node);

    /// Text content of several nodes at once.
    fn texts(&self, nodes: &[Self::Node]) -> Vec<String> {
        nodes.iter().map(|node| self.text_content(*node)).collect()
    }
}
