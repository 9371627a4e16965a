//! Arena-backed mutable document tree.
//!
//! Markup is parsed with `roxmltree` (so input must be well-formed XML, e.g.
//! XHTML) and copied into an arena the annotator can mutate. Removed nodes
//! stay in the arena, detached, so handles never dangle.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use roxmltree::{NodeType, ParsingOptions, NS_XML_URI};

use super::position::DocumentPosition;
use super::tree::DocumentTree;
use crate::error::Result;

/// Wrapper element used to parse markup that has several top-level nodes.
const FRAGMENT_WRAPPER: &str = "fragment";

/// Document type declaration, including an internal subset.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static DOCTYPE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<!DOCTYPE\b(?:[^\[>]|\[.*?\])*>").expect("valid regex")
});

/// Handle to a node inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Element name and attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Qualified tag name, with its namespace prefix if it has one.
    pub name: String,
    /// Attributes in source order, namespace declarations first.
    pub attributes: Vec<(String, String)>,
}

impl Element {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn set_attribute(&mut self, name: &str, value: String) {
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    fn remove_attribute(&mut self, name: &str) {
        self.attributes.retain(|(key, _)| key != name);
    }

    fn classes(&self) -> impl Iterator<Item = &str> {
        self.attribute("class").unwrap_or_default().split_whitespace()
    }
}

/// What a node holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The document node; parent of the top-level nodes.
    Root,
    /// An element.
    Element(Element),
    /// Character data.
    Text(String),
    /// A comment.
    Comment(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A mutable document tree.
///
/// # Examples
/// ```
/// use footnotes::dom::{Document, DocumentTree};
///
/// let mut doc = Document::parse(r#"<div id="a"><p>text</p></div>"#).unwrap();
/// let div = doc.element_by_id("a").unwrap();
/// doc.add_class(div, "seen");
/// assert_eq!(doc.to_markup(), r#"<div id="a" class="seen"><p>text</p></div>"#);
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
    doctype: Option<String>,
}

impl Document {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData {
                kind: NodeKind::Root,
                parent: None,
                children: Vec::new(),
            }],
            doctype: None,
        }
    }

    /// Parse a well-formed document with a single root element.
    ///
    /// # Errors
    /// Returns [`FootnotesError::MarkupParse`](crate::FootnotesError::MarkupParse)
    /// if the markup is not well-formed.
    pub fn parse(markup: &str) -> Result<Self> {
        let source = roxmltree::Document::parse_with_options(markup, parsing_options())?;
        let prolog = &markup[..source.root_element().range().start];

        let mut doc = Self::new();
        doc.doctype = DOCTYPE_PATTERN
            .find(prolog)
            .map(|found| found.as_str().to_string());
        let root = doc.root();
        doc.import_children(source.root(), root);
        Ok(doc)
    }

    /// Parse markup that may contain several top-level nodes and text.
    ///
    /// # Errors
    /// Returns [`FootnotesError::MarkupParse`](crate::FootnotesError::MarkupParse)
    /// if the markup is not well-formed.
    pub fn parse_fragment(markup: &str) -> Result<Self> {
        let mut doc = Self::new();
        let root = doc.root();
        doc.import_fragment(root, markup)?;
        Ok(doc)
    }

    /// The document node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// The document type declaration as written in the source, if any.
    #[must_use]
    pub fn doctype(&self) -> Option<&str> {
        self.doctype.as_deref()
    }

    /// What `node` holds, if it exists.
    #[must_use]
    pub fn kind(&self, node: NodeId) -> Option<&NodeKind> {
        self.nodes.get(node.0).map(|data| &data.kind)
    }

    /// Direct children of `node`, including text and comments.
    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0)
            .map(|data| data.children.as_slice())
            .unwrap_or_default()
    }

    /// Element children of `node`.
    pub fn element_children(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(node)
            .iter()
            .copied()
            .filter(|child| self.element(*child).is_some())
    }

    /// Descendants of `node` in document order, excluding `node` itself.
    #[must_use]
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            result.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        result
    }

    /// Serialize the whole document, starting with its doctype.
    #[must_use]
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        if let Some(doctype) = &self.doctype {
            out.push_str(doctype);
            out.push('\n');
        }
        self.write_markup(self.root(), &mut out);
        out
    }

    /// Serialize one node and its subtree.
    #[must_use]
    pub fn node_markup(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_markup(node, &mut out);
        out
    }

    fn write_markup(&self, node: NodeId, out: &mut String) {
        let Some(data) = self.nodes.get(node.0) else {
            return;
        };
        match &data.kind {
            NodeKind::Root => {
                for child in &data.children {
                    self.write_markup(*child, out);
                }
            }
            NodeKind::Text(text) => out.push_str(&html_escape::encode_text(text)),
            NodeKind::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            NodeKind::Element(element) => {
                out.push('<');
                out.push_str(&element.name);
                for (name, value) in &element.attributes {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&html_escape::encode_double_quoted_attribute(value));
                    out.push('"');
                }
                if data.children.is_empty() {
                    out.push_str("/>");
                    return;
                }
                out.push('>');
                for child in &data.children {
                    self.write_markup(*child, out);
                }
                out.push_str("</");
                out.push_str(&element.name);
                out.push('>');
            }
        }
    }

    fn element(&self, node: NodeId) -> Option<&Element> {
        match self.kind(node) {
            Some(NodeKind::Element(element)) => Some(element),
            _ => None,
        }
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        match self.nodes.get_mut(node.0).map(|data| &mut data.kind) {
            Some(NodeKind::Element(element)) => Some(element),
            _ => None,
        }
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|data| data.parent)
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.parent(node) {
            self.nodes[parent.0].children.retain(|child| *child != node);
            self.nodes[node.0].parent = None;
        }
    }

    /// Whether attaching `node` under `parent` would create a cycle.
    fn would_cycle(&self, parent: NodeId, node: NodeId) -> bool {
        let mut current = Some(parent);
        while let Some(candidate) = current {
            if candidate == node {
                return true;
            }
            current = self.parent(candidate);
        }
        false
    }

    fn exists(&self, node: NodeId) -> bool {
        node.0 < self.nodes.len()
    }

    /// Ancestor chain from the topmost node down to `node`.
    fn path_from_top(&self, node: NodeId) -> Vec<NodeId> {
        let mut path = vec![node];
        let mut current = self.parent(node);
        while let Some(parent) = current {
            path.push(parent);
            current = self.parent(parent);
        }
        path.reverse();
        path
    }

    fn import_fragment(&mut self, parent: NodeId, markup: &str) -> Result<()> {
        let wrapped = format!("<{FRAGMENT_WRAPPER}>{markup}</{FRAGMENT_WRAPPER}>");
        let source = roxmltree::Document::parse_with_options(&wrapped, parsing_options())?;
        self.import_children(source.root_element(), parent);
        Ok(())
    }

    fn import_children(&mut self, source: roxmltree::Node<'_, '_>, parent: NodeId) {
        for child in source.children() {
            let kind = match child.node_type() {
                NodeType::Element => NodeKind::Element(Self::import_element(source, child)),
                NodeType::Text => NodeKind::Text(child.text().unwrap_or_default().to_string()),
                NodeType::Comment => {
                    NodeKind::Comment(child.text().unwrap_or_default().to_string())
                }
                NodeType::Root | NodeType::PI => continue,
            };
            let id = self.push(kind);
            self.attach(parent, id);
            if child.is_element() {
                self.import_children(child, id);
            }
        }
    }

    fn import_element(parent: roxmltree::Node<'_, '_>, node: roxmltree::Node<'_, '_>) -> Element {
        let mut attributes: Vec<(String, String)> = Vec::new();

        // Declarations made on this element; inherited ones are skipped.
        for namespace in node.namespaces() {
            if namespace.uri() == NS_XML_URI {
                continue;
            }
            let inherited = parent.is_element()
                && parent
                    .namespaces()
                    .any(|outer| outer.name() == namespace.name() && outer.uri() == namespace.uri());
            if !inherited {
                let name = match namespace.name() {
                    Some(prefix) => format!("xmlns:{prefix}"),
                    None => "xmlns".to_string(),
                };
                attributes.push((name, namespace.uri().to_string()));
            }
        }

        for attr in node.attributes() {
            let prefix = attr
                .namespace()
                .and_then(|uri| Self::attribute_prefix(node, uri));
            attributes.push((qualified_name(prefix, attr.name()), attr.value().to_string()));
        }

        let tag = node.tag_name();
        let prefix = tag.namespace().and_then(|uri| node.lookup_prefix(uri));
        Element {
            name: qualified_name(prefix, tag.name()),
            attributes,
        }
    }

    /// Prefix bound to `uri` at `node`. Unprefixed attributes have no
    /// namespace, so the default namespace never applies here.
    fn attribute_prefix<'input>(node: roxmltree::Node<'_, 'input>, uri: &str) -> Option<&'input str> {
        if uri == NS_XML_URI {
            return Some("xml");
        }
        node.namespaces()
            .find(|namespace| namespace.uri() == uri && namespace.name().is_some())
            .and_then(|namespace| namespace.name())
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }
}

fn parsing_options<'input>() -> ParsingOptions<'input> {
    ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    }
}

fn qualified_name(prefix: Option<&str>, local: &str) -> String {
    match prefix {
        Some(prefix) => format!("{prefix}:{local}"),
        None => local.to_string(),
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_markup())
    }
}

impl DocumentTree for Document {
    type Node = NodeId;

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .find(|node| self.attribute(*node, "id") == Some(id))
    }

    fn is_element(&self, node: NodeId) -> bool {
        self.element(node).is_some()
    }

    fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|element| element.name.as_str())
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node).and_then(|element| element.attribute(name))
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node)
            .is_some_and(|element| element.classes().any(|c| c == class))
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        let Some(element) = self.element_mut(node) else {
            return;
        };
        if element.classes().any(|c| c == class) {
            return;
        }
        let value = match element.attribute("class").map(str::trim) {
            Some(existing) if !existing.is_empty() => format!("{existing} {class}"),
            _ => class.to_string(),
        };
        element.set_attribute("class", value);
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        let Some(element) = self.element_mut(node) else {
            return;
        };
        if element.attribute("class").is_none() {
            return;
        }
        let remaining: Vec<&str> = element.classes().filter(|c| *c != class).collect();
        let value = remaining.join(" ");
        if value.is_empty() {
            element.remove_attribute("class");
        } else {
            element.set_attribute("class", value);
        }
    }

    fn elements_with_attributes(&self, scope: NodeId, names: &[&str]) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|node| {
                self.element(*node).is_some_and(|element| {
                    names.iter().any(|name| element.attribute(name).is_some())
                })
            })
            .collect()
    }

    fn elements_with_class(&self, scope: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|node| self.has_class(*node, class))
            .collect()
    }

    fn last_element_child(&self, node: NodeId) -> Option<NodeId> {
        self.element_children(node).last()
    }

    fn element_child_count(&self, node: NodeId) -> usize {
        self.element_children(node).count()
    }

    fn parent_element(&self, node: NodeId) -> Option<NodeId> {
        self.parent(node).filter(|parent| self.is_element(*parent))
    }

    fn text_content(&self, node: NodeId) -> String {
        let mut text = String::new();
        if let Some(NodeKind::Text(own)) = self.kind(node) {
            text.push_str(own);
        }
        for descendant in self.descendants(node) {
            if let Some(NodeKind::Text(part)) = self.kind(descendant) {
                text.push_str(part);
            }
        }
        text
    }

    fn compare_document_position(&self, node: NodeId, other: NodeId) -> DocumentPosition {
        if node == other {
            return DocumentPosition::default();
        }

        let node_path = self.path_from_top(node);
        let other_path = self.path_from_top(other);

        if node_path.first() != other_path.first() {
            // Arbitrary but consistent: arena order.
            let direction = if other < node {
                DocumentPosition::PRECEDING
            } else {
                DocumentPosition::FOLLOWING
            };
            return DocumentPosition::DISCONNECTED
                | DocumentPosition::IMPLEMENTATION_SPECIFIC
                | direction;
        }

        if node_path.contains(&other) {
            return DocumentPosition::CONTAINS | DocumentPosition::PRECEDING;
        }
        if other_path.contains(&node) {
            return DocumentPosition::CONTAINED_BY | DocumentPosition::FOLLOWING;
        }

        // First level where the paths diverge; both sides share a parent there.
        let depth = node_path
            .iter()
            .zip(&other_path)
            .take_while(|(a, b)| a == b)
            .count();
        let parent = node_path[depth - 1];
        let siblings = self.children(parent);
        let node_index = siblings.iter().position(|n| *n == node_path[depth]);
        let other_index = siblings.iter().position(|n| *n == other_path[depth]);

        if other_index < node_index {
            DocumentPosition::PRECEDING
        } else {
            DocumentPosition::FOLLOWING
        }
    }

    fn create_element(&mut self, tag: &str, attributes: &[(&str, &str)]) -> NodeId {
        self.push(NodeKind::Element(Element {
            name: tag.to_string(),
            attributes: attributes
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        }))
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.exists(parent) || !self.exists(child) || self.would_cycle(parent, child) {
            tracing::warn!(?parent, ?child, "refusing to append node");
            return;
        }
        self.detach(child);
        self.attach(parent, child);
    }

    fn insert_after(&mut self, reference: NodeId, node: NodeId) {
        if !self.exists(node) || self.would_cycle(reference, node) {
            tracing::warn!(?reference, ?node, "refusing to insert node");
            return;
        }
        let Some(parent) = self.parent(reference) else {
            tracing::warn!(?reference, "cannot insert after a node without parent");
            return;
        };
        self.detach(node);
        let siblings = &mut self.nodes[parent.0].children;
        let position = siblings
            .iter()
            .position(|sibling| *sibling == reference)
            .map_or(siblings.len(), |index| index + 1);
        siblings.insert(position, node);
        self.nodes[node.0].parent = Some(parent);
    }

    fn append_text(&mut self, parent: NodeId, text: &str) {
        if !self.exists(parent) {
            return;
        }
        let id = self.push(NodeKind::Text(text.to_string()));
        self.attach(parent, id);
    }

    fn append_markup(&mut self, parent: NodeId, markup: &str) {
        if !self.exists(parent) {
            return;
        }
        if let Err(e) = self.import_fragment(parent, markup) {
            tracing::warn!(error = %e, markup, "label is not well-formed markup, inserting as text");
            self.append_text(parent, markup);
        }
    }

    fn remove(&mut self, node: NodeId) {
        if self.exists(node) {
            self.detach(node);
        }
    }

    fn empty(&mut self, node: NodeId) {
        let Some(data) = self.nodes.get_mut(node.0) else {
            return;
        };
        let children = std::mem::take(&mut data.children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(doc: &Document, id: &str) -> NodeId {
        doc.element_by_id(id).unwrap()
    }

    #[test]
    fn test_parse_and_serialize() {
        let markup = r#"<div id="a"><p>one &amp; two</p><!--note--><br/></div>"#;
        let doc = Document::parse(markup).unwrap();
        assert_eq!(doc.to_markup(), markup);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(Document::parse("<div><p></div>").is_err());
    }

    #[test]
    fn test_parse_fragment_multiple_roots() {
        let doc = Document::parse_fragment("lead <a href='x'>one</a> <b>two</b>").unwrap();
        assert_eq!(doc.children(doc.root()).len(), 4);
        assert_eq!(doc.to_markup(), r#"lead <a href="x">one</a> <b>two</b>"#);
    }

    #[test]
    fn test_default_namespace_kept() {
        let markup = r#"<html xmlns="http://www.w3.org/1999/xhtml"><body/></html>"#;
        let doc = Document::parse(markup).unwrap();
        assert_eq!(doc.to_markup(), markup);
    }

    #[test]
    fn test_doctype_accepted_and_written_back() {
        let markup = "<!DOCTYPE html>\n<html xmlns=\"http://www.w3.org/1999/xhtml\"><body/></html>";
        let doc = Document::parse(markup).unwrap();
        assert_eq!(doc.doctype(), Some("<!DOCTYPE html>"));
        assert_eq!(doc.to_markup(), markup);
    }

    #[test]
    fn test_doctype_internal_subset_entities() {
        let markup = r#"<!DOCTYPE p [<!ENTITY nbsp "&#160;">]><p id="p">a&nbsp;b</p>"#;
        let doc = Document::parse(markup).unwrap();
        assert_eq!(doc.text_content(id(&doc, "p")), "a\u{a0}b");
        assert_eq!(
            doc.to_markup(),
            "<!DOCTYPE p [<!ENTITY nbsp \"&#160;\">]>\n<p id=\"p\">a\u{a0}b</p>"
        );
    }

    #[test]
    fn test_prefixed_names_round_trip() {
        let markup = concat!(
            r#"<div xmlns:xlink="http://www.w3.org/1999/xlink" id="t" xml:lang="en">"#,
            r#"<svg><a id="a" xlink:href="u1" href="u2">x</a></svg></div>"#,
        );
        let doc = Document::parse(markup).unwrap();
        let a = id(&doc, "a");

        assert_eq!(doc.to_markup(), markup);
        assert_eq!(doc.attribute(a, "xlink:href"), Some("u1"));
        assert_eq!(doc.attribute(a, "href"), Some("u2"));
        assert_eq!(doc.attribute(id(&doc, "t"), "lang"), None);
    }

    #[test]
    fn test_prefixed_element_keeps_prefix() {
        let markup = r#"<m:math xmlns:m="http://www.w3.org/1998/Math/MathML"><m:mi>x</m:mi></m:math>"#;
        let doc = Document::parse(markup).unwrap();
        assert_eq!(doc.to_markup(), markup);
    }

    #[test]
    fn test_attribute_and_tag() {
        let doc = Document::parse(r#"<q id="q" cite="">x</q>"#).unwrap();
        let q = id(&doc, "q");
        assert_eq!(doc.tag_name(q), Some("q"));
        assert_eq!(doc.attribute(q, "cite"), Some(""));
        assert_eq!(doc.attribute(q, "href"), None);
    }

    #[test]
    fn test_class_mutation() {
        let mut doc = Document::parse(r#"<p id="p" class=" a  b "/>"#).unwrap();
        let p = id(&doc, "p");
        assert!(doc.has_class(p, "a"));

        doc.add_class(p, "c");
        doc.add_class(p, "a");
        assert_eq!(doc.attribute(p, "class"), Some("a  b c"));

        doc.remove_class(p, "a");
        assert_eq!(doc.attribute(p, "class"), Some("b c"));

        doc.remove_class(p, "b");
        doc.remove_class(p, "c");
        assert_eq!(doc.attribute(p, "class"), None);
    }

    #[test]
    fn test_queries_are_scoped_and_ordered() {
        let doc = Document::parse(
            r#"<div id="root"><a id="1" href="x"><q id="2" cite="y"/></a><span/><blockquote id="3" cite="z"/></div>"#,
        )
        .unwrap();
        let root = id(&doc, "root");
        let found = doc.elements_with_attributes(root, &["href", "cite"]);
        assert_eq!(found, vec![id(&doc, "1"), id(&doc, "2"), id(&doc, "3")]);

        let inner = doc.elements_with_attributes(id(&doc, "1"), &["href", "cite"]);
        assert_eq!(inner, vec![id(&doc, "2")]);
    }

    #[test]
    fn test_compare_document_position() {
        let doc =
            Document::parse(r#"<div id="d"><p id="p"><a id="a"/></p><p id="q"/></div>"#).unwrap();
        let (d, p, a, q) = (id(&doc, "d"), id(&doc, "p"), id(&doc, "a"), id(&doc, "q"));

        assert!(doc.compare_document_position(p, p).is_same());
        assert_eq!(
            doc.compare_document_position(p, q),
            DocumentPosition::FOLLOWING
        );
        assert_eq!(
            doc.compare_document_position(q, a),
            DocumentPosition::PRECEDING
        );
        assert_eq!(
            doc.compare_document_position(a, d),
            DocumentPosition::CONTAINS | DocumentPosition::PRECEDING
        );
        assert_eq!(
            doc.compare_document_position(d, a),
            DocumentPosition::CONTAINED_BY | DocumentPosition::FOLLOWING
        );
    }

    #[test]
    fn test_compare_disconnected() {
        let mut doc = Document::parse(r#"<div id="d"/>"#).unwrap();
        let d = id(&doc, "d");
        let loose = doc.create_element("span", &[]);
        let position = doc.compare_document_position(d, loose);
        assert!(position.contains(DocumentPosition::DISCONNECTED));
        assert!(position.contains(DocumentPosition::IMPLEMENTATION_SPECIFIC));
    }

    #[test]
    fn test_insert_after_and_append() {
        let mut doc = Document::parse(r#"<p id="p"><a id="a">x</a> tail</p>"#).unwrap();
        let (p, a) = (id(&doc, "p"), id(&doc, "a"));

        let marker = doc.create_element("span", &[("class", "m")]);
        doc.append_text(marker, "1");
        doc.insert_after(a, marker);

        let end = doc.create_element("em", &[]);
        doc.append_child(p, end);

        assert_eq!(
            doc.to_markup(),
            r#"<p id="p"><a id="a">x</a><span class="m">1</span> tail<em/></p>"#
        );
    }

    #[test]
    fn test_append_child_refuses_cycles() {
        let mut doc = Document::parse(r#"<div id="d"><p id="p"/></div>"#).unwrap();
        let (d, p) = (id(&doc, "d"), id(&doc, "p"));
        doc.append_child(p, d);
        assert_eq!(doc.to_markup(), r#"<div id="d"><p id="p"/></div>"#);
    }

    #[test]
    fn test_append_markup_falls_back_to_text() {
        let mut doc = Document::parse(r#"<p id="p"/>"#).unwrap();
        let p = id(&doc, "p");
        doc.append_markup(p, "<sup>a</sup>");
        doc.append_markup(p, "<b>broken");
        assert_eq!(
            doc.to_markup(),
            r#"<p id="p"><sup>a</sup>&lt;b&gt;broken</p>"#
        );
    }

    #[test]
    fn test_remove_and_empty() {
        let mut doc =
            Document::parse(r#"<ul id="u"><li id="x">1</li><li>2</li></ul>"#).unwrap();
        let (u, x) = (id(&doc, "u"), id(&doc, "x"));

        doc.remove(x);
        assert_eq!(doc.element_child_count(u), 1);
        assert!(doc.element_by_id("x").is_none());

        doc.empty(u);
        assert_eq!(doc.to_markup(), r#"<ul id="u"/>"#);
    }

    #[test]
    fn test_text_content_and_texts() {
        let doc = Document::parse(r#"<ul id="u"><li>a<b>b</b></li><li>c</li></ul>"#).unwrap();
        let u = id(&doc, "u");
        let items: Vec<NodeId> = doc.element_children(u).collect();
        assert_eq!(doc.text_content(u), "abc");
        assert_eq!(doc.texts(&items), vec!["ab".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_parent_element_and_last_child() {
        let doc = Document::parse(r#"<div id="d">x<p id="p"/>y<p id="q"/>z</div>"#).unwrap();
        let (d, q) = (id(&doc, "d"), id(&doc, "q"));
        assert_eq!(doc.last_element_child(d), Some(q));
        assert_eq!(doc.parent_element(q), Some(d));
        assert_eq!(doc.parent_element(d), None);
    }
}
