//! Owned mutable XML document tree.
//!
//! Nodes live in a flat arena indexed by [`NodeId`], so ids stay valid across
//! mutation: detaching a node removes it from its parent's child list but
//! never invalidates other ids. The tree is built from a `roxmltree` parse
//! and keeps text and comment nodes, whitespace included, because sibling
//! order and formatting must survive a split/join round trip.

use crate::error::Result;

/// Handle to a node inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// The kind of a node, decided once at parse time.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Synthetic document root holding top-level comments and the root
    /// element. Never serialized itself.
    Root,
    /// An element with its tag name and attributes in document order.
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
    },
    /// A text node with entities already resolved.
    Text(String),
    /// A comment, without the `<!--`/`-->` delimiters.
    Comment(String),
}

#[derive(Debug)]
struct NodeData {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

/// An in-memory ordered XML tree, mutated in place during splitting and
/// joining and discarded after serialization.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<NodeData>,
}

impl Document {
    /// Parse an XML string into an owned tree.
    ///
    /// # Errors
    /// Returns `XmlParse` if the input is not well-formed XML.
    pub fn parse(xml: &str) -> Result<Self> {
        let parsed = roxmltree::Document::parse(xml)?;
        let mut doc = Document {
            nodes: vec![NodeData {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Root,
            }],
        };
        let root = NodeId(0);
        for child in parsed.root().children() {
            doc.copy_parsed_node(root, child);
        }
        Ok(doc)
    }

    fn copy_parsed_node(&mut self, parent: NodeId, node: roxmltree::Node<'_, '_>) {
        let kind = match node.node_type() {
            roxmltree::NodeType::Element => NodeKind::Element {
                tag: node.tag_name().name().to_string(),
                attributes: node
                    .attributes()
                    .map(|a| (a.name().to_string(), a.value().to_string()))
                    .collect(),
            },
            roxmltree::NodeType::Text => NodeKind::Text(node.text().unwrap_or("").to_string()),
            roxmltree::NodeType::Comment => {
                NodeKind::Comment(node.text().unwrap_or("").to_string())
            }
            // Processing instructions and the root type do not occur inside
            // JMeter plans; the XML declaration is re-emitted on serialize.
            _ => return,
        };
        let id = self.push_node(Some(parent), kind);
        if matches!(self.kind(id), NodeKind::Element { .. }) {
            for child in node.children() {
                self.copy_parsed_node(id, child);
            }
        }
    }

    fn push_node(&mut self, parent: Option<NodeId>, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            parent,
            children: Vec::new(),
            kind,
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }

    /// The synthetic root node.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// The document's root element, if any.
    pub fn root_element(&self) -> Option<NodeId> {
        self.children(self.root())
            .iter()
            .copied()
            .find(|&child| self.is_element(child))
    }

    /// The kind of a node.
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    /// The parent of a node, `None` for the root or a detached node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// The ordered children of a node.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Whether the node is an element.
    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::Element { .. })
    }

    /// The tag name of an element node, `None` for other kinds.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    /// An attribute value of an element node.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Element { attributes, .. } => attributes
                .iter()
                .find(|(attr, _)| attr == name)
                .map(|(_, value)| value.as_str()),
            _ => None,
        }
    }

    /// Set an attribute on an element node, replacing an existing value or
    /// appending a new attribute. No-op on non-element nodes.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        if let NodeKind::Element { attributes, .. } = &mut self.nodes[id.0].kind {
            if let Some(entry) = attributes.iter_mut().find(|(attr, _)| attr == name) {
                entry.1 = value.to_string();
            } else {
                attributes.push((name.to_string(), value.to_string()));
            }
        }
    }

    /// Create a new detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push_node(
            None,
            NodeKind::Element {
                tag: tag.to_string(),
                attributes: Vec::new(),
            },
        )
    }

    fn position_in_parent(&self, id: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.parent(id)?;
        let position = self.children(parent).iter().position(|&child| child == id)?;
        Some((parent, position))
    }

    /// The node immediately after `id` under the same parent, of any kind.
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let (parent, position) = self.position_in_parent(id)?;
        self.children(parent).get(position + 1).copied()
    }

    /// The node immediately before `id` under the same parent, of any kind.
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let (parent, position) = self.position_in_parent(id)?;
        position.checked_sub(1).map(|p| self.children(parent)[p])
    }

    /// Remove a node from its parent's child list. The node and its sub-tree
    /// stay in the arena and keep valid ids, but are no longer reachable
    /// from the root. No-op for already-detached nodes.
    pub fn detach(&mut self, id: NodeId) {
        if let Some((parent, position)) = self.position_in_parent(id) {
            self.nodes[parent.0].children.remove(position);
            self.nodes[id.0].parent = None;
        }
    }

    /// Put `new` at `old`'s position under `old`'s parent and detach `old`.
    /// No-op if `old` is detached.
    pub fn replace_child(&mut self, old: NodeId, new: NodeId) {
        let Some((parent, position)) = self.position_in_parent(old) else {
            return;
        };
        self.detach(new);
        self.nodes[parent.0].children[position] = new;
        self.nodes[new.0].parent = Some(parent);
        self.nodes[old.0].parent = None;
    }

    /// Insert `new` under `reference`'s parent, immediately before
    /// `reference`. No-op if `reference` is detached.
    pub fn insert_before(&mut self, new: NodeId, reference: NodeId) {
        let Some((parent, position)) = self.position_in_parent(reference) else {
            return;
        };
        self.detach(new);
        self.nodes[parent.0].children.insert(position, new);
        self.nodes[new.0].parent = Some(parent);
    }

    /// Deep-copy a sub-tree from another document into this one. The copied
    /// root is detached; attach it with [`Document::insert_before`] or
    /// [`Document::replace_child`].
    pub fn import_from(&mut self, other: &Document, node: NodeId) -> NodeId {
        let id = self.push_node(None, other.kind(node).clone());
        for &child in other.children(node) {
            let imported = self.import_from(other, child);
            self.nodes[imported.0].parent = Some(id);
            self.nodes[id.0].children.push(imported);
        }
        id
    }

    /// All nodes of the sub-tree rooted at `from`, in document (pre-)order,
    /// `from` included.
    pub fn descendants(&self, from: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            out.push(id);
            for &child in self.children(id).iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    /// All elements with the given tag name, in document order.
    pub fn elements_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .filter(|&id| self.tag(id) == Some(tag))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_text_and_comments() {
        let doc = Document::parse("<root>text<!-- note --><child/></root>").unwrap();
        let root = doc.root_element().unwrap();
        let kinds: Vec<_> = doc
            .children(root)
            .iter()
            .map(|&id| doc.kind(id).clone())
            .collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::Text("text".to_string()),
                NodeKind::Comment(" note ".to_string()),
                NodeKind::Element {
                    tag: "child".to_string(),
                    attributes: Vec::new()
                },
            ]
        );
    }

    #[test]
    fn test_attributes_keep_document_order() {
        let doc = Document::parse(r#"<e b="2" a="1"/>"#).unwrap();
        let e = doc.root_element().unwrap();
        assert_eq!(doc.attribute(e, "a"), Some("1"));
        assert_eq!(doc.attribute(e, "b"), Some("2"));
        match doc.kind(e) {
            NodeKind::Element { attributes, .. } => {
                assert_eq!(attributes[0].0, "b");
                assert_eq!(attributes[1].0, "a");
            }
            other => panic!("expected element, got {other:?}"),
        }
    }

    #[test]
    fn test_sibling_navigation() {
        let doc = Document::parse("<root><a/>text<b/></root>").unwrap();
        let root = doc.root_element().unwrap();
        let a = doc.children(root)[0];
        let text = doc.children(root)[1];
        let b = doc.children(root)[2];

        assert_eq!(doc.next_sibling(a), Some(text));
        assert_eq!(doc.next_sibling(text), Some(b));
        assert_eq!(doc.next_sibling(b), None);
        assert_eq!(doc.prev_sibling(a), None);
        assert_eq!(doc.prev_sibling(b), Some(text));
    }

    #[test]
    fn test_detach_and_replace() {
        let mut doc = Document::parse("<root><a/><b/><c/></root>").unwrap();
        let root = doc.root_element().unwrap();
        let a = doc.children(root)[0];
        let b = doc.children(root)[1];

        doc.detach(a);
        assert_eq!(doc.children(root).len(), 2);
        assert_eq!(doc.parent(a), None);

        let replacement = doc.create_element("x");
        doc.replace_child(b, replacement);
        assert_eq!(doc.children(root)[0], replacement);
        assert_eq!(doc.tag(doc.children(root)[0]), Some("x"));
        assert_eq!(doc.parent(b), None);
    }

    #[test]
    fn test_insert_before() {
        let mut doc = Document::parse("<root><a/><c/></root>").unwrap();
        let root = doc.root_element().unwrap();
        let c = doc.children(root)[1];

        let b = doc.create_element("b");
        doc.insert_before(b, c);
        let tags: Vec<_> = doc
            .children(root)
            .iter()
            .filter_map(|&id| doc.tag(id))
            .collect();
        assert_eq!(tags, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_import_from_other_document() {
        let source = Document::parse(r#"<root><item k="v">text</item></root>"#).unwrap();
        let item = source.children(source.root_element().unwrap())[0];

        let mut target = Document::parse("<root><end/></root>").unwrap();
        let end = target.children(target.root_element().unwrap())[0];
        let imported = target.import_from(&source, item);
        target.insert_before(imported, end);

        assert_eq!(target.tag(imported), Some("item"));
        assert_eq!(target.attribute(imported, "k"), Some("v"));
        assert_eq!(
            target.kind(target.children(imported)[0]),
            &NodeKind::Text("text".to_string())
        );
    }

    #[test]
    fn test_elements_by_tag_document_order() {
        let doc =
            Document::parse("<root><a id=\"1\"/><b><a id=\"2\"/></b><a id=\"3\"/></root>").unwrap();
        let ids: Vec<_> = doc
            .elements_by_tag("a")
            .iter()
            .filter_map(|&id| doc.attribute(id, "id"))
            .collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_parse_rejects_malformed_xml() {
        assert!(Document::parse("<root><unclosed></root>").is_err());
    }
}
