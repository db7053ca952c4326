//! Serialization of the owned tree back to XML text.
//!
//! Empty elements are emitted self-closed, matching the serializer the
//! fragment format was defined against. JMeter itself rejects self-closed
//! `stringProp` elements, so every persisted document is passed through
//! [`fix_string_prop_tags`] before it hits disk.

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;

use crate::xml::tree::{Document, NodeId, NodeKind};

/// XML declaration written at the top of every persisted document.
pub const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>";

/// Self-closed stringProp elements, e.g. `<stringProp name="x"/>`.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static SELF_CLOSED_STRING_PROP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(<stringProp\s[^>]+)/>").expect("valid regex"));

/// Rewrite self-closed `stringProp` elements to explicit open/close pairs.
///
/// # Examples
/// ```
/// use jmx2git::xml::fix_string_prop_tags;
///
/// assert_eq!(
///     fix_string_prop_tags(r#"<stringProp name="a"/>"#),
///     r#"<stringProp name="a"></stringProp>"#
/// );
/// ```
pub fn fix_string_prop_tags(xml: &str) -> String {
    SELF_CLOSED_STRING_PROP
        .replace_all(xml, "${1}></stringProp>")
        .into_owned()
}

/// Serialize a single node (and its sub-tree) to XML text.
pub fn serialize_node(doc: &Document, node: NodeId) -> String {
    let mut out = String::new();
    write_node(doc, node, &mut out);
    out
}

/// Serialize a whole document: the XML declaration followed by every
/// top-level node.
pub fn serialize_document(doc: &Document) -> String {
    let mut out = String::from(XML_DECLARATION);
    out.push('\n');
    for &child in doc.children(doc.root()) {
        write_node(doc, child, &mut out);
    }
    out
}

fn write_node(doc: &Document, node: NodeId, out: &mut String) {
    match doc.kind(node) {
        NodeKind::Root => {
            for &child in doc.children(node) {
                write_node(doc, child, out);
            }
        }
        NodeKind::Element { tag, attributes } => {
            out.push('<');
            out.push_str(tag);
            for (name, value) in attributes {
                // Attribute names come from parsed XML or our own sentinel
                // constants; only values need escaping.
                let _ = write!(out, " {name}=\"{}\"", escape_attribute(value));
            }
            if doc.children(node).is_empty() {
                out.push_str("/>");
            } else {
                out.push('>');
                for &child in doc.children(node) {
                    write_node(doc, child, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
        NodeKind::Text(text) => out.push_str(&escape_text(text)),
        NodeKind::Comment(comment) => {
            out.push_str("<!--");
            out.push_str(comment);
            out.push_str("-->");
        }
    }
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
