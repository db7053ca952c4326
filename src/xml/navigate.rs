//! Pure navigation helpers over a [`Document`].
//!
//! JMeter plans interleave elements with whitespace text nodes, so every
//! element-level query here skips non-element siblings transparently. All
//! walks are plain loops over an explicit cursor; nothing recurses.

use crate::error::{Result, SplitJoinError};
use crate::xml::tree::{Document, NodeId};

/// Whether `node` is an element with the given tag name.
///
/// # Examples
/// ```
/// use jmx2git::xml::{is_element_tag, Document};
///
/// let doc = Document::parse("<root><hashTree/></root>").unwrap();
/// let child = doc.children(doc.root_element().unwrap())[0];
/// assert!(is_element_tag(&doc, child, "hashTree"));
/// assert!(!is_element_tag(&doc, child, "other"));
/// ```
pub fn is_element_tag(doc: &Document, node: NodeId, tag: &str) -> bool {
    doc.tag(node) == Some(tag)
}

/// The nearest following sibling that is an element, skipping text and
/// comment nodes.
pub fn next_element_sibling(doc: &Document, node: NodeId) -> Option<NodeId> {
    let mut current = doc.next_sibling(node);
    while let Some(candidate) = current {
        if doc.is_element(candidate) {
            return Some(candidate);
        }
        current = doc.next_sibling(candidate);
    }
    None
}

/// The nearest preceding sibling that is an element, skipping text and
/// comment nodes.
pub fn prev_element_sibling(doc: &Document, node: NodeId) -> Option<NodeId> {
    let mut current = doc.prev_sibling(node);
    while let Some(candidate) = current {
        if doc.is_element(candidate) {
            return Some(candidate);
        }
        current = doc.prev_sibling(candidate);
    }
    None
}

/// The direct children of `node` that are elements, in order.
pub fn child_elements(doc: &Document, node: NodeId) -> Vec<NodeId> {
    doc.children(node)
        .iter()
        .copied()
        .filter(|&child| doc.is_element(child))
        .collect()
}

/// Find the nearest enclosing element matching `predicate`, where
/// "enclosing" follows the JMeter sub-tree convention: an element's
/// children live in the `hashTree` *sibling* that follows it, so the owner
/// of an ancestor sub-tree is the element immediately preceding that
/// ancestor in sibling order.
///
/// At each ancestor level the element preceding the ancestor is tested; the
/// first match wins.
pub fn nearest_ancestor_matching<F>(doc: &Document, node: NodeId, predicate: F) -> Option<NodeId>
where
    F: Fn(&Document, NodeId) -> bool,
{
    let mut current = doc.parent(node);
    while let Some(ancestor) = current {
        if let Some(preceding) = prev_element_sibling(doc, ancestor) {
            if predicate(doc, preceding) {
                return Some(preceding);
            }
        }
        current = doc.parent(ancestor);
    }
    None
}

/// Collect the inclusive sibling range from `from` to `to`, every node kind
/// included so formatting survives extraction.
///
/// # Errors
/// - `SiblingRangeOverflow` if `to` is not reached within `limit` steps.
/// - `SiblingRangeBroken` if the sibling chain ends before `to`.
pub fn sibling_range(
    doc: &Document,
    from: NodeId,
    to: NodeId,
    limit: usize,
) -> Result<Vec<NodeId>> {
    let mut nodes = vec![from];
    let mut current = from;
    for _ in 0..limit {
        let Some(next) = doc.next_sibling(current) else {
            return Err(SplitJoinError::SiblingRangeBroken);
        };
        nodes.push(next);
        if next == to {
            return Ok(nodes);
        }
        current = next;
    }
    Err(SplitJoinError::SiblingRangeOverflow { limit })
}
