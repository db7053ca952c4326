//! XML layer: an owned mutable document tree, navigation helpers, and a
//! serializer with the JMeter `stringProp` compatibility fix-up.
//!
//! Parsing goes through `roxmltree`, but `roxmltree` trees are read-only, so
//! the parse result is copied into an owned arena [`Document`] whose nodes
//! carry an explicit [`NodeKind`]. Splitting and joining mutate that tree in
//! place.

pub mod navigate;
pub mod serialize;
pub mod tree;

pub use navigate::{
    child_elements, is_element_tag, nearest_ancestor_matching, next_element_sibling,
    prev_element_sibling, sibling_range,
};
pub use serialize::{fix_string_prop_tags, serialize_document, serialize_node};
pub use tree::{Document, NodeId, NodeKind};
