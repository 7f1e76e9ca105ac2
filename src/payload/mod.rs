//! Hierarchical request payloads.
//!
//! A [`Document`] is a tree of tagged nodes. Nodes carry *properties*
//! (rendered as XML attributes, e.g. `eventId`, and used to address nodes)
//! and named *attribute pairs* (rendered as
//! `<attribute name=".." value=".." />` children). Nodes are addressed with
//! a small path language, see [`NodePath`].
mod document;
mod path;
mod xml;


pub use document::{Document, NodeId};
pub use path::{NodePath, PathSegment, Predicate};

/// Separator used when a multi-valued attribute is flattened into one value.
pub const MULTI_VALUE_DELIMITER: char = ';';

/// Tag of the elements that carry attribute pairs in serialized payloads.
pub const ATTRIBUTE_TAG: &str = "attribute";
