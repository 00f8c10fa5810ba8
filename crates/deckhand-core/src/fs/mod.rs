//! Filesystem helpers

pub mod entry;
pub mod tree_hash;

pub use entry::{ContentEntry, content_entry};
pub use tree_hash::hash_tree;
