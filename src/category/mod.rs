//! Category hierarchy
//!
//! Builds a parent/children forest from a site's flat category list and keeps
//! an optional JSON copy on disk.

pub mod cache;
mod loader;
mod tree;

pub use loader::CategoryLoader;
pub use tree::{CategoryNode, CategoryTree, SEGMENT_WIDTH};
