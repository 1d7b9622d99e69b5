//! Hash-consed octree.
//!
//! Nodes are interned by content fingerprint, so the tree is really a DAG:
//! any region that repeats, at any depth, is stored once.
//!
//! # Module Structure
//!
//! - [`node`]: `Node` handle, octant convention, point queries
//! - [`store`]: `NodeStore` - the canonical fingerprint -> node table
//! - [`descendants`]: depth-first traversal and distinct-node collection
//! - [`builder`]: voxelize a `Shape` through the store

pub mod builder;
pub mod descendants;
pub mod node;
pub mod store;

// Re-exports
pub use builder::{build, build_with};
pub use descendants::{distinct_nodes, Descendants};
pub use node::{child_offset, octant_of, Branch, Node, CHILD_COUNT};
pub use store::NodeStore;
