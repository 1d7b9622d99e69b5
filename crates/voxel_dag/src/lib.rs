//! voxel_dag - hash-consed octree voxelization of implicit shapes
//!
//! This crate samples an implicit shape (an occupancy predicate that can be
//! restricted to sub-boxes) into an octree of fixed depth, interning every
//! node by content fingerprint so identical subtrees exist once. The result
//! is a DAG that can be written to and read back from a compact binary
//! stream.
//!
//! # Features
//!
//! - **Canonical node store**: `NodeStore::intern` returns one shared
//!   instance per distinct 8-child tuple, even when tuples share a
//!   fingerprint
//! - **Builder**: sequential or rayon-parallel voxelization of any `Shape`
//! - **Codec**: order-free record stream, decoded by fixpoint resolution
//!   that fails instead of spinning on broken input. Trees holding two nodes
//!   with one fingerprint cannot be written in this format and are refused
//!
//! # Example
//!
//! ```ignore
//! use voxel_dag::{build, codec, NodeStore, Sphere};
//!
//! let store = NodeStore::new();
//! let root = build(&store, &Sphere::new(0.6), 6);
//!
//! let bytes = codec::encode(&root)?;
//! let fresh = NodeStore::new();
//! let decoded = codec::decode(&fresh, &bytes)?;
//! assert!(decoded.structurally_eq(&root));
//! ```

pub mod config;
pub mod error;
pub mod fingerprint;
pub mod metrics;

// Re-export commonly used items
pub use config::{BuildConfig, DecodeConfig};
pub use error::CodecError;
pub use fingerprint::Fingerprint;

// Hash-consed octree
pub mod octree;
pub use octree::{build, build_with, child_offset, Node, NodeStore};

// Implicit shapes
pub mod shape;
pub use shape::{Cuboid, MandelBox, Shape, Solid, Sphere, Subsection};

// Stream codec
pub mod codec;
