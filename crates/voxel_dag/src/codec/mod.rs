//! Binary stream codec for node DAGs.
//!
//! ```text
//! target      : u32 LE                 fingerprint of the root
//! record[N]   : [u32 LE; 8]            child fingerprints of one node
//! ```
//!
//! One record per distinct node reachable from the root, sentinels included.
//! A record carries only the children; the node's own fingerprint is
//! recomputed from them on decode. Record order carries no meaning, so the
//! decoder resolves records by fixpoint iteration instead of assuming a
//! topological order.

pub mod decode;
pub mod encode;

pub use decode::{decode, decode_with, parse, read_from, EncodedStream};
pub use encode::{encode, encoded_len, write_to};

use crate::fingerprint::Fingerprint;
use crate::octree::CHILD_COUNT;

/// Size of the target fingerprint header.
pub const HEADER_LEN: usize = Fingerprint::ENCODED_LEN;

/// Size of one node record.
pub const RECORD_LEN: usize = Fingerprint::ENCODED_LEN * CHILD_COUNT;

/// Child fingerprints of one node, as stored in a record.
pub type Record = [Fingerprint; CHILD_COUNT];
