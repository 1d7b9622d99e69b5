//! Stream encoder.

use std::collections::HashSet;
use std::io::Write;

use super::{HEADER_LEN, RECORD_LEN};
use crate::error::CodecError;
use crate::fingerprint::Fingerprint;
use crate::octree::{distinct_nodes, Node};

/// Byte length of a stream holding `records` records.
#[inline]
pub fn encoded_len(records: usize) -> usize {
  HEADER_LEN + RECORD_LEN * records
}

/// Encode the DAG under `root`.
///
/// Records are written children before parents, so the stream resolves in a
/// single decode pass. Decoding does not depend on it.
///
/// A record is identified only by the fingerprint of its children, so two
/// reachable nodes with the same record fingerprint would decode as one.
/// Such trees are refused with `FingerprintCollision`.
pub fn encode(root: &Node) -> Result<Vec<u8>, CodecError> {
  let nodes = distinct_nodes(root);

  // `nodes` is distinct by identity, so any repeat here is a clash.
  let mut written = HashSet::with_capacity(nodes.len());
  for node in &nodes {
    let fingerprint = Fingerprint::of_children(&node.child_fingerprints());
    if !written.insert(fingerprint) {
      tracing::warn!(%fingerprint, "tree holds two nodes with one record fingerprint");
      return Err(CodecError::FingerprintCollision { fingerprint });
    }
  }

  let mut bytes = Vec::with_capacity(encoded_len(nodes.len()));
  bytes.extend_from_slice(&root.fingerprint().to_le_bytes());
  for node in &nodes {
    for child in node.child_fingerprints() {
      bytes.extend_from_slice(&child.to_le_bytes());
    }
  }
  tracing::trace!(records = nodes.len(), bytes = bytes.len(), "encoded stream");
  Ok(bytes)
}

/// Encode the DAG under `root` into `writer`.
pub fn write_to<W: Write>(root: &Node, mut writer: W) -> Result<(), CodecError> {
  writer.write_all(&encode(root)?)?;
  writer.flush()?;
  Ok(())
}

#[cfg(test)]
#[path = "encode_test.rs"]
mod encode_test;
