//! Stream decoder.
//!
//! Records may reference nodes whose own records come later, earlier, or not
//! at all (sentinels, or nodes the store already holds). Decoding therefore
//! runs in passes:
//!
//! 1. If the target fingerprint is known, return its node.
//! 2. Scan every pending record. A record whose 8 child fingerprints are all
//!    known is interned, which makes its own fingerprint known.
//! 3. If the pass interned nothing, fail: no later pass can do better.
//!
//! "Known" means decoded from this stream, or else present in the store.
//! Two different records that register the same fingerprint make every
//! reference to it ambiguous and fail the decode up front.
//!
//! Every well-formed stream bottoms out at the sentinels, which the store
//! knows from the start, so step 3 only triggers on broken input. Records
//! interned before a failure stay in the store as unreachable entries.

use std::collections::HashMap;
use std::io::Read;

use super::{Record, HEADER_LEN, RECORD_LEN};
use crate::config::DecodeConfig;
use crate::error::CodecError;
use crate::fingerprint::Fingerprint;
use crate::octree::{Node, NodeStore, CHILD_COUNT};

/// A framed but unresolved stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedStream {
  pub target: Fingerprint,
  pub records: Vec<Record>,
}

fn read_fingerprint(bytes: &[u8]) -> Fingerprint {
  let mut raw = [0u8; Fingerprint::ENCODED_LEN];
  raw.copy_from_slice(&bytes[..Fingerprint::ENCODED_LEN]);
  Fingerprint::from_le_bytes(raw)
}

/// Split `bytes` into target and records without touching any store.
pub fn parse(bytes: &[u8]) -> Result<EncodedStream, CodecError> {
  if bytes.len() < HEADER_LEN || (bytes.len() - HEADER_LEN) % RECORD_LEN != 0 {
    return Err(CodecError::MalformedStream { len: bytes.len() });
  }
  let (header, body) = bytes.split_at(HEADER_LEN);
  let records = body
    .chunks_exact(RECORD_LEN)
    .map(|chunk| {
      let mut record = [Fingerprint::EMPTY; CHILD_COUNT];
      for (child, raw) in record
        .iter_mut()
        .zip(chunk.chunks_exact(Fingerprint::ENCODED_LEN))
      {
        *child = read_fingerprint(raw);
      }
      record
    })
    .collect();
  Ok(EncodedStream {
    target: read_fingerprint(header),
    records,
  })
}

/// Decode `bytes` into `store`, returning the stream's root.
pub fn decode(store: &NodeStore, bytes: &[u8]) -> Result<Node, CodecError> {
  decode_with(store, bytes, &DecodeConfig::default())
}

/// Decode `bytes` into `store` with an optional pass limit.
#[tracing::instrument(skip_all, name = "codec::decode", fields(len = bytes.len()))]
pub fn decode_with(
  store: &NodeStore,
  bytes: &[u8],
  config: &DecodeConfig,
) -> Result<Node, CodecError> {
  let stream = parse(bytes)?;
  resolve(store, stream, config)
}

/// Read a whole stream from `reader` and decode it into `store`.
pub fn read_from<R: Read>(store: &NodeStore, mut reader: R) -> Result<Node, CodecError> {
  let mut bytes = Vec::new();
  reader.read_to_end(&mut bytes)?;
  decode(store, &bytes)
}

impl EncodedStream {
  /// Resolve this stream against `store`.
  pub fn resolve(self, store: &NodeStore, config: &DecodeConfig) -> Result<Node, CodecError> {
    resolve(store, self, config)
  }
}

fn resolve(
  store: &NodeStore,
  stream: EncodedStream,
  config: &DecodeConfig,
) -> Result<Node, CodecError> {
  let EncodedStream { target, records } = stream;

  // Key every record by the fingerprint it registers. Exact repeats are
  // dropped; two different records under one key cannot be told apart.
  let mut keyed: HashMap<Fingerprint, Record> = HashMap::with_capacity(records.len());
  let mut pending = Vec::with_capacity(records.len());
  for record in records {
    let fingerprint = Fingerprint::of_children(&record);
    match keyed.get(&fingerprint) {
      Some(existing) if *existing == record => {}
      Some(_) => {
        tracing::warn!(%fingerprint, "stream holds two records with one fingerprint");
        return Err(CodecError::FingerprintCollision { fingerprint });
      }
      None => {
        keyed.insert(fingerprint, record);
        pending.push((fingerprint, record));
      }
    }
  }

  let mut decoded = HashMap::with_capacity(pending.len());
  let mut passes = 0;

  loop {
    if let Some(node) = find(store, &decoded, target) {
      tracing::debug!(%target, passes, leftover = pending.len(), "stream resolved");
      return Ok(node);
    }
    if let Some(limit) = config.max_passes {
      if passes >= limit {
        return Err(CodecError::PassLimit { limit });
      }
    }

    let before = pending.len();
    let mut unresolved = Vec::with_capacity(before);
    for (fingerprint, record) in pending {
      match find_children(store, &decoded, &record) {
        Some(children) => {
          decoded.insert(fingerprint, store.intern(children));
        }
        None => unresolved.push((fingerprint, record)),
      }
    }
    pending = unresolved;
    passes += 1;

    let resolved = before - pending.len();
    tracing::trace!(pass = passes, resolved, pending = pending.len(), "resolution pass");
    if resolved == 0 {
      tracing::warn!(%target, pending = pending.len(), passes, "stream has unresolvable references");
      return Err(CodecError::UnresolvableReference {
        target,
        pending: pending.len(),
        passes,
      });
    }
  }
}

/// Nodes decoded from this stream take precedence; anything else must already
/// be in the store (the sentinels at least). A store bucket shared by several
/// nodes answers with its oldest.
fn find(
  store: &NodeStore,
  decoded: &HashMap<Fingerprint, Node>,
  fingerprint: Fingerprint,
) -> Option<Node> {
  decoded
    .get(&fingerprint)
    .cloned()
    .or_else(|| store.lookup(fingerprint))
}

fn find_children(
  store: &NodeStore,
  decoded: &HashMap<Fingerprint, Node>,
  record: &Record,
) -> Option<[Node; CHILD_COUNT]> {
  let mut children: [Node; CHILD_COUNT] = std::array::from_fn(|_| Node::Empty);
  for (child, &fingerprint) in children.iter_mut().zip(record) {
    *child = find(store, decoded, fingerprint)?;
  }
  Some(children)
}

#[cfg(test)]
#[path = "decode_test.rs"]
mod decode_test;
