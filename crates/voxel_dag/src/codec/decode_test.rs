use std::io::Cursor;

use super::*;
use crate::codec::{encode, encoded_len, write_to};
use crate::octree::build;
use crate::shape::{Cuboid, MandelBox, Sphere};
use glam::DVec3;

fn stream_bytes(target: Fingerprint, records: &[Record]) -> Vec<u8> {
  let mut bytes = target.to_le_bytes().to_vec();
  for record in records {
    for child in record {
      bytes.extend_from_slice(&child.to_le_bytes());
    }
  }
  bytes
}

fn sphere_tree(store: &NodeStore, depth: u32) -> Node {
  build(store, &Sphere::new(0.9), depth)
}

// =========================================================================
// Framing
// =========================================================================

#[test]
fn test_parse_reads_header_and_records() {
  let record = [
    Fingerprint::FULL,
    Fingerprint::EMPTY,
    Fingerprint::from_raw(1),
    Fingerprint::from_raw(2),
    Fingerprint::from_raw(3),
    Fingerprint::from_raw(4),
    Fingerprint::from_raw(5),
    Fingerprint::from_raw(0xFFFF_FFFF),
  ];
  let bytes = stream_bytes(Fingerprint::from_raw(0x0102_0304), &[record]);

  let stream = parse(&bytes).unwrap();
  assert_eq!(stream.target.raw(), 0x0102_0304);
  assert_eq!(stream.records, vec![record]);
}

#[test]
fn test_header_only_stream_parses() {
  let stream = parse(&Fingerprint::FULL.to_le_bytes()).unwrap();
  assert!(stream.records.is_empty());
}

#[test]
fn test_bad_lengths_are_malformed() {
  for len in [0, 1, 3, 5, 35, 37, 67, 69] {
    let bytes = vec![0u8; len];
    match parse(&bytes) {
      Err(CodecError::MalformedStream { len: reported }) => assert_eq!(reported, len),
      other => panic!("length {} should be malformed, got {:?}", len, other),
    }
  }

  for records in 0..4 {
    let bytes = vec![0u8; encoded_len(records) + 1];
    let store = NodeStore::new();
    assert!(matches!(
      decode(&store, &bytes),
      Err(CodecError::MalformedStream { .. })
    ));
    assert_eq!(store.len(), 4, "malformed input must not touch the store");
  }
}

// =========================================================================
// Round trips
// =========================================================================

/// Sentinels decode to the sentinels themselves, not look-alike branches.
#[test]
fn test_sentinel_round_trip_is_exact() {
  let store = NodeStore::new();
  assert_eq!(decode(&store, &encode(&Node::Full).unwrap()).unwrap(), Node::Full);
  assert_eq!(decode(&store, &encode(&Node::Empty).unwrap()).unwrap(), Node::Empty);
  assert_eq!(store.len(), 4);
}

#[test]
fn test_round_trip_into_same_store_returns_same_instance() {
  let store = NodeStore::new();
  let root = sphere_tree(&store, 4);

  let len = store.len();
  assert_eq!(decode(&store, &encode(&root).unwrap()).unwrap(), root);
  assert_eq!(store.len(), len);
}

#[test]
fn test_round_trip_into_fresh_store() {
  let source = NodeStore::new();
  let root = build(&source, &MandelBox::new(6), 5);
  let bytes = encode(&root).unwrap();

  let target = NodeStore::new();
  let decoded = decode(&target, &bytes).unwrap();

  assert!(decoded.structurally_eq(&root));
  assert_eq!(decoded.fingerprint(), root.fingerprint());
  assert_eq!(decoded.fill_level(), root.fill_level());
  assert_eq!(encode(&decoded).unwrap(), bytes);
  // every distinct branch was recreated, plus the four sentinel entries
  assert_eq!(target.len(), source.len());
}

// =========================================================================
// Fixpoint resolution
// =========================================================================

/// Resolution must not assume `encode`'s children-first order.
#[test]
fn test_any_record_order_resolves() {
  let source = NodeStore::new();
  let root = sphere_tree(&source, 4);
  let stream = parse(&encode(&root).unwrap()).unwrap();

  let mut reversed = stream.records.clone();
  reversed.reverse();
  let mut rotated = stream.records.clone();
  rotated.rotate_left(stream.records.len() / 2);

  for records in [stream.records.clone(), reversed, rotated] {
    let store = NodeStore::new();
    let decoded = decode(&store, &stream_bytes(stream.target, &records)).unwrap();
    assert!(decoded.structurally_eq(&root));
  }
}

#[test]
fn test_children_first_order_needs_one_pass() {
  let source = NodeStore::new();
  let root = sphere_tree(&source, 4);
  let stream = parse(&encode(&root).unwrap()).unwrap();

  let store = NodeStore::new();
  let decoded = stream.resolve(&store, &DecodeConfig::default().with_max_passes(1));
  assert!(decoded.unwrap().structurally_eq(&root));
}

#[test]
fn test_pass_limit_is_enforced() {
  let source = NodeStore::new();
  let root = sphere_tree(&source, 4);
  let mut stream = parse(&encode(&root).unwrap()).unwrap();
  // parents first: each pass can only resolve one more level
  stream.records.reverse();
  let bytes = stream_bytes(stream.target, &stream.records);

  let store = NodeStore::new();
  let result = decode_with(&store, &bytes, &DecodeConfig::default().with_max_passes(1));
  assert!(matches!(result, Err(CodecError::PassLimit { limit: 1 })));

  // The same store finishes the job on a retry.
  assert!(decode(&store, &bytes).unwrap().structurally_eq(&root));
}

/// Records that only reference each other never reach a sentinel.
#[test]
fn test_cycle_without_sentinel_is_unresolvable() {
  let a = Fingerprint::from_raw(0xAAAA_0001);
  let b = Fingerprint::from_raw(0xBBBB_0002);
  let bytes = stream_bytes(a, &[[b; 8], [a; 8]]);

  let store = NodeStore::new();
  match decode(&store, &bytes) {
    Err(CodecError::UnresolvableReference {
      target,
      pending,
      passes,
    }) => {
      assert_eq!(target, a);
      assert_eq!(pending, 2);
      assert_eq!(passes, 1);
    }
    other => panic!("expected an unresolvable stream, got {:?}", other),
  }
  assert_eq!(store.len(), 4);
}

#[test]
fn test_header_only_unknown_target_is_unresolvable() {
  let store = NodeStore::new();
  let bytes = Fingerprint::from_raw(0x1234).to_le_bytes();
  assert!(matches!(
    decode(&store, &bytes),
    Err(CodecError::UnresolvableReference { pending: 0, .. })
  ));
}

/// Dropping the root's record leaves everything below it decodable but the
/// target missing.
#[test]
fn test_missing_root_record_is_unresolvable() {
  let source = NodeStore::new();
  let root = sphere_tree(&source, 3);
  let mut stream = parse(&encode(&root).unwrap()).unwrap();
  let root_record = stream.records.pop().unwrap();
  assert_eq!(root_record, root.child_fingerprints());

  let store = NodeStore::new();
  let result = decode(&store, &stream_bytes(stream.target, &stream.records));
  assert!(matches!(
    result,
    Err(CodecError::UnresolvableReference { pending: 0, .. })
  ));
  assert!(!store.contains(root.fingerprint()));
}

/// Two records whose children collide on fingerprint 0xbee72cb0. Either
/// could be meant by a reference to it, so the stream is rejected before
/// anything is interned.
#[test]
fn test_colliding_records_fail_decode() {
  let e = Fingerprint::EMPTY;
  let f = Fingerprint::FULL;
  let low = [f, e, e, e, e, e, e, e];
  let high = [e, f, f, f, f, f, f, f];
  let low_fp = Fingerprint::of_children(&low);
  let high_fp = Fingerprint::of_children(&high);
  let first = [e, low_fp, e, e, e, e, e, e];
  let second = [f, high_fp, e, e, e, e, e, e];
  assert_eq!(Fingerprint::of_children(&first), Fingerprint::of_children(&second));

  let target = Fingerprint::from_raw(0x0000_0002);
  let bytes = stream_bytes(target, &[low, high, first, second]);
  let store = NodeStore::new();
  match decode(&store, &bytes) {
    Err(CodecError::FingerprintCollision { fingerprint }) => {
      assert_eq!(fingerprint.raw(), 0xBEE7_2CB0);
    }
    other => panic!("expected a collision, got {:?}", other),
  }
  assert_eq!(store.len(), 4);
}

/// Repeating a record verbatim is harmless.
#[test]
fn test_duplicate_records_are_tolerated() {
  let source = NodeStore::new();
  let root = sphere_tree(&source, 3);
  let stream = parse(&encode(&root).unwrap()).unwrap();

  let mut records = stream.records.clone();
  records.extend_from_slice(&stream.records);
  let store = NodeStore::new();
  let decoded = decode(&store, &stream_bytes(stream.target, &records)).unwrap();
  assert!(decoded.structurally_eq(&root));
  assert_eq!(store.len(), source.len());
}

/// A store that already holds a clashing node must not capture a stream's
/// reference to the fingerprint: the stream's own record wins.
#[test]
fn test_stream_records_win_over_clashing_store_entries() {
  let e = Fingerprint::EMPTY;
  let f = Fingerprint::FULL;
  let low = [f, e, e, e, e, e, e, e];
  let high = [e, f, f, f, f, f, f, f];
  let first = [e, Fingerprint::of_children(&low), e, e, e, e, e, e];
  let second = [f, Fingerprint::of_children(&high), e, e, e, e, e, e];
  let clash = Fingerprint::of_children(&first);
  let parent = [clash, e, e, e, e, e, e, e];

  // The store meets `first` before the stream arrives.
  let store = NodeStore::new();
  let stale = decode(&store, &stream_bytes(clash, &[low, first])).unwrap();

  let bytes = stream_bytes(Fingerprint::of_children(&parent), &[high, second, parent]);
  let root = decode(&store, &bytes).unwrap();
  let child = root.child(0);
  assert_ne!(child, &stale);
  assert_eq!(child.fingerprint(), clash);
  assert_eq!(child.child(0), &Node::Full);
  assert_eq!(child.child(1).child_fingerprints(), high);
  assert_eq!(store.lookup_all(clash).len(), 2);
}

/// Deep trees that encode also come back whole.
#[test]
fn test_deep_round_trip() {
  let source = NodeStore::new();
  let shapes: [(Box<dyn crate::shape::Shape>, u32); 2] = [
    (Box::new(Sphere::new(0.6)), 7),
    (
      Box::new(Cuboid::new(DVec3::new(-0.3, -0.55, -0.7), DVec3::new(0.45, 0.6, 0.2))),
      8,
    ),
  ];
  for (shape, depth) in shapes {
    let root = build(&source, &shape, depth);
    let bytes = encode(&root).unwrap();

    let target = NodeStore::new();
    let decoded = decode(&target, &bytes).unwrap();
    assert!(decoded.structurally_eq(&root));
    assert_eq!(encode(&decoded).unwrap(), bytes);
  }
}

// =========================================================================
// I/O
// =========================================================================

#[test]
fn test_write_then_read() {
  let source = NodeStore::new();
  let root = sphere_tree(&source, 3);
  let mut buffer = Vec::new();
  write_to(&root, &mut buffer).unwrap();

  let store = NodeStore::new();
  let decoded = read_from(&store, Cursor::new(buffer)).unwrap();
  assert!(decoded.structurally_eq(&root));
}
