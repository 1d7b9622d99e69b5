//! NodeStore - canonical fingerprint -> node table.
//!
//! The store is the only way to obtain a branch. Every branch is registered
//! under its fingerprint on creation and never removed, so the table doubles
//! as the decoder's "known fingerprints" set.
//!
//! Four entries exist from construction:
//!
//! | fingerprint             | node    |
//! |-------------------------|---------|
//! | `FULL`                  | `Full`  |
//! | `EMPTY`                 | `Empty` |
//! | `of_children([FULL; 8])`  | `Full`  |
//! | `of_children([EMPTY; 8])` | `Empty` |
//!
//! The last two make interning 8 identical sentinels collapse back to that
//! sentinel, and let a stream's sentinel records resolve with no extra work.
//!
//! The 32-bit fingerprint is weak and distinct child tuples do share
//! fingerprints in practice, so each entry is a small bucket. `intern` matches
//! children by identity inside the bucket; a tuple that clashes with another
//! gets its own node next to it and is counted as a collision.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use smallvec::{smallvec, SmallVec};

use super::node::{Branch, Node, CHILD_COUNT};
use crate::fingerprint::Fingerprint;
use crate::metrics::StoreMetrics;

/// Nodes sharing one fingerprint, oldest first.
type Bucket = SmallVec<[Node; 1]>;

/// Hash-consing table for octree nodes.
///
/// `intern` takes `&self`; lookup-or-insert runs under one mutex so concurrent
/// builders can never create two branches for the same children. Published
/// nodes are immutable and may be read without touching the store.
pub struct NodeStore {
  table: Mutex<HashMap<Fingerprint, Bucket>>,
  metrics: StoreMetrics,
}

impl NodeStore {
  /// Create a store holding only the sentinel entries.
  pub fn new() -> Self {
    let table = HashMap::from([
      (Fingerprint::FULL, smallvec![Node::Full]),
      (Fingerprint::EMPTY, smallvec![Node::Empty]),
      (Fingerprint::of_children(&[Fingerprint::FULL; CHILD_COUNT]), smallvec![Node::Full]),
      (Fingerprint::of_children(&[Fingerprint::EMPTY; CHILD_COUNT]), smallvec![Node::Empty]),
    ]);
    Self {
      table: Mutex::new(table),
      metrics: StoreMetrics::new(),
    }
  }

  /// The table is append-only, so a panic mid-insert cannot leave it
  /// inconsistent and a poisoned lock is safe to reuse.
  fn lock(&self) -> MutexGuard<'_, HashMap<Fingerprint, Bucket>> {
    self.table.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Return the canonical node for `children`, creating it if needed.
  ///
  /// Children are compared by identity, so element-wise identical tuples
  /// always return the same instance and a fingerprint clash never merges two
  /// different tuples.
  pub fn intern(&self, children: [Node; CHILD_COUNT]) -> Node {
    let fingerprint = Fingerprint::of_children(&children.each_ref().map(Node::fingerprint));

    let mut table = self.lock();
    let bucket = table.entry(fingerprint).or_default();
    if let Some(existing) = bucket.iter().find(|node| node.has_children(&children)) {
      self.metrics.record_hit();
      return existing.clone();
    }

    if !bucket.is_empty() {
      self.metrics.record_collision();
      tracing::warn!(%fingerprint, shared_by = bucket.len() + 1, "fingerprint collision while interning");
    }
    let node = Node::Branch(Arc::new(Branch::new(children, fingerprint)));
    bucket.push(node.clone());
    self.metrics.record_created();
    node
  }

  /// Oldest node registered under `fingerprint`, if any.
  pub fn lookup(&self, fingerprint: Fingerprint) -> Option<Node> {
    self.lock().get(&fingerprint).and_then(|bucket| bucket.first().cloned())
  }

  /// Every node registered under `fingerprint`, oldest first.
  pub fn lookup_all(&self, fingerprint: Fingerprint) -> Vec<Node> {
    self
      .lock()
      .get(&fingerprint)
      .map(|bucket| bucket.to_vec())
      .unwrap_or_default()
  }

  pub fn contains(&self, fingerprint: Fingerprint) -> bool {
    self.lock().contains_key(&fingerprint)
  }

  /// Number of registered entries, including the four sentinel entries.
  pub fn len(&self) -> usize {
    self.lock().values().map(|bucket| bucket.len()).sum()
  }

  /// Always false; the sentinel entries are permanent.
  pub fn is_empty(&self) -> bool {
    self.lock().is_empty()
  }

  pub fn metrics(&self) -> &StoreMetrics {
    &self.metrics
  }
}

impl Default for NodeStore {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;
