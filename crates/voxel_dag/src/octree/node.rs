//! Node - immutable, hash-consed octree node.
//!
//! A node is either one of the two sentinels (`Full`, `Empty`) or a branch
//! with exactly 8 children. Branches are only ever created by
//! `NodeStore::intern`, which guarantees that identical child tuples share a
//! single allocation. Equality on `Node` is therefore identity.
//!
//! # Octant convention
//!
//! ```text
//! slot = x_neg << 2 | y_neg << 1 | z_neg
//!
//! slot  offset
//!  0    (+0.5, +0.5, +0.5)
//!  1    (+0.5, +0.5, -0.5)
//!  2    (+0.5, -0.5, +0.5)
//!  ...
//!  7    (-0.5, -0.5, -0.5)
//! ```
//!
//! A node covers the cube `[-1, 1]^3` in its own coordinates; slot `i`
//! covers the half-size cube centered on `child_offset(i)`.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use glam::DVec3;

use super::descendants::Descendants;
use crate::fingerprint::Fingerprint;

/// Number of children of a branch.
pub const CHILD_COUNT: usize = 8;

/// Center of child `slot` in its parent's coordinates.
#[inline]
pub fn child_offset(slot: usize) -> DVec3 {
  debug_assert!(slot < CHILD_COUNT, "slot {} out of range", slot);
  let half = |negative: bool| if negative { -0.5 } else { 0.5 };
  DVec3::new(half(slot & 4 != 0), half(slot & 2 != 0), half(slot & 1 != 0))
}

/// Slot whose octant contains `point`. Zero counts as positive.
#[inline]
pub fn octant_of(point: DVec3) -> usize {
  ((point.x < 0.0) as usize) << 2 | ((point.y < 0.0) as usize) << 1 | (point.z < 0.0) as usize
}

/// Octree node handle.
///
/// Cloning is an `Arc` bump for branches and free for sentinels.
#[derive(Clone)]
pub enum Node {
  /// Fully occupied region.
  Full,
  /// Fully empty region.
  Empty,
  /// Subdivided region.
  Branch(Arc<Branch>),
}

/// Interior node payload. Only constructible by the node store.
pub struct Branch {
  children: [Node; CHILD_COUNT],
  fingerprint: Fingerprint,
  fill_level: f64,
}

impl Branch {
  pub(crate) fn new(children: [Node; CHILD_COUNT], fingerprint: Fingerprint) -> Self {
    let fill_level =
      children.iter().map(Node::fill_level).sum::<f64>() / CHILD_COUNT as f64;
    Self {
      children,
      fingerprint,
      fill_level,
    }
  }

  pub fn children(&self) -> &[Node; CHILD_COUNT] {
    &self.children
  }

  pub fn fingerprint(&self) -> Fingerprint {
    self.fingerprint
  }

  pub fn fill_level(&self) -> f64 {
    self.fill_level
  }
}

impl Node {
  #[inline]
  pub fn fingerprint(&self) -> Fingerprint {
    match self {
      Node::Full => Fingerprint::FULL,
      Node::Empty => Fingerprint::EMPTY,
      Node::Branch(branch) => branch.fingerprint,
    }
  }

  /// Occupied fraction of this node's volume, in `[0, 1]`.
  #[inline]
  pub fn fill_level(&self) -> f64 {
    match self {
      Node::Full => 1.0,
      Node::Empty => 0.0,
      Node::Branch(branch) => branch.fill_level,
    }
  }

  #[inline]
  pub fn is_sentinel(&self) -> bool {
    !matches!(self, Node::Branch(_))
  }

  pub fn as_branch(&self) -> Option<&Branch> {
    match self {
      Node::Branch(branch) => Some(branch),
      _ => None,
    }
  }

  /// Child in `slot`. A sentinel is its own child in every slot.
  #[inline]
  pub fn child(&self, slot: usize) -> &Node {
    match self {
      Node::Branch(branch) => &branch.children[slot],
      _ => self,
    }
  }

  pub fn children(&self) -> [Node; CHILD_COUNT] {
    std::array::from_fn(|slot| self.child(slot).clone())
  }

  pub fn child_fingerprints(&self) -> [Fingerprint; CHILD_COUNT] {
    std::array::from_fn(|slot| self.child(slot).fingerprint())
  }

  /// Address-based identity, stable while the node is alive. Sentinels use
  /// values no allocation can have.
  #[inline]
  pub(crate) fn identity(&self) -> usize {
    match self {
      Node::Full => 0,
      Node::Empty => 1,
      Node::Branch(branch) => Arc::as_ptr(branch) as usize,
    }
  }

  /// True if every child of `self` is identical to the matching entry.
  pub(crate) fn has_children(&self, children: &[Node; CHILD_COUNT]) -> bool {
    children
      .iter()
      .enumerate()
      .all(|(slot, child)| self.child(slot) == child)
  }

  /// Depth-first walk starting at this node. See [`Descendants`].
  pub fn descendants(&self) -> Descendants<'_> {
    Descendants::new(self)
  }

  /// Point query in this node's `[-1, 1]^3` coordinates.
  ///
  /// Descends until a sentinel is reached. Points outside the cube are
  /// unoccupied.
  pub fn occupies(&self, point: DVec3) -> bool {
    if point.abs().max_element() > 1.0 {
      return false;
    }
    let mut node = self;
    let mut local = point;
    loop {
      match node {
        Node::Full => return true,
        Node::Empty => return false,
        Node::Branch(branch) => {
          let slot = octant_of(local);
          local = (local - child_offset(slot)) * 2.0;
          node = &branch.children[slot];
        }
      }
    }
  }

  /// Compare full expansions, which works across different stores.
  ///
  /// Node pairs already compared are skipped, so shared subtrees are visited
  /// once per pair instead of once per path. Pairs are keyed by identity, not
  /// fingerprint, since distinct nodes may share a fingerprint.
  pub fn structurally_eq(&self, other: &Node) -> bool {
    let mut visited = HashSet::new();
    let mut stack = vec![(self, other)];
    while let Some((a, b)) = stack.pop() {
      match (a, b) {
        (Node::Full, Node::Full) | (Node::Empty, Node::Empty) => {}
        (Node::Branch(x), Node::Branch(y)) => {
          if Arc::ptr_eq(x, y) || !visited.insert((a.identity(), b.identity())) {
            continue;
          }
          stack.extend(x.children.iter().zip(y.children.iter()));
        }
        _ => return false,
      }
    }
    true
  }
}

impl PartialEq for Node {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (Node::Full, Node::Full) | (Node::Empty, Node::Empty) => true,
      (Node::Branch(a), Node::Branch(b)) => Arc::ptr_eq(a, b),
      _ => false,
    }
  }
}

impl Eq for Node {}

impl fmt::Debug for Node {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Node::Full => f.write_str("Full"),
      Node::Empty => f.write_str("Empty"),
      Node::Branch(branch) => f
        .debug_struct("Branch")
        .field("fingerprint", &branch.fingerprint)
        .field("fill_level", &branch.fill_level)
        .finish(),
    }
  }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
