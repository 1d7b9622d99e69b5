//! Builder - voxelize a shape into the node store.
//!
//! Each level splits the current view into 8 octant views through
//! `Shape::subsect` and interns the 8 results. Depth 0 samples the view once
//! at its center. Uniform regions collapse into the sentinels as they are
//! interned, so repeated empty or full space costs nothing beyond sampling.

use glam::DVec3;
use rayon::prelude::*;

use super::node::{child_offset, Node, CHILD_COUNT};
use super::NodeStore;
use crate::config::BuildConfig;
use crate::shape::Shape;

/// Corners of child `slot`'s box in its parent's coordinates.
#[inline]
fn child_corners(slot: usize) -> (DVec3, DVec3) {
  let center = child_offset(slot);
  (center - DVec3::splat(0.5), center + DVec3::splat(0.5))
}

/// Voxelize `shape` to `depth` levels on the calling thread.
pub fn build<S: Shape + ?Sized>(store: &NodeStore, shape: &S, depth: u32) -> Node {
  build_with(store, shape, &BuildConfig::new(depth))
}

/// Voxelize `shape` as configured.
///
/// The top `parallel_levels` levels fan their 8 children out over the rayon
/// pool; everything below runs sequentially inside those tasks. Sibling order
/// is irrelevant since every branch funnels through the same `intern`.
#[tracing::instrument(skip_all, name = "octree::build", fields(depth = config.depth))]
pub fn build_with<S: Shape + ?Sized>(
  store: &NodeStore,
  shape: &S,
  config: &BuildConfig,
) -> Node {
  let root = build_level(store, shape, config.depth, config.parallel_levels);
  tracing::debug!(
    fingerprint = %root.fingerprint(),
    fill_level = root.fill_level(),
    store_len = store.len(),
    collisions = store.metrics().snapshot().collisions,
    "build finished"
  );
  root
}

fn build_level<S: Shape + ?Sized>(
  store: &NodeStore,
  shape: &S,
  depth: u32,
  parallel_levels: u32,
) -> Node {
  if depth == 0 {
    return if shape.occupies(DVec3::ZERO) {
      Node::Full
    } else {
      Node::Empty
    };
  }

  let mut children: [Node; CHILD_COUNT] = std::array::from_fn(|_| Node::Empty);
  if parallel_levels > 0 {
    children
      .par_iter_mut()
      .enumerate()
      .for_each(|(slot, child)| {
        let (a, b) = child_corners(slot);
        *child = build_level(store, &shape.subsect(a, b), depth - 1, parallel_levels - 1);
      });
  } else {
    for (slot, child) in children.iter_mut().enumerate() {
      let (a, b) = child_corners(slot);
      *child = build_level(store, &shape.subsect(a, b), depth - 1, 0);
    }
  }
  store.intern(children)
}

#[cfg(test)]
#[path = "builder_test.rs"]
mod builder_test;
