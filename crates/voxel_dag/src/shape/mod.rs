//! Shape contract consumed by the builder.
//!
//! A shape answers "is this point occupied?" in its own coordinates and can
//! hand out a view of any axis-aligned box of itself, re-expressed so the box
//! fills the view's `[-1, 1]^3`.
//!
//! ```text
//! view.occupies(p) == source.occupies(p * scale + offset)
//! offset = box center, scale = box half-extents
//! ```
//!
//! Subsections of subsections fold their transforms into one `Subsection`
//! over the root source, so a query at depth `d` costs one transform, not
//! `d` nested calls.

pub mod bounds;
pub mod samplers;

use glam::DVec3;

pub use bounds::Bounds;
pub use samplers::{Cuboid, MandelBox, Solid, Sphere};

/// Implicit occupancy shape.
///
/// Both operations must be pure. `Send + Sync` lets the parallel builder
/// share one shape across the rayon pool.
pub trait Shape: Send + Sync {
  /// Whether `point` lies inside the shape.
  fn occupies(&self, point: DVec3) -> bool;

  /// View of the box spanned by corners `a` and `b` (in either order).
  fn subsect(&self, a: DVec3, b: DVec3) -> Subsection<'_>;
}

impl<S: Shape + ?Sized> Shape for Box<S> {
  fn occupies(&self, point: DVec3) -> bool {
    (**self).occupies(point)
  }

  fn subsect(&self, a: DVec3, b: DVec3) -> Subsection<'_> {
    (**self).subsect(a, b)
  }
}

/// Affine view of a box inside another shape.
#[derive(Clone, Copy)]
pub struct Subsection<'a> {
  source: &'a dyn Shape,
  offset: DVec3,
  scale: DVec3,
}

impl<'a> Subsection<'a> {
  /// View of `source` over the box spanned by `a` and `b`.
  pub fn new(source: &'a dyn Shape, a: DVec3, b: DVec3) -> Self {
    let bounds = Bounds::from_corners(a, b);
    Self {
      source,
      offset: bounds.center(),
      scale: bounds.half_extents(),
    }
  }

  /// Center of the viewed box in the source's coordinates.
  pub fn offset(&self) -> DVec3 {
    self.offset
  }

  /// Half-extents of the viewed box in the source's coordinates.
  pub fn scale(&self) -> DVec3 {
    self.scale
  }

  /// Map a point from view coordinates into source coordinates.
  #[inline]
  pub fn to_source(&self, point: DVec3) -> DVec3 {
    point * self.scale + self.offset
  }

  /// View of the box spanned by `a` and `b` in this view's coordinates.
  ///
  /// The result borrows the root source, not `self`, so chained calls may
  /// drop the intermediate views.
  pub fn subsect(&self, a: DVec3, b: DVec3) -> Subsection<'a> {
    let bounds = Bounds::from_corners(a, b);
    Subsection {
      source: self.source,
      offset: self.to_source(bounds.center()),
      scale: bounds.half_extents() * self.scale,
    }
  }
}

impl Shape for Subsection<'_> {
  fn occupies(&self, point: DVec3) -> bool {
    self.source.occupies(self.to_source(point))
  }

  fn subsect(&self, a: DVec3, b: DVec3) -> Subsection<'_> {
    Subsection::subsect(self, a, b)
  }
}
