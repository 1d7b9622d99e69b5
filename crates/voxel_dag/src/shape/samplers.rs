//! Reference shapes.
//!
//! Deterministic and cheap, meant for tests, benchmarks, and the baker tool.
//! All of them answer in the caller's raw coordinates; the builder reaches
//! smaller boxes through [`Subsection`].

use glam::DVec3;

use super::{Bounds, Shape, Subsection};

/// Ball around `center`. The surface itself is unoccupied.
#[derive(Clone, Debug)]
pub struct Sphere {
  pub center: DVec3,
  pub radius: f64,
}

impl Default for Sphere {
  fn default() -> Self {
    Self {
      center: DVec3::ZERO,
      radius: 1.0,
    }
  }
}

impl Sphere {
  pub fn new(radius: f64) -> Self {
    Self {
      radius,
      ..Self::default()
    }
  }

  pub fn with_center(mut self, center: DVec3) -> Self {
    self.center = center;
    self
  }
}

impl Shape for Sphere {
  fn occupies(&self, point: DVec3) -> bool {
    point.distance(self.center) < self.radius
  }

  fn subsect(&self, a: DVec3, b: DVec3) -> Subsection<'_> {
    Subsection::new(self, a, b)
  }
}

/// Every point occupied.
#[derive(Clone, Copy, Debug, Default)]
pub struct Solid;

impl Shape for Solid {
  fn occupies(&self, _point: DVec3) -> bool {
    true
  }

  fn subsect(&self, a: DVec3, b: DVec3) -> Subsection<'_> {
    Subsection::new(self, a, b)
  }
}

/// Axis-aligned box, boundary inclusive.
#[derive(Clone, Debug)]
pub struct Cuboid {
  pub bounds: Bounds,
}

impl Cuboid {
  pub fn new(a: DVec3, b: DVec3) -> Self {
    Self {
      bounds: Bounds::from_corners(a, b),
    }
  }
}

impl Shape for Cuboid {
  fn occupies(&self, point: DVec3) -> bool {
    self.bounds.contains_point(point)
  }

  fn subsect(&self, a: DVec3, b: DVec3) -> Subsection<'_> {
    Subsection::new(self, a, b)
  }
}

/// Escape-time box/ball fold fractal.
///
/// A point is occupied if its orbit stays within `|z| <= sqrt(3)` for
/// `iterations` steps of:
///
/// ```text
/// z = box_fold(z) * fold
/// z = ball_fold(z, min_radius)
/// z = z * scale - p
/// ```
#[derive(Clone, Debug)]
pub struct MandelBox {
  pub iterations: u32,
  pub scale: f64,
  pub min_radius: f64,
  pub fold: f64,
}

impl Default for MandelBox {
  fn default() -> Self {
    Self {
      iterations: 12,
      scale: 2.0,
      min_radius: 0.5,
      fold: 1.0,
    }
  }
}

impl MandelBox {
  pub fn new(iterations: u32) -> Self {
    Self {
      iterations,
      ..Self::default()
    }
  }

  const BAILOUT: f64 = 1.732_050_807_568_877_2; // sqrt(3)
}

impl Shape for MandelBox {
  fn occupies(&self, point: DVec3) -> bool {
    let min_radius_sq = self.min_radius * self.min_radius;
    let mut z = point;
    for _ in 0..self.iterations {
      if z.length() > Self::BAILOUT {
        return false;
      }

      // Box fold: reflect components beyond +-1 back inside.
      z = z.clamp(DVec3::NEG_ONE, DVec3::ONE) * 2.0 - z;
      z *= self.fold;

      // Ball fold
      let mag = z.length();
      if mag < self.min_radius {
        z /= min_radius_sq;
      } else if mag < 1.0 {
        z /= mag * mag * mag;
      }

      z = z * self.scale - point;
    }
    true
  }

  fn subsect(&self, a: DVec3, b: DVec3) -> Subsection<'_> {
    Subsection::new(self, a, b)
  }
}
