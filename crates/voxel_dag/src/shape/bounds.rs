//! Axis-aligned box used to address shape subsections.

use glam::DVec3;

/// Double-precision axis-aligned box.
///
/// Built from any two opposite corners; the order does not matter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	/// Minimum corner (inclusive).
	pub min: DVec3,
	/// Maximum corner (inclusive).
	pub max: DVec3,
}

impl Bounds {
	/// Box spanned by two opposite corners, in either order.
	pub fn from_corners(a: DVec3, b: DVec3) -> Self {
		Self {
			min: a.min(b),
			max: a.max(b),
		}
	}

	/// The cube `[-1, 1]^3` every shape and node is expressed in.
	pub const UNIT: Self = Self {
		min: DVec3::NEG_ONE,
		max: DVec3::ONE,
	};

	/// Check if this box contains a point.
	#[inline]
	pub fn contains_point(&self, point: DVec3) -> bool {
		point.x >= self.min.x
			&& point.x <= self.max.x
			&& point.y >= self.min.y
			&& point.y <= self.max.y
			&& point.z >= self.min.z
			&& point.z <= self.max.z
	}

	#[inline]
	pub fn size(&self) -> DVec3 {
		self.max - self.min
	}

	#[inline]
	pub fn center(&self) -> DVec3 {
		(self.min + self.max) * 0.5
	}

	#[inline]
	pub fn half_extents(&self) -> DVec3 {
		self.size() * 0.5
	}
}
