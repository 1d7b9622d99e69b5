//! Fingerprint - 32-bit content identity of an octree node.
//!
//! A branch's fingerprint is derived from its children's fingerprints only, so
//! two branches with the same 8 children always share a fingerprint. The two
//! sentinels carry fixed constants that every conforming reader and writer
//! must agree on.
//!
//! ```text
//! hash = SEED
//! for slot in 0..8:
//!     hash = (hash + child[slot] + (2 * slot + 1)) << 1     (mod 2^32)
//! ```
//!
//! The mixing is weak and non-cryptographic. Distinct child tuples can collide;
//! `NodeStore::intern` verifies children on every hit and reports a collision
//! instead of merging the two nodes.

use std::fmt;

/// Content fingerprint of a node.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(u32);

impl Fingerprint {
  /// Fingerprint of the fully occupied sentinel.
  pub const FULL: Self = Self(0xDEAD_BEEF);

  /// Fingerprint of the fully empty sentinel.
  pub const EMPTY: Self = Self(0x1337_BED5);

  /// Initial accumulator of the child mixing function.
  pub const SEED: u32 = 0x1234_ABCD;

  /// Size of one fingerprint on the wire.
  pub const ENCODED_LEN: usize = 4;

  pub const fn from_raw(raw: u32) -> Self {
    Self(raw)
  }

  pub const fn raw(self) -> u32 {
    self.0
  }

  /// Mix 8 child fingerprints into the fingerprint of their parent.
  ///
  /// The slot index is folded in with each child so that permutations of the
  /// same children produce different fingerprints.
  pub fn of_children(children: &[Fingerprint; 8]) -> Self {
    let mut hash = Self::SEED;
    for (slot, child) in children.iter().enumerate() {
      hash = hash
        .wrapping_add(child.0)
        .wrapping_add(2 * slot as u32 + 1);
      hash <<= 1;
    }
    Self(hash)
  }

  #[inline]
  pub fn to_le_bytes(self) -> [u8; 4] {
    self.0.to_le_bytes()
  }

  #[inline]
  pub fn from_le_bytes(bytes: [u8; 4]) -> Self {
    Self(u32::from_le_bytes(bytes))
  }
}

impl fmt::Debug for Fingerprint {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Fingerprint({:#010x})", self.0)
  }
}

impl fmt::Display for Fingerprint {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:#010x}", self.0)
  }
}

#[cfg(test)]
#[path = "fingerprint_test.rs"]
mod fingerprint_test;
