//! Build and decode configuration.

/// Configuration for voxelizing a shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildConfig {
  /// Tree depth. Depth 0 samples the shape once at the origin.
  pub depth: u32,

  /// Number of top recursion levels whose 8 children are built on the rayon
  /// pool. 0 builds sequentially on the calling thread.
  pub parallel_levels: u32,
}

impl BuildConfig {
  pub fn new(depth: u32) -> Self {
    Self {
      depth,
      ..Self::default()
    }
  }

  pub fn with_parallel_levels(mut self, levels: u32) -> Self {
    self.parallel_levels = levels;
    self
  }
}

impl Default for BuildConfig {
  fn default() -> Self {
    Self {
      depth: 6,
      parallel_levels: 0,
    }
  }
}

/// Configuration for decoding a stream.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DecodeConfig {
  /// Upper bound on resolution passes. `None` relies on the zero-progress
  /// check alone, which already guarantees termination.
  pub max_passes: Option<usize>,
}

impl DecodeConfig {
  pub fn with_max_passes(mut self, limit: usize) -> Self {
    self.max_passes = Some(limit);
    self
  }
}
