//! Configuration parsing for octree baking.

use anyhow::{Context, Result};
use glam::DVec3;
use serde::Deserialize;
use std::path::Path;
use voxel_dag::{BuildConfig, Cuboid, MandelBox, Shape, Solid, Sphere};

/// Deepest tree the baker will build.
pub const MAX_DEPTH: u32 = 12;

/// Root configuration for a bake.
#[derive(Debug, Deserialize)]
pub struct Config {
	/// Output stream path, relative to the config file.
	pub output: String,
	/// Tree depth; leaves are `2^-depth` of the unit cube per side.
	pub depth: u32,
	/// Levels built in parallel on the rayon pool.
	#[serde(default)]
	pub parallel_levels: u32,
	/// Shape to voxelize.
	pub shape: ShapeConfig,
}

/// Shape section, selected by its `kind` key.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ShapeConfig {
	Sphere {
		#[serde(default = "default_radius")]
		radius: f64,
		#[serde(default)]
		center: [f64; 3],
	},
	Solid,
	Cuboid {
		min: [f64; 3],
		max: [f64; 3],
	},
	Mandelbox {
		#[serde(default = "default_iterations")]
		iterations: u32,
		#[serde(default = "default_scale")]
		scale: f64,
		#[serde(default = "default_min_radius")]
		min_radius: f64,
		#[serde(default = "default_fold")]
		fold: f64,
	},
}

fn default_radius() -> f64 {
	1.0
}

fn default_iterations() -> u32 {
	MandelBox::default().iterations
}

fn default_scale() -> f64 {
	MandelBox::default().scale
}

fn default_min_radius() -> f64 {
	MandelBox::default().min_radius
}

fn default_fold() -> f64 {
	MandelBox::default().fold
}

impl Config {
	/// Load configuration from a TOML file.
	pub fn load(path: &Path) -> Result<Self> {
		let content = std::fs::read_to_string(path)
			.with_context(|| format!("Failed to read config file: {}", path.display()))?;
		Self::parse(&content)
	}

	/// Parse and validate configuration text.
	pub fn parse(content: &str) -> Result<Self> {
		let config: Config =
			toml::from_str(content).with_context(|| "Failed to parse config TOML")?;

		if config.depth > MAX_DEPTH {
			anyhow::bail!("depth must be at most {}, got {}", MAX_DEPTH, config.depth);
		}
		if config.parallel_levels > config.depth {
			anyhow::bail!(
				"parallel_levels ({}) cannot exceed depth ({})",
				config.parallel_levels,
				config.depth
			);
		}
		if let ShapeConfig::Sphere { radius, .. } = config.shape {
			if radius.is_nan() || radius <= 0.0 {
				anyhow::bail!("sphere radius must be positive, got {}", radius);
			}
		}

		Ok(config)
	}

	pub fn build_config(&self) -> BuildConfig {
		BuildConfig::new(self.depth).with_parallel_levels(self.parallel_levels)
	}
}

impl ShapeConfig {
	/// Instantiate the configured shape.
	pub fn to_shape(&self) -> Box<dyn Shape> {
		match *self {
			ShapeConfig::Sphere { radius, center } => {
				Box::new(Sphere::new(radius).with_center(DVec3::from_array(center)))
			}
			ShapeConfig::Solid => Box::new(Solid),
			ShapeConfig::Cuboid { min, max } => {
				Box::new(Cuboid::new(DVec3::from_array(min), DVec3::from_array(max)))
			}
			ShapeConfig::Mandelbox {
				iterations,
				scale,
				min_radius,
				fold,
			} => Box::new(MandelBox {
				iterations,
				scale,
				min_radius,
				fold,
			}),
		}
	}

	pub fn kind(&self) -> &'static str {
		match self {
			ShapeConfig::Sphere { .. } => "sphere",
			ShapeConfig::Solid => "solid",
			ShapeConfig::Cuboid { .. } => "cuboid",
			ShapeConfig::Mandelbox { .. } => "mandelbox",
		}
	}
}
