//! Octree DAG baker.
//!
//! Voxelizes a configured shape into a hash-consed octree and writes it as an
//! encoded stream, or reads such streams back for inspection.
//!
//! Subcommands:
//! - bake: build the configured shape and write the stream file
//! - inspect: print the framing and resolved root of a stream file
//! - verify: build, encode, and decode into a fresh store, then compare

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use voxel_dag::codec::{self, EncodedStream, RECORD_LEN};
use voxel_dag::metrics::StoreStats;
use voxel_dag::octree::distinct_nodes;
use voxel_dag::{build_with, DecodeConfig, Fingerprint, Node, NodeStore};

use config::Config;

/// Octree DAG baker for implicit shapes.
#[derive(Parser, Debug)]
#[command(name = "bake_octree")]
#[command(about = "Bakes implicit shapes into encoded octree DAG streams")]
struct Args {
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Build the configured shape and write its stream.
	Bake {
		/// Path to configuration TOML file.
		#[arg(short, long)]
		config: PathBuf,

		/// Output path (default: `output` from the config, relative to it).
		#[arg(short, long)]
		output: Option<PathBuf>,
	},
	/// Print a summary of a stream file.
	Inspect {
		/// Stream file to read.
		input: PathBuf,

		/// Fail after this many resolution passes.
		#[arg(long)]
		max_passes: Option<usize>,
	},
	/// Check that the configured shape survives an encode/decode round trip.
	Verify {
		/// Path to configuration TOML file.
		#[arg(short, long)]
		config: PathBuf,
	},
}

fn main() -> Result<()> {
	env_logger::init();
	let args = Args::parse();

	match args.command {
		Command::Bake { config, output } => bake(&config, output),
		Command::Inspect { input, max_passes } => inspect(&input, max_passes),
		Command::Verify { config } => verify(&config),
	}
}

/// Load `path` and build its shape into `store`.
fn build_from_config(path: &Path, store: &NodeStore) -> Result<(Config, Node)> {
	println!("Loading config from: {}", path.display());
	let config = Config::load(path)?;

	println!(
		"Building {} at depth {} ({} parallel levels)",
		config.shape.kind(),
		config.depth,
		config.parallel_levels
	);

	let start = Instant::now();
	let root = build_with(store, &config.shape.to_shape(), &config.build_config());
	log::info!("build finished in {:?}", start.elapsed());
	let collisions = store.metrics().snapshot().collisions;
	if collisions > 0 {
		log::warn!("{} nodes share a fingerprint with another node", collisions);
	}

	Ok((config, root))
}

fn bake(config_path: &Path, output: Option<PathBuf>) -> Result<()> {
	let store = NodeStore::new();
	let (config, root) = build_from_config(config_path, &store)?;

	let output = output.unwrap_or_else(|| {
		config_path
			.parent()
			.unwrap_or(Path::new("."))
			.join(&config.output)
	});
	if let Some(parent) = output.parent() {
		if !parent.as_os_str().is_empty() {
			std::fs::create_dir_all(parent)
				.with_context(|| format!("Failed to create output dir: {}", parent.display()))?;
		}
	}

	let file = std::fs::File::create(&output)
		.with_context(|| format!("Failed to create: {}", output.display()))?;
	let bytes = codec::encode(&root).with_context(|| {
		format!(
			"Cannot encode {} at depth {}; try a shallower tree",
			config.shape.kind(),
			config.depth
		)
	})?;
	let mut writer = std::io::BufWriter::new(file);
	writer
		.write_all(&bytes)
		.and_then(|()| writer.flush())
		.with_context(|| format!("Failed to write: {}", output.display()))?;

	print_tree("Baked", &root);
	print_stats(&store.metrics().snapshot(), store.len());
	println!("\nDone! Output written to: {}", output.display());

	Ok(())
}

fn inspect(input: &Path, max_passes: Option<usize>) -> Result<()> {
	let bytes =
		std::fs::read(input).with_context(|| format!("Failed to read: {}", input.display()))?;
	let stream = codec::parse(&bytes)
		.with_context(|| format!("Not an octree stream: {}", input.display()))?;

	println!("Stream: {} ({} bytes)", input.display(), bytes.len());
	print_framing(&stream);

	let mut decode_config = DecodeConfig::default();
	if let Some(limit) = max_passes {
		decode_config = decode_config.with_max_passes(limit);
	}

	let store = NodeStore::new();
	let start = Instant::now();
	let root = stream
		.resolve(&store, &decode_config)
		.context("Failed to resolve stream")?;
	log::info!("decode finished in {:?}", start.elapsed());

	print_tree("Decoded", &root);
	print_stats(&store.metrics().snapshot(), store.len());

	Ok(())
}

fn verify(config_path: &Path) -> Result<()> {
	let source = NodeStore::new();
	let (_, root) = build_from_config(config_path, &source)?;
	print_tree("Built", &root);

	let bytes = check_round_trip(&root, &source)?;

	println!("  ✓ fingerprint {}", root.fingerprint());
	println!("  ✓ structure ({} distinct nodes)", distinct_nodes(&root).len());
	println!("  ✓ stream ({} bytes)", bytes.len());
	println!("\nRound trip OK");

	Ok(())
}

/// Encode `root`, decode it into a fresh store, and compare. Returns the
/// stream on success.
fn check_round_trip(root: &Node, source: &NodeStore) -> Result<Vec<u8>> {
	let bytes = codec::encode(root).context("Failed to encode built tree")?;

	let target = NodeStore::new();
	let decoded = codec::decode(&target, &bytes).context("Failed to decode own stream")?;

	if decoded.fingerprint() != root.fingerprint() {
		anyhow::bail!(
			"root fingerprint changed: {} -> {}",
			root.fingerprint(),
			decoded.fingerprint()
		);
	}
	if !decoded.structurally_eq(root) {
		anyhow::bail!("decoded tree differs from the built tree");
	}
	if codec::encode(&decoded)? != bytes {
		anyhow::bail!("re-encoding the decoded tree changed the stream");
	}
	let reachable = distinct_nodes(root).len();
	if target.len() < reachable || target.len() > source.len() {
		anyhow::bail!(
			"decoded store holds {} entries for {} reachable nodes",
			target.len(),
			reachable
		);
	}

	Ok(bytes)
}

fn print_framing(stream: &EncodedStream) {
	let sentinel_records = stream
		.records
		.iter()
		.filter(|record| {
			record.iter().all(|&fp| fp == Fingerprint::FULL)
				|| record.iter().all(|&fp| fp == Fingerprint::EMPTY)
		})
		.count();
	println!("  target:  {}", stream.target);
	println!(
		"  records: {} ({} sentinel, {} bytes each)",
		stream.records.len(),
		sentinel_records,
		RECORD_LEN
	);
}

fn print_tree(label: &str, root: &Node) {
	let distinct = distinct_nodes(root).len();
	println!(
		"{} root {} (fill {:.4}, {} distinct nodes, {} bytes encoded)",
		label,
		root.fingerprint(),
		root.fill_level(),
		distinct,
		codec::encoded_len(distinct)
	);
}

fn print_stats(stats: &StoreStats, entries: usize) {
	println!(
		"Store: {} entries, {} created, {} hits ({:.1}% reuse), {} collisions",
		entries,
		stats.created,
		stats.hits,
		stats.hit_ratio() * 100.0,
		stats.collisions
	);
}
