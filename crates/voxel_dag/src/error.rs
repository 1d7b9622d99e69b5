//! Error types for stream coding.

use thiserror::Error;

use crate::fingerprint::Fingerprint;

/// Failure to encode or decode a stream.
#[derive(Debug, Error)]
pub enum CodecError {
  /// Byte length is not `4 + 32 * N`.
  #[error("malformed stream: {len} bytes is not a 4-byte header plus whole 32-byte records")]
  MalformedStream { len: usize },

  /// A full resolution pass made no progress and the target is still unknown.
  #[error(
    "target {target} is unresolvable: {pending} records still pending after {passes} passes"
  )]
  UnresolvableReference {
    target: Fingerprint,
    pending: usize,
    passes: usize,
  },

  /// The caller's pass limit ran out before the target resolved.
  #[error("decode gave up after {limit} resolution passes")]
  PassLimit { limit: usize },

  /// Two different nodes would be written under, or read back from, the same
  /// record fingerprint, so a reference to it cannot be resolved uniquely.
  #[error("fingerprint {fingerprint} names more than one node in the stream")]
  FingerprintCollision { fingerprint: Fingerprint },

  #[error("stream i/o failed")]
  Io(#[from] std::io::Error),
}
