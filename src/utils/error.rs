//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a single shard file
#[derive(Error, Debug)]
pub enum ShardError {
    #[error("Failed to read shard {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Shard header truncated in {}: expected 16 bytes, found {found}", .path.display())]
    HeaderTruncated { path: PathBuf, found: usize },

    #[error("Sample region of {} is {length} bytes, not a multiple of 16", .path.display())]
    MisalignedSampleRegion { path: PathBuf, length: u64 },
}

/// Errors that can occur while merging shards into one trace
#[derive(Error, Debug)]
pub enum MergeError {
    #[error("No shard files found for base path {}", .0.display())]
    NoShards(PathBuf),

    #[error(transparent)]
    Shard(#[from] ShardError),

    #[error("Incomplete sample region in {}: declared {expected} bytes, read {read}", .path.display())]
    IncompleteRead {
        path: PathBuf,
        expected: u64,
        read: u64,
    },

    #[error("Shard {} reports {found} ticks/s but earlier shards report {expected}", .path.display())]
    ShardInconsistency {
        path: PathBuf,
        expected: u64,
        found: u64,
    },

    #[error("Shard {} reports a clock rate of 0 ticks/s", .0.display())]
    InvalidClockRate(PathBuf),

    #[error("Sample region too large to address: {0} bytes")]
    TooLarge(u64),
}

/// Errors that can abort an analysis run
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error("Histogram bin width must be positive, got {0}")]
    InvalidBinWidth(f64),

    #[error("Ranking capacity must be at least 1")]
    ZeroCapacity,

    #[error("Loop durations span {buckets:.0} histogram buckets, more than the limit of {limit}")]
    HistogramTooWide { buckets: f64, limit: usize },

    #[error("Trace reports a clock rate of 0 ticks/s")]
    ZeroClockRate,
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

/// Non-fatal conditions that degrade an analysis run
///
/// These are logged and carried in the report instead of aborting.
#[derive(Error, Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AnalysisWarning {
    #[error("No symbol ending in '{suffix}' found for the {marker} marker")]
    SymbolNotFound { marker: String, suffix: String },

    #[error("Loop start marker resolved, but no sample hit it; no loops detected")]
    NoLoopsDetected,
}
