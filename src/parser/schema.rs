//! Output JSON schema definitions for analysis reports.
//!
//! This module defines the structure of the result returned by the
//! pipeline and written to disk by the CLI.
//! Schema is versioned to allow future evolution.

use crate::utils::error::AnalysisWarning;
use serde::{Deserialize, Serialize};

/// Top-level analysis report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Shard base path the trace was loaded from
    pub base_path: String,

    /// Number of shard files merged
    pub shard_count: usize,

    /// Tracer clock rate shared by all shards
    pub ticks_per_second: u64,

    /// Number of samples in the merged trace
    pub sample_count: usize,

    /// Tracer buffer-flush stalls removed from the timeline
    pub stalls: StallSummary,

    /// Aggregate loop duration statistics
    pub statistics: LoopStatistics,

    /// Longest loops, descending by duration
    pub ranked_loops: Vec<RankedLoop>,

    /// Loop duration distribution
    pub histogram: Vec<HistogramBucket>,

    /// Degraded-mode conditions encountered during the run
    #[serde(default)]
    pub warnings: Vec<AnalysisWarning>,

    /// Timestamp when the report was generated
    pub generated_at: String,
}

/// Stall correction applied to the timestamp stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StallSummary {
    /// Number of end-of-save markers seen
    pub stall_count: usize,

    /// Total ticks elided from the timeline
    pub removed_ticks: u64,
}

/// One expensive loop iteration, expanded into its frames
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedLoop {
    /// Index of the loop-start sample in the merged trace
    pub start_sample_index: usize,

    /// Number of samples spanned by the loop
    pub sample_count: usize,

    /// Loop cost in nanoseconds (loop-end frames excluded)
    pub total_duration_ns: f64,

    /// SHA-256 of the loop's address sequence, hex encoded
    pub signature: String,

    /// Per-sample frames in trace order
    pub frames: Vec<Frame>,
}

/// A single sample inside a loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub name: String,
    pub duration_ns: f64,
}

/// One histogram bucket covering `[range_start, range_end)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBucket {
    pub range_start: f64,
    pub range_end: f64,
    pub count: u64,
}

/// Summary statistics over all loop durations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoopStatistics {
    /// Number of loops detected
    pub loop_count: usize,

    /// Number of distinct loop shapes (address sequences)
    pub unique_shapes: usize,

    /// Sum of all loop durations (ns)
    pub total_duration_ns: f64,

    /// Mean loop duration (ns)
    pub mean_duration_ns: f64,

    /// Median loop duration (ns)
    pub median_duration_ns: f64,

    /// Longest loop duration (ns)
    pub max_duration_ns: f64,

    /// Percentage of total time spent in the slowest 10% of loops
    pub top_10_percent_percentage: f64,
}
