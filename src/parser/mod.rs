//! Trace ingestion and schema definitions.
//!
//! This module handles:
//! - Locating and parsing binary shard files
//! - Merging shards into one timeline
//! - Defining the output report schema

pub mod merge;
pub mod schema;
pub mod shard;
pub mod trace;

// Re-export main types
pub use merge::{load_trace, merge_shards};
pub use schema::{AnalysisReport, Frame, HistogramBucket, LoopStatistics, RankedLoop, StallSummary};
pub use shard::{discover_shards, encode_shard, load_shard, parse_symbol_table, shard_path};
pub use trace::{MergedTrace, ShardRecord, SymbolTable};
