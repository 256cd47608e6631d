//! Normalization and aggregation of merged traces.
//!
//! This module transforms a merged trace into:
//! - A stall-corrected timeline
//! - Loop boundaries and per-loop durations
//! - The top-K most expensive loops
//! - A duration histogram and summary statistics

pub mod bounded;
pub mod histogram;
pub mod markers;
pub mod metrics;
pub mod ranker;
pub mod segmenter;
pub mod stall;

// Re-export main types and functions
pub use bounded::BoundedTopK;
pub use histogram::build_histogram;
pub use markers::MarkerAddresses;
pub use metrics::calculate_loop_statistics;
pub use ranker::rank_loops;
pub use segmenter::{segment_loops, LoopSegments};
pub use stall::remove_save_stalls;
