//! Summary statistics over loop durations.
//!
//! Complements the ranked list: how much time loops take overall, how it is
//! distributed, and how many distinct execution paths the loops took.

use super::ranker::loop_signature;
use super::segmenter::LoopSegments;
use crate::parser::{LoopStatistics, MergedTrace};
use log::debug;
use std::collections::HashSet;

/// Calculate loop duration statistics
///
/// **Public** - provides summary statistics for the report
///
/// # Arguments
/// * `trace` - Trace the loops were segmented from
/// * `segments` - Loop boundaries and durations
///
/// # Returns
/// Statistics about the loop duration distribution
pub fn calculate_loop_statistics(trace: &MergedTrace, segments: &LoopSegments) -> LoopStatistics {
    let count = segments.loop_count();
    if count == 0 {
        return LoopStatistics::default();
    }

    let total: f64 = segments.loop_duration.iter().sum();
    let mean = total / count as f64;

    let mut sorted = segments.loop_duration.clone();
    sorted.sort_unstable_by(|a, b| b.total_cmp(a));
    let median = sorted[count / 2];
    let max = sorted[0];

    // Slowest 10% of loops
    let top_10_percent_count = (count as f64 * 0.1).ceil() as usize;
    let top_10_percent_time: f64 = sorted.iter().take(top_10_percent_count).sum();

    let unique_shapes = count_unique_shapes(trace, segments);

    debug!(
        "{} loops, {} distinct shapes, mean {:.0} ns",
        count, unique_shapes, mean
    );

    LoopStatistics {
        loop_count: count,
        unique_shapes,
        total_duration_ns: total,
        mean_duration_ns: mean,
        median_duration_ns: median,
        max_duration_ns: max,
        top_10_percent_percentage: if total > 0.0 {
            (top_10_percent_time / total) * 100.0
        } else {
            0.0
        },
    }
}

/// Number of distinct address sequences among all loops
pub fn count_unique_shapes(trace: &MergedTrace, segments: &LoopSegments) -> usize {
    (0..segments.loop_count())
        .map(|n| {
            let (start, end) = segments.loop_range(n);
            loop_signature(trace, start, end)
        })
        .collect::<HashSet<_>>()
        .len()
}

impl LoopStatistics {
    /// Check if loop time is highly concentrated
    ///
    /// **Public** - useful for spotting outlier iterations
    ///
    /// Returns true if the slowest 10% of loops take >80% of loop time
    pub fn is_highly_concentrated(&self) -> bool {
        self.top_10_percent_percentage > 80.0
    }

    /// Get human-readable summary
    ///
    /// **Public** - for logging and debugging
    pub fn summary(&self) -> String {
        format!(
            "Loops: {} | Shapes: {} | Mean: {:.0} ns | Median: {:.0} ns | Max: {:.0} ns | Top 10%: {:.1}%",
            self.loop_count,
            self.unique_shapes,
            self.mean_duration_ns,
            self.median_duration_ns,
            self.max_duration_ns,
            self.top_10_percent_percentage
        )
    }
}
