//! Split the sample stream into loop iterations.
//!
//! A loop runs from one loop-start sample up to the next. Its cost is the sum
//! of its samples' durations, excluding loop-end samples so the boundary
//! instrumentation is not charged to the loop.

use super::markers::MarkerAddresses;
use crate::parser::MergedTrace;
use log::debug;

/// Output of a segmentation pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoopSegments {
    /// `durations[i]` is the time from sample `i` to sample `i + 1` (ns)
    pub durations: Vec<f64>,

    /// Sample index of each loop's start marker
    pub loop_start_index: Vec<usize>,

    /// Cost of each loop (ns), parallel to `loop_start_index`
    pub loop_duration: Vec<f64>,
}

impl LoopSegments {
    pub fn loop_count(&self) -> usize {
        self.loop_start_index.len()
    }

    /// Sample range `[start, end)` covered by loop `n`
    ///
    /// The last loop ends at the last sample that has a duration.
    pub fn loop_range(&self, n: usize) -> (usize, usize) {
        let start = self.loop_start_index[n];
        let end = self
            .loop_start_index
            .get(n + 1)
            .copied()
            .unwrap_or(self.durations.len());
        (start, end)
    }
}

/// Compute per-sample durations in nanoseconds
///
/// **Public** - length is `sample_count - 1`, or 0 for fewer than 2 samples
pub fn compute_durations(trace: &MergedTrace) -> Vec<f64> {
    let ticks_per_ns = trace.ticks_per_second as f64 / 1e9;
    let count = trace.sample_count().saturating_sub(1);

    let mut durations = Vec::with_capacity(count);
    for i in 0..count {
        let delta = trace.timestamp(i + 1) as f64 - trace.timestamp(i) as f64;
        durations.push(delta / ticks_per_ns);
    }
    durations
}

/// Detect loops and compute their durations in one forward scan
///
/// **Public** - main entry point for segmentation
///
/// Samples before the first loop start belong to no loop. Without a
/// resolved loop-start marker no loops are produced; the caller has already
/// been warned by marker resolution.
pub fn segment_loops(trace: &MergedTrace, markers: &MarkerAddresses) -> LoopSegments {
    let durations = compute_durations(trace);

    let Some(loop_start) = markers.loop_start else {
        debug!("No loop start marker; skipping segmentation");
        return LoopSegments {
            durations,
            ..Default::default()
        };
    };

    let starts = (0..durations.len())
        .filter(|&i| trace.address(i) == loop_start)
        .count();
    let mut loop_start_index = Vec::with_capacity(starts);
    let mut loop_duration = Vec::with_capacity(starts);

    // Cost of the loop currently open, if any
    let mut open: Option<f64> = None;

    for (i, &duration) in durations.iter().enumerate() {
        let address = trace.address(i);

        if address == loop_start {
            if let Some(total) = open {
                loop_duration.push(total);
            }
            loop_start_index.push(i);
            open = Some(duration);
        } else if Some(address) == markers.loop_end {
            continue;
        } else if let Some(total) = open.as_mut() {
            *total += duration;
        }
    }

    if let Some(total) = open {
        loop_duration.push(total);
    }

    debug!(
        "Segmented {} samples into {} loops",
        trace.sample_count(),
        loop_start_index.len()
    );

    LoopSegments {
        durations,
        loop_start_index,
        loop_duration,
    }
}
