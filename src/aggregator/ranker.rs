//! Rank the most expensive loop iterations.

use super::bounded::BoundedTopK;
use super::segmenter::LoopSegments;
use crate::parser::{Frame, MergedTrace, RankedLoop};
use log::debug;
use sha2::{Digest, Sha256};

/// Keep the `k` longest loops and expand them into frames
///
/// **Public** - main entry point for ranking
///
/// # Arguments
/// * `trace` - Stall-corrected trace the loops were segmented from
/// * `segments` - Output of `segment_loops`
/// * `k` - Number of loops to keep
///
/// # Returns
/// Loops sorted by duration (descending); equal durations keep trace order
pub fn rank_loops(trace: &MergedTrace, segments: &LoopSegments, k: usize) -> Vec<RankedLoop> {
    let mut top = BoundedTopK::new(k);

    for (n, &duration) in segments.loop_duration.iter().enumerate() {
        top.offer(duration, n);
    }

    debug!(
        "Kept {} of {} loops (threshold {:.0} ns)",
        top.len(),
        segments.loop_count(),
        top.threshold()
    );

    top.into_sorted_vec()
        .into_iter()
        .map(|(duration, n)| expand_loop(trace, segments, n, duration))
        .collect()
}

/// Expand loop `n` into its per-sample frames
fn expand_loop(trace: &MergedTrace, segments: &LoopSegments, n: usize, duration: f64) -> RankedLoop {
    let (start, end) = segments.loop_range(n);

    let frames = (start..end)
        .map(|i| Frame {
            name: trace.symbol_name(trace.address(i)),
            duration_ns: segments.durations[i],
        })
        .collect();

    RankedLoop {
        start_sample_index: start,
        sample_count: end - start,
        total_duration_ns: duration,
        signature: loop_signature(trace, start, end),
        frames,
    }
}

/// SHA-256 of the address sequence of samples `[start, end)`, as hex
///
/// Two iterations that executed the same path share a signature, across
/// runs and builds.
pub fn loop_signature(trace: &MergedTrace, start: usize, end: usize) -> String {
    let mut hasher = Sha256::new();
    for i in start..end {
        hasher.update(trace.address(i).to_le_bytes());
    }
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::markers::MarkerAddresses;
    use crate::aggregator::segmenter::segment_loops;
    use crate::parser::SymbolTable;

    fn symbols() -> SymbolTable {
        [(0x1, "frame_loop_start"), (0x2, "update"), (0x3, "draw")]
            .iter()
            .map(|(a, n)| (*a, n.to_string()))
            .collect()
    }

    fn segmented(pairs: &[(u64, u64)]) -> (MergedTrace, LoopSegments) {
        let trace = MergedTrace::from_pairs(1_000_000_000, pairs, symbols());
        let markers = MarkerAddresses {
            loop_start: Some(0x1),
            ..Default::default()
        };
        let segments = segment_loops(&trace, &markers);
        (trace, segments)
    }

    #[test]
    fn test_rank_and_expand_frames() {
        let (trace, segments) = segmented(&[
            (0, 0x1),
            (1, 0x2),
            (3, 0x1),
            (4, 0x2),
            (10, 0x3),
            (30, 0x1),
            (31, 0x2),
        ]);

        let ranked = rank_loops(&trace, &segments, 2);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].start_sample_index, 2);
        assert_eq!(ranked[0].total_duration_ns, 27.0);
        assert_eq!(ranked[0].sample_count, 3);
        let names: Vec<&str> = ranked[0].frames.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["frame_loop_start", "update", "draw"]);
        assert_eq!(ranked[1].start_sample_index, 0);
        assert_eq!(ranked[1].total_duration_ns, 3.0);
    }

    #[test]
    fn test_last_loop_excludes_final_sample() {
        let (trace, segments) = segmented(&[(0, 0x1), (5, 0x2), (9, 0x9)]);

        let ranked = rank_loops(&trace, &segments, 5);

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].sample_count, 2);
        assert_eq!(ranked[0].frames[1].name, "update");
    }

    #[test]
    fn test_same_path_same_signature() {
        let (trace, segments) = segmented(&[
            (0, 0x1),
            (1, 0x2),
            (2, 0x1),
            (9, 0x2),
            (10, 0x1),
            (11, 0x3),
            (12, 0x1),
        ]);

        let ranked = rank_loops(&trace, &segments, 10);
        let by_start = |s: usize| ranked.iter().find(|l| l.start_sample_index == s).unwrap();

        assert_eq!(by_start(0).signature, by_start(2).signature);
        assert_ne!(by_start(0).signature, by_start(4).signature);
    }

    #[test]
    fn test_signature_is_sha256_of_addresses() {
        let (trace, _) = segmented(&[(0, 0x1), (1, 0x2)]);

        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0x1u64.to_le_bytes());
        bytes.extend_from_slice(&0x2u64.to_le_bytes());
        let expected = format!("{:x}", Sha256::digest(&bytes));

        let signature = loop_signature(&trace, 0, 2);
        assert_eq!(signature, expected);
        assert_eq!(signature.len(), 64);
    }
}
