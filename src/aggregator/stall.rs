//! Removal of tracer save stalls from the timeline.
//!
//! The tracer periodically pauses the traced program to flush its buffer to
//! storage. The pause shows up as a timestamp gap right before the
//! end-of-save marker sample; that gap is not program time.

use crate::parser::{MergedTrace, StallSummary};
use log::debug;

/// Shift timestamps so that every save stall collapses to zero length
///
/// **Public** - rewrites `trace.samples` in place, removes no samples
///
/// For each end-of-save sample at index `i > 0`, the raw gap to sample
/// `i - 1` is added to a running offset, and the offset is subtracted from
/// sample `i` and everything after it.
pub fn remove_save_stalls(trace: &mut MergedTrace, save_end: Option<u64>) -> StallSummary {
    let Some(marker) = save_end else {
        return StallSummary::default();
    };

    let mut summary = StallSummary::default();
    let mut previous_raw: Option<u64> = None;

    for sample in trace.samples.chunks_exact_mut(2) {
        let raw = sample[0];

        if sample[1] == marker {
            if let Some(previous) = previous_raw {
                summary.removed_ticks += raw.saturating_sub(previous);
                summary.stall_count += 1;
            }
        }

        sample[0] = raw.saturating_sub(summary.removed_ticks);
        previous_raw = Some(raw);
    }

    debug!(
        "Removed {} save stall(s) totalling {} ticks",
        summary.stall_count, summary.removed_ticks
    );

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::SymbolTable;

    const SAVE_END: u64 = 0x5a;

    fn trace(pairs: &[(u64, u64)]) -> MergedTrace {
        MergedTrace::from_pairs(1_000_000_000, pairs, SymbolTable::new())
    }

    #[test]
    fn test_single_stall_absorbed() {
        let mut t = trace(&[(0, 0x1), (10, 0x2), (1000, SAVE_END), (1010, 0x3)]);

        let summary = remove_save_stalls(&mut t, Some(SAVE_END));

        assert_eq!(t.timestamps().collect::<Vec<_>>(), vec![0, 10, 10, 20]);
        assert_eq!(summary.stall_count, 1);
        assert_eq!(summary.removed_ticks, 990);
    }

    #[test]
    fn test_offsets_accumulate_across_stalls() {
        let mut t = trace(&[
            (0, 0x1),
            (100, SAVE_END),
            (110, 0x1),
            (500, SAVE_END),
            (505, 0x1),
        ]);

        let summary = remove_save_stalls(&mut t, Some(SAVE_END));

        assert_eq!(t.timestamps().collect::<Vec<_>>(), vec![0, 0, 10, 10, 15]);
        assert_eq!(summary.stall_count, 2);
        assert_eq!(summary.removed_ticks, 490);
    }

    #[test]
    fn test_marker_on_first_sample_has_no_gap() {
        let mut t = trace(&[(50, SAVE_END), (60, 0x1)]);

        let summary = remove_save_stalls(&mut t, Some(SAVE_END));

        assert_eq!(t.timestamps().collect::<Vec<_>>(), vec![50, 60]);
        assert_eq!(summary.stall_count, 0);
    }

    #[test]
    fn test_no_marker_leaves_trace_untouched() {
        let mut t = trace(&[(0, 0x1), (1000, SAVE_END)]);
        let before = t.clone();

        let summary = remove_save_stalls(&mut t, None);

        assert_eq!(t, before);
        assert_eq!(summary, StallSummary::default());
    }
}
