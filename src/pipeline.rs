//! End-to-end analysis: shards in, structured report out.
//!
//! ShardLoader(×N) → TraceMerger → SaveStallRemover → LoopSegmenter →
//! {TopKRanker, DurationHistogram}. Each stage owns the trace in turn;
//! any failure aborts the run.

use crate::aggregator::{
    build_histogram, calculate_loop_statistics, rank_loops, remove_save_stalls, segment_loops,
    MarkerAddresses,
};
use crate::parser::{load_trace, AnalysisReport, MergedTrace};
use crate::utils::config::{AnalysisConfig, SCHEMA_VERSION};
use crate::utils::error::{AnalysisError, AnalysisWarning};
use chrono::Utc;
use log::{info, warn};
use std::path::Path;

/// Load every shard under `base` and analyze the merged trace
///
/// **Public** - main entry point of the library
///
/// # Errors
/// * `AnalysisError::Merge` - shard discovery, loading or merging failed
/// * `AnalysisError::InvalidBinWidth` / `ZeroCapacity` - bad configuration
/// * `AnalysisError::HistogramTooWide` - loop durations span too many buckets
pub fn analyze_trace(base: &Path, config: &AnalysisConfig) -> Result<AnalysisReport, AnalysisError> {
    check_config(config)?;

    info!("Loading shards from {}...", base.display());
    let (trace, shard_count) = load_trace(base)?;

    analyze_merged(trace, shard_count, &base.display().to_string(), config)
}

/// Analyze an already merged trace
///
/// **Public** - takes ownership; timestamps are stall-corrected in place
///
/// # Errors
/// * `AnalysisError::ZeroClockRate` - `trace.ticks_per_second` is 0
/// * the configuration and histogram errors of `analyze_trace`
pub fn analyze_merged(
    mut trace: MergedTrace,
    shard_count: usize,
    base_path: &str,
    config: &AnalysisConfig,
) -> Result<AnalysisReport, AnalysisError> {
    check_config(config)?;
    if trace.ticks_per_second == 0 {
        return Err(AnalysisError::ZeroClockRate);
    }

    let (markers, mut warnings) = MarkerAddresses::resolve(&trace.symbols, config);

    info!("Removing save stalls...");
    let stalls = remove_save_stalls(&mut trace, markers.save_end);

    info!("Segmenting {} samples into loops...", trace.sample_count());
    let segments = segment_loops(&trace, &markers);
    // A missing loop start marker has already been reported
    if segments.loop_count() == 0 && markers.loop_start.is_some() {
        let warning = AnalysisWarning::NoLoopsDetected;
        warn!("{}", warning);
        warnings.push(warning);
    }

    info!("Ranking top {} loops...", config.top_k);
    let ranked_loops = rank_loops(&trace, &segments, config.top_k);

    let histogram = build_histogram(&segments.loop_duration, config.bin_width_ns)?;
    let statistics = calculate_loop_statistics(&trace, &segments);
    info!("Loop statistics: {}", statistics.summary());

    Ok(AnalysisReport {
        version: SCHEMA_VERSION.to_string(),
        base_path: base_path.to_string(),
        shard_count,
        ticks_per_second: trace.ticks_per_second,
        sample_count: trace.sample_count(),
        stalls,
        statistics,
        ranked_loops,
        histogram,
        warnings,
        generated_at: Utc::now().to_rfc3339(),
    })
}

fn check_config(config: &AnalysisConfig) -> Result<(), AnalysisError> {
    if config.top_k == 0 {
        return Err(AnalysisError::ZeroCapacity);
    }
    if !(config.bin_width_ns.is_finite() && config.bin_width_ns > 0.0) {
        return Err(AnalysisError::InvalidBinWidth(config.bin_width_ns));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::SymbolTable;

    fn symbols() -> SymbolTable {
        [(0x1, "main_loop_start"), (0x2, "main_loop_end"), (0x3, "tracer_save_end"), (0x4, "step")]
            .iter()
            .map(|(a, n)| (*a, n.to_string()))
            .collect()
    }

    #[test]
    fn test_stall_not_charged_to_loop() {
        // 1 tick == 1 ns; the 990-tick flush lands inside the second loop
        let trace = MergedTrace::from_pairs(
            1_000_000_000,
            &[
                (0, 0x1),
                (10, 0x4),
                (20, 0x2),
                (30, 0x1),
                (40, 0x4),
                (1030, 0x3),
                (1040, 0x4),
                (1050, 0x1),
            ],
            symbols(),
        );

        let report = analyze_merged(trace, 1, "mem", &AnalysisConfig::default()).unwrap();

        assert!(report.warnings.is_empty());
        assert_eq!(report.stalls.removed_ticks, 990);
        assert_eq!(report.statistics.loop_count, 2);
        let durations: Vec<f64> = report.ranked_loops.iter().map(|l| l.total_duration_ns).collect();
        assert_eq!(durations, vec![30.0, 20.0]);
    }

    #[test]
    fn test_missing_loop_start_warns() {
        let mut table = symbols();
        table.remove(&0x1);
        let trace = MergedTrace::from_pairs(1_000, &[(0, 0x4), (5, 0x4)], table);

        let report = analyze_merged(trace, 1, "mem", &AnalysisConfig::default()).unwrap();

        assert!(report.ranked_loops.is_empty());
        assert!(report.histogram.is_empty());
        assert!(matches!(
            report.warnings.as_slice(),
            [AnalysisWarning::SymbolNotFound { .. }]
        ));
    }

    #[test]
    fn test_no_loop_start_samples_warns() {
        let trace = MergedTrace::from_pairs(1_000, &[(0, 0x4), (5, 0x4), (9, 0x4)], symbols());

        let report = analyze_merged(trace, 1, "mem", &AnalysisConfig::default()).unwrap();

        assert_eq!(report.statistics.loop_count, 0);
        assert!(report.histogram.is_empty());
        assert_eq!(report.warnings, vec![AnalysisWarning::NoLoopsDetected]);
    }

    #[test]
    fn test_zero_clock_rate_rejected() {
        let trace = MergedTrace::from_pairs(0, &[(0, 0x1), (5, 0x4)], symbols());

        let result = analyze_merged(trace, 1, "mem", &AnalysisConfig::default());

        assert!(matches!(result, Err(AnalysisError::ZeroClockRate)));
    }

    #[test]
    fn test_zero_top_k_rejected() {
        let config = AnalysisConfig {
            top_k: 0,
            ..Default::default()
        };
        let result = analyze_merged(MergedTrace::default(), 0, "mem", &config);
        assert!(matches!(result, Err(AnalysisError::ZeroCapacity)));
    }
}
