use loop_trace::parser::{encode_shard, shard_path, SymbolTable};
use loop_trace::pipeline::analyze_trace;
use loop_trace::utils::config::AnalysisConfig;
use loop_trace::utils::error::{AnalysisError, MergeError};
use pretty_assertions::assert_eq;
use std::path::Path;
use tempfile::tempdir;

const START: u64 = 0x100;
const END: u64 = 0x200;
const SAVE: u64 = 0x300;
const WORK: u64 = 0x400;

fn symbols() -> SymbolTable {
    [
        (START, "game::frame_loop_start"),
        (END, "game::frame_loop_end"),
        (SAVE, "tracer::flush_save_end"),
        (WORK, "game::update"),
    ]
    .iter()
    .map(|(a, n)| (*a, n.to_string()))
    .collect()
}

/// Two shards at 1 GHz: three loops of 50, 300_000 and 120_005 ns, with a
/// 5 s buffer flush inside the first loop of shard 1.
fn write_fixture(base: &Path) {
    let shard0 = vec![
        (0, START),
        (30, WORK),
        (50, END),
        (1_000, START),
        (300_000, WORK),
    ];
    let shard1 = vec![
        (301_000, END),
        (400_000, START),
        (400_010, WORK),
        (5_400_010, SAVE),
        (520_000 + 5_000_000, WORK),
        (520_000 + 5_000_000 + 5, START),
    ];
    std::fs::write(shard_path(base, 0), encode_shard(1_000_000_000, &shard0, &symbols())).unwrap();
    std::fs::write(shard_path(base, 1), encode_shard(1_000_000_000, &shard1, &symbols())).unwrap();
}

#[test]
fn test_end_to_end() {
    let dir = tempdir().unwrap();
    let base = dir.path().join("trace");
    write_fixture(&base);

    let report = analyze_trace(&base, &AnalysisConfig::default()).unwrap();

    assert_eq!(report.shard_count, 2);
    assert_eq!(report.sample_count, 11);
    assert_eq!(report.stalls.stall_count, 1);
    assert_eq!(report.stalls.removed_ticks, 5_000_000);
    assert!(report.warnings.is_empty());

    let ranked: Vec<(usize, f64)> = report
        .ranked_loops
        .iter()
        .map(|l| (l.start_sample_index, l.total_duration_ns))
        .collect();
    assert_eq!(ranked, vec![(3, 300_000.0), (6, 120_005.0), (0, 50.0)]);

    let top = &report.ranked_loops[0];
    let names: Vec<&str> = top.frames.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["game::frame_loop_start", "game::update", "game::frame_loop_end"]);
    assert_eq!(top.frames[2].duration_ns, 99_000.0);

    let counts: Vec<u64> = report.histogram.iter().map(|b| b.count).collect();
    assert_eq!(counts, vec![1, 1, 1, 0]);
}

#[test]
fn test_runs_are_idempotent() {
    let dir = tempdir().unwrap();
    let base = dir.path().join("trace");
    write_fixture(&base);
    let config = AnalysisConfig::default();

    let mut first = analyze_trace(&base, &config).unwrap();
    let mut second = analyze_trace(&base, &config).unwrap();
    first.generated_at.clear();
    second.generated_at.clear();

    assert_eq!(first, second);
}

#[test]
fn test_missing_markers_degrade_without_error() {
    let dir = tempdir().unwrap();
    let base = dir.path().join("trace");
    let samples = vec![(0, WORK), (10, WORK), (25, WORK)];
    let mut table = SymbolTable::new();
    table.insert(WORK, "game::update".to_string());
    std::fs::write(shard_path(&base, 0), encode_shard(1_000, &samples, &table)).unwrap();

    let report = analyze_trace(&base, &AnalysisConfig::default()).unwrap();

    assert_eq!(report.statistics.loop_count, 0);
    assert!(report.ranked_loops.is_empty());
    assert_eq!(report.warnings.len(), 3);
}

#[test]
fn test_clock_mismatch_aborts() {
    let dir = tempdir().unwrap();
    let base = dir.path().join("trace");
    std::fs::write(shard_path(&base, 0), encode_shard(1_000, &[(0, WORK)], &symbols())).unwrap();
    std::fs::write(shard_path(&base, 1), encode_shard(2_000, &[(5, WORK)], &symbols())).unwrap();

    let result = analyze_trace(&base, &AnalysisConfig::default());

    assert!(matches!(
        result,
        Err(AnalysisError::Merge(MergeError::ShardInconsistency { .. }))
    ));
}
