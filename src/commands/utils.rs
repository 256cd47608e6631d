use anyhow::Result;
use std::path::PathBuf;
use crate::output::read_report;
use crate::utils::config::SCHEMA_VERSION;

/// Validate a report JSON file
pub fn validate_report_file(file_path: PathBuf) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let report = read_report(&file_path)?;

    println!("✓ Valid report JSON");
    println!("  Version: {}", report.version);
    println!("  Trace: {}", report.base_path);
    println!("  Samples: {}", report.sample_count);
    println!("  Loops: {}", report.statistics.loop_count);
    println!("  Ranked Loops: {}", report.ranked_loops.len());
    println!("  Histogram Buckets: {}", report.histogram.len());

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Loop Trace Report Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string            - Schema version (e.g., '1.0.0')");
        println!("  base_path: string          - Shard base path");
        println!("  shard_count: number        - Shards merged");
        println!("  ticks_per_second: number   - Tracer clock rate");
        println!("  sample_count: number       - Samples in merged trace");
        println!("  stalls: object             - Save stall correction");
        println!("    stall_count: number      - End-of-save markers seen");
        println!("    removed_ticks: number    - Ticks elided from timeline");
        println!("  statistics: object         - Loop duration statistics");
        println!("  ranked_loops: array        - Slowest loops, descending");
        println!("    start_sample_index: number");
        println!("    sample_count: number");
        println!("    total_duration_ns: number");
        println!("    signature: string        - SHA-256 of the loop's address sequence");
        println!("    frames: array            - (name, duration_ns) per sample");
        println!("  histogram: array           - (range_start, range_end, count)");
        println!("  warnings: array            - Degraded-mode conditions");
        println!("  generated_at: string       - ISO 8601 timestamp");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Loop Trace v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Offline loop-iteration profiling from sharded program-counter traces.");
}
