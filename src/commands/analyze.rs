//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Loads and merges the trace shards
//! 2. Runs the loop analysis pipeline
//! 3. Writes the JSON report
//! 4. Optionally prints a text summary

use crate::commands::models::AnalyzeArgs;
use crate::output::{render_summary, write_report};
use crate::pipeline::analyze_trace;
use crate::utils::config::MAX_TOP_K;
use anyhow::{Context, Result};
use log::info;
use std::time::Instant;

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Shard loading or merge failures (fatal, nothing is written)
/// * Report write errors
pub fn execute_analyze(args: AnalyzeArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Starting analysis of {}_*", args.base_path.display());

    let config = args.analysis_config();
    let report = analyze_trace(&args.base_path, &config).with_context(|| {
        format!("Failed to analyze trace at {}", args.base_path.display())
    })?;

    write_report(&report, &args.output_json).context("Failed to write report JSON")?;
    info!("✓ Report written to: {}", args.output_json.display());

    if args.print_summary {
        println!();
        println!("  Trace:        {}", report.base_path);
        println!("  Shards:       {}", report.shard_count);
        println!("  Samples:      {}", report.sample_count);
        println!(
            "  Save stalls:  {} ({} ticks removed)",
            report.stalls.stall_count, report.stalls.removed_ticks
        );
        println!("  {}", report.statistics.summary());
        for warning in &report.warnings {
            println!("  ⚠ {}", warning);
        }
        println!();
        println!("{}", render_summary(&report, args.summary_rows));
        println!();
    }

    info!(
        "Analysis completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );
    Ok(())
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if args.base_path.as_os_str().is_empty() {
        anyhow::bail!("Trace base path cannot be empty");
    }

    if args.top_loops == 0 {
        anyhow::bail!("top must be greater than 0");
    }

    if args.top_loops > MAX_TOP_K {
        anyhow::bail!("top is too large (max {})", MAX_TOP_K);
    }

    if !(args.bin_width_ns.is_finite() && args.bin_width_ns > 0.0) {
        anyhow::bail!("bin width must be a positive number of nanoseconds");
    }

    for (name, suffix) in [
        ("loop start", &args.loop_start_suffix),
        ("loop end", &args.loop_end_suffix),
        ("save end", &args.save_end_suffix),
    ] {
        if suffix.is_empty() {
            anyhow::bail!("{} marker suffix cannot be empty", name);
        }
    }

    Ok(())
}
