//! Loop Trace CLI
//!
//! Ranks the slowest loop iterations in a sharded tracer capture and
//! reports the loop duration distribution.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use loop_trace::commands::{
    display_schema, display_version, execute_analyze, validate_args, validate_report_file,
    AnalyzeArgs,
};

/// Loop Trace - loop-iteration profiling for tracer captures
#[derive(Parser, Debug)]
#[command(name = "loop-trace")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a sharded trace
    Analyze {
        /// Shard base path (reads {base}_0, {base}_1, ...)
        #[arg(short, long, env = "LOOP_TRACE_BASE", default_value = "/tmp/trace")]
        base: PathBuf,

        /// Output path for JSON report (placed in artifacts/ by default)
        #[arg(short, long, default_value = "artifacts/loop-report.json")]
        output: PathBuf,

        /// Number of slowest loops to keep
        #[arg(long, env = "LOOP_TRACE_TOP", default_value = "50")]
        top: usize,

        /// Histogram bucket width in nanoseconds
        #[arg(long, env = "LOOP_TRACE_BIN_WIDTH_NS", default_value = "100000")]
        bin_width: f64,

        /// Symbol suffix marking the start of a loop iteration
        #[arg(long, env = "LOOP_TRACE_LOOP_START", default_value = "loop_start")]
        loop_start: String,

        /// Symbol suffix marking the end of a loop iteration
        #[arg(long, env = "LOOP_TRACE_LOOP_END", default_value = "loop_end")]
        loop_end: String,

        /// Symbol suffix marking the end of a tracer buffer save
        #[arg(long, env = "LOOP_TRACE_SAVE_END", default_value = "save_end")]
        save_end: String,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,

        /// Rows shown in the text summary
        #[arg(long, default_value = "10")]
        summary_rows: usize,
    },

    /// Validate a report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Analyze {
            base,
            mut output,
            top,
            bin_width,
            loop_start,
            loop_end,
            save_end,
            summary,
            summary_rows,
        } => {
            // Ensure the report goes to artifacts/ if no directory is specified
            if output.parent().map(|p| p.as_os_str().is_empty()).unwrap_or(true) {
                output = PathBuf::from("artifacts").join(output);
            }

            let args = AnalyzeArgs {
                base_path: base,
                output_json: output,
                top_loops: top,
                bin_width_ns: bin_width,
                loop_start_suffix: loop_start,
                loop_end_suffix: loop_end,
                save_end_suffix: save_end,
                print_summary: summary,
                summary_rows,
            };

            // Validate args first
            validate_args(&args)?;

            execute_analyze(args)?;
        }

        Commands::Validate { file } => {
            validate_report_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
