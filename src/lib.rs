//! Loop Trace
//!
//! Offline analysis of sharded program-counter traces captured by an
//! instrumented program's tracer. Finds the most expensive loop
//! iterations and the distribution of loop durations.
//!
//! ## Getting Started
//!
//! ```ignore
//! use loop_trace::pipeline::analyze_trace;
//! use loop_trace::utils::config::AnalysisConfig;
//!
//! let report = analyze_trace(Path::new("/tmp/trace"), &AnalysisConfig::default())?;
//! for entry in &report.ranked_loops {
//!     println!("{} ns at sample {}", entry.total_duration_ns, entry.start_sample_index);
//! }
//! ```

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod utils;
