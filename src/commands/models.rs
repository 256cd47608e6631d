use crate::utils::config::{
    AnalysisConfig, DEFAULT_BIN_WIDTH_NS, DEFAULT_LOOP_END_SUFFIX, DEFAULT_LOOP_START_SUFFIX,
    DEFAULT_SAVE_END_SUFFIX, DEFAULT_TOP_K,
};
use std::path::PathBuf;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Shard base path; shards are `{base}_0`, `{base}_1`, ...
    pub base_path: PathBuf,

    /// Output path for the JSON report
    pub output_json: PathBuf,

    /// Number of loops to rank
    pub top_loops: usize,

    /// Histogram bucket width (ns)
    pub bin_width_ns: f64,

    /// Marker symbol suffixes
    pub loop_start_suffix: String,
    pub loop_end_suffix: String,
    pub save_end_suffix: String,

    /// Print text summary to stdout
    pub print_summary: bool,

    /// Rows shown in the text summary
    pub summary_rows: usize,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("/tmp/trace"),
            output_json: PathBuf::from("loop-report.json"),
            top_loops: DEFAULT_TOP_K,
            bin_width_ns: DEFAULT_BIN_WIDTH_NS,
            loop_start_suffix: DEFAULT_LOOP_START_SUFFIX.to_string(),
            loop_end_suffix: DEFAULT_LOOP_END_SUFFIX.to_string(),
            save_end_suffix: DEFAULT_SAVE_END_SUFFIX.to_string(),
            print_summary: false,
            summary_rows: 10,
        }
    }
}

impl AnalyzeArgs {
    /// Pipeline configuration carried by these arguments
    pub fn analysis_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            top_k: self.top_loops,
            bin_width_ns: self.bin_width_ns,
            loop_start_suffix: self.loop_start_suffix.clone(),
            loop_end_suffix: self.loop_end_suffix.clone(),
            save_end_suffix: self.save_end_suffix.clone(),
        }
    }
}
