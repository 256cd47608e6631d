//! Configuration and constants for the analyzer.

/// Current report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Number of loops kept by the ranker
pub const DEFAULT_TOP_K: usize = 50;

/// Upper bound accepted for `--top`
pub const MAX_TOP_K: usize = 1000;

/// Histogram bucket width in nanoseconds
pub const DEFAULT_BIN_WIDTH_NS: f64 = 100_000.0;

/// Most buckets a histogram may span, terminal bucket included
pub const MAX_HISTOGRAM_BUCKETS: usize = 1_000_000;

// Marker symbols emitted by the tracer's instrumentation.
// Matched by suffix against the embedded symbol table.
pub const DEFAULT_LOOP_START_SUFFIX: &str = "loop_start";
pub const DEFAULT_LOOP_END_SUFFIX: &str = "loop_end";
pub const DEFAULT_SAVE_END_SUFFIX: &str = "save_end";

/// Shard header: u64 ticks per second + u64 sample byte length
pub const SHARD_HEADER_LEN: usize = 16;

/// One sample on the wire: u64 timestamp + u64 address
pub const SAMPLE_WIRE_LEN: u64 = 16;

/// Symbol entry prefix: u64 address + u32 name length
pub const SYMBOL_ENTRY_PREFIX_LEN: usize = 12;

/// Runtime configuration for one analysis run
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Maximum number of ranked loops kept
    pub top_k: usize,

    /// Histogram bucket width (ns)
    pub bin_width_ns: f64,

    /// Suffix identifying the loop-start marker symbol
    pub loop_start_suffix: String,

    /// Suffix identifying the loop-end marker symbol
    pub loop_end_suffix: String,

    /// Suffix identifying the end-of-save marker symbol
    pub save_end_suffix: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            bin_width_ns: DEFAULT_BIN_WIDTH_NS,
            loop_start_suffix: DEFAULT_LOOP_START_SUFFIX.to_string(),
            loop_end_suffix: DEFAULT_LOOP_END_SUFFIX.to_string(),
            save_end_suffix: DEFAULT_SAVE_END_SUFFIX.to_string(),
        }
    }
}
