//! One-time resolution of instrumentation marker symbols.
//!
//! The tracer emits dedicated symbols around loop iterations and around its
//! own buffer flushes. They are found once by name suffix and handed to the
//! later stages as plain addresses.

use crate::parser::SymbolTable;
use crate::utils::config::AnalysisConfig;
use crate::utils::error::AnalysisWarning;
use log::{debug, warn};

/// Addresses of the marker symbols, if present in the trace
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkerAddresses {
    pub loop_start: Option<u64>,
    pub loop_end: Option<u64>,
    pub save_end: Option<u64>,
}

impl MarkerAddresses {
    /// Resolve all markers against a symbol table
    ///
    /// **Public** - missing markers are returned as warnings, never errors
    pub fn resolve(symbols: &SymbolTable, config: &AnalysisConfig) -> (Self, Vec<AnalysisWarning>) {
        let mut warnings = Vec::new();

        let mut lookup = |marker: &str, suffix: &str| {
            let found = find_by_suffix(symbols, suffix);
            if found.is_none() {
                let warning = AnalysisWarning::SymbolNotFound {
                    marker: marker.to_string(),
                    suffix: suffix.to_string(),
                };
                warn!("{}", warning);
                warnings.push(warning);
            }
            found
        };

        let markers = Self {
            loop_start: lookup("loop start", config.loop_start_suffix.as_str()),
            loop_end: lookup("loop end", config.loop_end_suffix.as_str()),
            save_end: lookup("end of save", config.save_end_suffix.as_str()),
        };

        debug!("Resolved markers: {:?}", markers);
        (markers, warnings)
    }
}

/// Lowest address whose symbol name ends with `suffix`
pub fn find_by_suffix(symbols: &SymbolTable, suffix: &str) -> Option<u64> {
    let mut matches = symbols
        .iter()
        .filter(|(_, name)| name.ends_with(suffix))
        .map(|(address, _)| *address);

    let first = matches.next()?;
    let extra = matches.count();
    if extra > 0 {
        warn!(
            "{} more symbols end with '{}'; using 0x{:x}",
            extra, suffix, first
        );
    }
    Some(first)
}
