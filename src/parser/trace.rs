//! In-memory trace representation shared by all pipeline stages.

use std::collections::BTreeMap;
use std::path::PathBuf;

/// Address to symbol name mapping, ordered by address
pub type SymbolTable = BTreeMap<u64, String>;

/// Header and symbol table of one shard file
///
/// The sample region itself is not held here; the merger streams it
/// straight into the merged buffer at `merge_offset`.
#[derive(Debug, Clone)]
pub struct ShardRecord {
    pub path: PathBuf,
    pub ticks_per_second: u64,
    pub sample_byte_length: u64,

    /// Size of the shard file on disk, as seen when the header was read
    pub file_length: u64,
    pub symbols: SymbolTable,

    /// Byte offset of this shard's samples within the merged stream
    pub merge_offset: u64,
}

/// All shards merged into a single timeline
///
/// Samples are stored flat, two words per sample (timestamp, address),
/// exactly as they appear on the wire.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedTrace {
    pub ticks_per_second: u64,
    pub samples: Vec<u64>,
    pub symbols: SymbolTable,
}

impl MergedTrace {
    /// Build a trace from (timestamp, address) pairs
    pub fn from_pairs(
        ticks_per_second: u64,
        pairs: &[(u64, u64)],
        symbols: SymbolTable,
    ) -> Self {
        let mut samples = Vec::with_capacity(pairs.len() * 2);
        for &(time, address) in pairs {
            samples.push(time);
            samples.push(address);
        }
        Self {
            ticks_per_second,
            samples,
            symbols,
        }
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len() / 2
    }

    pub fn timestamp(&self, index: usize) -> u64 {
        self.samples[index * 2]
    }

    pub fn address(&self, index: usize) -> u64 {
        self.samples[index * 2 + 1]
    }

    /// Iterate over timestamps in sample order
    pub fn timestamps(&self) -> impl Iterator<Item = u64> + '_ {
        self.samples.iter().step_by(2).copied()
    }

    /// Symbol name for an address, or its hex form when unknown
    pub fn symbol_name(&self, address: u64) -> String {
        self.symbols
            .get(&address)
            .cloned()
            .unwrap_or_else(|| format!("0x{:x}", address))
    }
}
