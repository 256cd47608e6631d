//! Merge numbered shards into one trace.
//!
//! Shard headers are loaded in parallel, then every shard streams its sample
//! region into a disjoint slice of a single pre-sized buffer. Placement follows
//! shard index, not timestamps: the tracer is trusted to number shards
//! chronologically.

use super::shard::{discover_shards, load_shard, read_u64, read_up_to};
use super::trace::{MergedTrace, ShardRecord, SymbolTable};
use crate::utils::config::SHARD_HEADER_LEN;
use crate::utils::error::{MergeError, ShardError};
use log::{debug, info};
use rayon::prelude::*;
use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Bytes read per syscall when streaming a sample region
const READ_CHUNK_LEN: usize = 64 * 1024;

/// Discover and merge every shard for a base path
///
/// **Public** - main entry point for trace ingestion
///
/// # Returns
/// The merged trace and the number of shards it was built from
///
/// # Errors
/// * `MergeError::NoShards` - `{base}_0` does not exist
/// * any error from `merge_shards`
pub fn load_trace(base: &Path) -> Result<(MergedTrace, usize), MergeError> {
    let paths = discover_shards(base);
    if paths.is_empty() {
        return Err(MergeError::NoShards(base.to_path_buf()));
    }

    info!("Found {} shard(s) for {}", paths.len(), base.display());
    let trace = merge_shards(&paths)?;
    Ok((trace, paths.len()))
}

/// Merge the given shards, in order, into one trace
///
/// # Errors
/// * `MergeError::Shard` - a shard header or symbol table failed to load
/// * `MergeError::InvalidClockRate` - a shard reports 0 ticks/s
/// * `MergeError::ShardInconsistency` - shards disagree on ticks/s
/// * `MergeError::IncompleteRead` - a sample region is shorter than declared
/// * `MergeError::TooLarge` - the combined sample regions overflow
pub fn merge_shards(paths: &[PathBuf]) -> Result<MergedTrace, MergeError> {
    let mut records: Vec<ShardRecord> = paths
        .par_iter()
        .map(|path| load_shard(path))
        .collect::<Result<_, ShardError>>()?;

    let ticks_per_second = check_clock_rates(&records)?;
    check_sample_regions(&records)?;
    let total_bytes = assign_merge_offsets(&mut records)?;

    let total_words =
        usize::try_from(total_bytes / 8).map_err(|_| MergeError::TooLarge(total_bytes))?;
    let mut samples = vec![0u64; total_words];

    let mut slots: Vec<&mut [u64]> = Vec::with_capacity(records.len());
    let mut rest = samples.as_mut_slice();
    for record in &records {
        let words = (record.sample_byte_length / 8) as usize;
        let (slot, tail) = std::mem::take(&mut rest).split_at_mut(words);
        slots.push(slot);
        rest = tail;
    }

    records
        .par_iter()
        .zip(slots.into_par_iter())
        .try_for_each(|(record, slot)| read_sample_region(record, slot))?;

    let symbols = union_symbols(records);

    debug!(
        "Merged trace: {} samples, {} symbols",
        samples.len() / 2,
        symbols.len()
    );

    Ok(MergedTrace {
        ticks_per_second,
        samples,
        symbols,
    })
}

/// Require one non-zero clock rate across all shards
///
/// **Private** - a mismatch is fatal rather than last-shard-wins
fn check_clock_rates(records: &[ShardRecord]) -> Result<u64, MergeError> {
    let first = &records[0];
    if first.ticks_per_second == 0 {
        return Err(MergeError::InvalidClockRate(first.path.clone()));
    }

    for record in &records[1..] {
        if record.ticks_per_second != first.ticks_per_second {
            return Err(MergeError::ShardInconsistency {
                path: record.path.clone(),
                expected: first.ticks_per_second,
                found: record.ticks_per_second,
            });
        }
    }

    Ok(first.ticks_per_second)
}

/// Require every declared sample region to exist on disk
///
/// Runs before the merged buffer is allocated, so a corrupt header cannot
/// size it.
fn check_sample_regions(records: &[ShardRecord]) -> Result<(), MergeError> {
    for record in records {
        let available = record.file_length.saturating_sub(SHARD_HEADER_LEN as u64);
        if available < record.sample_byte_length {
            return Err(MergeError::IncompleteRead {
                path: record.path.clone(),
                expected: record.sample_byte_length,
                read: available,
            });
        }
    }
    Ok(())
}

/// Place shard `i` at the cumulative byte length of shards `[0, i)`
///
/// Returns the total sample byte length.
fn assign_merge_offsets(records: &mut [ShardRecord]) -> Result<u64, MergeError> {
    let mut offset = 0u64;
    for record in records.iter_mut() {
        record.merge_offset = offset;
        offset = offset
            .checked_add(record.sample_byte_length)
            .ok_or(MergeError::TooLarge(u64::MAX))?;
    }
    Ok(offset)
}

/// Stream one shard's sample region into its slot
fn read_sample_region(record: &ShardRecord, slot: &mut [u64]) -> Result<(), MergeError> {
    let io_err = |source| {
        MergeError::Shard(ShardError::Io {
            path: record.path.clone(),
            source,
        })
    };

    let mut file = File::open(&record.path).map_err(io_err)?;
    file.seek(SeekFrom::Start(SHARD_HEADER_LEN as u64))
        .map_err(io_err)?;

    let mut buf = vec![0u8; READ_CHUNK_LEN.min(record.sample_byte_length as usize)];
    let mut written = 0usize;
    let mut read_total = 0u64;

    while read_total < record.sample_byte_length {
        let want = buf
            .len()
            .min((record.sample_byte_length - read_total) as usize);
        let got = read_up_to(&mut file, &mut buf[..want]).map_err(io_err)?;
        read_total += got as u64;

        if got < want {
            return Err(MergeError::IncompleteRead {
                path: record.path.clone(),
                expected: record.sample_byte_length,
                read: read_total,
            });
        }

        for word in buf[..got].chunks_exact(8) {
            slot[written] = read_u64(word, 0);
            written += 1;
        }
    }

    debug!(
        "Read {} bytes from {} at merge offset {}",
        read_total,
        record.path.display(),
        record.merge_offset
    );

    Ok(())
}

/// Union symbol tables in shard order; later shards win on collision
fn union_symbols(records: Vec<ShardRecord>) -> SymbolTable {
    let mut symbols = SymbolTable::new();
    for record in records {
        symbols.extend(record.symbols);
    }
    symbols
}
