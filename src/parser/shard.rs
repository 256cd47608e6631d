//! Binary shard file loader.
//!
//! A shard is laid out as:
//!
//! ```text
//! u64 LE ticks_per_second
//! u64 LE sample_byte_length
//! sample_byte_length bytes of (u64 LE time, u64 LE address) pairs
//! repeated (u64 LE address, u32 LE name_len, name_len bytes) symbol entries
//! ```
//!
//! The symbol table has no count; it ends at the first entry that cannot be
//! read in full.

use super::trace::{ShardRecord, SymbolTable};
use crate::utils::config::{SAMPLE_WIRE_LEN, SHARD_HEADER_LEN, SYMBOL_ENTRY_PREFIX_LEN};
use crate::utils::error::ShardError;
use log::debug;
use std::ffi::OsString;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Path of shard `index` for a base path (`{base}_{index}`)
pub fn shard_path(base: &Path, index: usize) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(format!("_{}", index));
    PathBuf::from(name)
}

/// Locate the consecutive shards `{base}_0, {base}_1, ...`
///
/// **Public** - discovery stops at the first missing index, even if
/// later indices exist on disk.
pub fn discover_shards(base: &Path) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    loop {
        let path = shard_path(base, paths.len());
        if !path.exists() {
            debug!("Shard discovery stopped at {}", path.display());
            break;
        }
        paths.push(path);
    }

    paths
}

/// Load the header and symbol table of one shard
///
/// **Public** - main entry point for shard parsing
///
/// The sample region is skipped here and read later by the merger,
/// directly into its slot of the merged buffer.
///
/// # Errors
/// * `ShardError::Io` - file cannot be opened or read
/// * `ShardError::HeaderTruncated` - fewer than 16 header bytes
/// * `ShardError::MisalignedSampleRegion` - sample length not a multiple of 16
pub fn load_shard(path: &Path) -> Result<ShardRecord, ShardError> {
    let io_err = |source| ShardError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(io_err)?;

    let mut header = [0u8; SHARD_HEADER_LEN];
    let found = read_up_to(&mut file, &mut header).map_err(io_err)?;
    if found < SHARD_HEADER_LEN {
        return Err(ShardError::HeaderTruncated {
            path: path.to_path_buf(),
            found,
        });
    }

    let ticks_per_second = read_u64(&header, 0);
    let sample_byte_length = read_u64(&header, 8);

    if sample_byte_length % SAMPLE_WIRE_LEN != 0 {
        return Err(ShardError::MisalignedSampleRegion {
            path: path.to_path_buf(),
            length: sample_byte_length,
        });
    }

    let file_length = file.metadata().map_err(io_err)?.len();

    // A sample region running past EOF leaves no symbol table; the merger
    // rejects the shard before allocating anything for it.
    let table_start = (SHARD_HEADER_LEN as u64)
        .saturating_add(sample_byte_length)
        .min(file_length);
    file.seek(SeekFrom::Start(table_start)).map_err(io_err)?;

    let mut table_bytes = Vec::new();
    file.read_to_end(&mut table_bytes).map_err(io_err)?;
    let symbols = parse_symbol_table(&table_bytes);

    debug!(
        "Loaded shard {}: {} ticks/s, {} samples, {} symbols",
        path.display(),
        ticks_per_second,
        sample_byte_length / SAMPLE_WIRE_LEN,
        symbols.len()
    );

    Ok(ShardRecord {
        path: path.to_path_buf(),
        ticks_per_second,
        sample_byte_length,
        file_length,
        symbols,
        merge_offset: 0,
    })
}

/// Parse symbol entries until a short read
///
/// **Public** - exposed for fixture tooling and tests
pub fn parse_symbol_table(bytes: &[u8]) -> SymbolTable {
    let mut symbols = SymbolTable::new();
    let mut cursor = 0usize;

    while bytes.len() - cursor >= SYMBOL_ENTRY_PREFIX_LEN {
        let address = read_u64(bytes, cursor);
        let name_len = read_u32(bytes, cursor + 8) as usize;
        let name_start = cursor + SYMBOL_ENTRY_PREFIX_LEN;

        if bytes.len() - name_start < name_len {
            debug!(
                "Symbol entry at byte {} declares {} name bytes, {} available; table ends",
                cursor,
                name_len,
                bytes.len() - name_start
            );
            break;
        }

        let name = String::from_utf8_lossy(&bytes[name_start..name_start + name_len]);
        symbols.insert(address, name.into_owned());
        cursor = name_start + name_len;
    }

    symbols
}

/// Encode a shard in the tracer's wire layout
///
/// **Public** - used to build fixtures; inverse of `load_shard` + merge
pub fn encode_shard(ticks_per_second: u64, samples: &[(u64, u64)], symbols: &SymbolTable) -> Vec<u8> {
    let sample_bytes = samples.len() * SAMPLE_WIRE_LEN as usize;
    let mut out = Vec::with_capacity(SHARD_HEADER_LEN + sample_bytes);

    out.extend_from_slice(&ticks_per_second.to_le_bytes());
    out.extend_from_slice(&(sample_bytes as u64).to_le_bytes());

    for &(time, address) in samples {
        out.extend_from_slice(&time.to_le_bytes());
        out.extend_from_slice(&address.to_le_bytes());
    }

    for (address, name) in symbols {
        out.extend_from_slice(&address.to_le_bytes());
        out.extend_from_slice(&(name.len() as u32).to_le_bytes());
        out.extend_from_slice(name.as_bytes());
    }

    out
}

/// Fill `buf` as far as the reader allows, returning the byte count
///
/// **Private** - a short count means EOF, not an error
pub(crate) fn read_up_to(reader: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

pub(crate) fn read_u64(bytes: &[u8], offset: usize) -> u64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(&bytes[offset..offset + 8]);
    u64::from_le_bytes(word)
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(&bytes[offset..offset + 4]);
    u32::from_le_bytes(word)
}
