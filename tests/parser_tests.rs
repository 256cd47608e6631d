use loop_trace::parser::{encode_shard, load_trace, parse_symbol_table, shard_path, SymbolTable};
use loop_trace::utils::error::MergeError;
use pretty_assertions::assert_eq;
use tempfile::tempdir;

fn table(entries: &[(u64, &str)]) -> SymbolTable {
    entries.iter().map(|(a, n)| (*a, n.to_string())).collect()
}

#[test]
fn test_shard_round_trip() {
    let dir = tempdir().unwrap();
    let base = dir.path().join("trace");
    let samples = vec![(100, 0x10), (250, 0x20), (400, 0x10), (u64::MAX, 0xdead_beef)];
    let symbols = table(&[(0x10, "tick_loop_start"), (0x20, "physics::step"), (0x30, "ünïcode")]);
    std::fs::write(shard_path(&base, 0), encode_shard(3_000_000_000, &samples, &symbols)).unwrap();

    let (trace, shards) = load_trace(&base).unwrap();

    assert_eq!(shards, 1);
    assert_eq!(trace.ticks_per_second, 3_000_000_000);
    let decoded: Vec<(u64, u64)> = (0..trace.sample_count())
        .map(|i| (trace.timestamp(i), trace.address(i)))
        .collect();
    assert_eq!(decoded, samples);
    assert_eq!(trace.symbols, symbols);
}

#[test]
fn test_multi_shard_concatenation() {
    let dir = tempdir().unwrap();
    let base = dir.path().join("trace");
    for index in 0..3u64 {
        let samples = vec![(index * 10, index), (index * 10 + 5, index)];
        let encoded = encode_shard(1_000, &samples, &table(&[(index, "fn")]));
        std::fs::write(shard_path(&base, index as usize), encoded).unwrap();
    }
    // Beyond a gap: never read
    std::fs::write(shard_path(&base, 4), [0u8; 3]).unwrap();

    let (trace, shards) = load_trace(&base).unwrap();

    assert_eq!(shards, 3);
    assert_eq!(trace.timestamps().collect::<Vec<_>>(), vec![0, 5, 10, 15, 20, 25]);
}

#[test]
fn test_truncated_header_aborts_merge() {
    let dir = tempdir().unwrap();
    let base = dir.path().join("trace");
    std::fs::write(shard_path(&base, 0), encode_shard(1_000, &[(1, 1)], &SymbolTable::new())).unwrap();
    std::fs::write(shard_path(&base, 1), [1u8; 15]).unwrap();

    let err = load_trace(&base).unwrap_err();

    assert!(matches!(err, MergeError::Shard(_)));
    assert!(err.to_string().contains("trace_1"));
}

#[test]
fn test_oversized_name_length_keeps_earlier_entries() {
    let mut bytes = Vec::new();
    for (address, name) in [(0x1u64, "first"), (0x2, "second")] {
        bytes.extend_from_slice(&address.to_le_bytes());
        bytes.extend_from_slice(&(name.len() as u32).to_le_bytes());
        bytes.extend_from_slice(name.as_bytes());
    }
    bytes.extend_from_slice(&0x3u64.to_le_bytes());
    bytes.extend_from_slice(&u32::MAX.to_le_bytes());
    bytes.extend_from_slice(b"thi");

    assert_eq!(parse_symbol_table(&bytes), table(&[(0x1, "first"), (0x2, "second")]));
}
