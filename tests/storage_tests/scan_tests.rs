//! Tests for log scanning and index replay
//!
//! These tests verify:
//! - scan yields every record in append order with its offset
//! - replay rebuilds the index from the log alone
//! - replay across a reopen on disk
//! - A malformed tail stops scan/replay with an error

use logkv::storage::{LogEntry, LogScanner, Record, ReplayStats};
use logkv::{
    AppendOnlyLog, Config, HashIndex, LogFile, LogKvError, MemoryFile, OpenMode, OrderedIndex,
    StorageEngine,
};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

/// hello=world, hello=all, name=logkv, del hello
fn sample_log() -> AppendOnlyLog<MemoryFile, HashIndex> {
    let mut log = AppendOnlyLog::new(MemoryFile::new(), HashIndex::new());
    log.set(b"hello", b"world").unwrap();
    log.set(b"hello", b"all").unwrap();
    log.set(b"name", b"logkv").unwrap();
    log.delete(b"hello").unwrap();
    log
}

fn entries<F: LogFile, I: logkv::Index>(log: &mut AppendOnlyLog<F, I>) -> Vec<LogEntry> {
    log.scan().collect::<logkv::Result<Vec<_>>>().unwrap()
}

// =============================================================================
// Scan Tests
// =============================================================================

#[test]
fn test_scan_empty_log() {
    let mut log = AppendOnlyLog::new(MemoryFile::new(), HashIndex::new());
    assert!(log.scan().next().is_none());
}

#[test]
fn test_scan_yields_records_in_order() {
    let mut log = sample_log();

    let entries = entries(&mut log);

    let offsets: Vec<u64> = entries.iter().map(|e| e.offset).collect();
    assert_eq!(offsets, vec![0, 27, 52, 78]);

    assert_eq!(entries[0].record, Record::value(b"hello".to_vec(), b"world".to_vec()));
    assert_eq!(entries[1].record, Record::value(b"hello".to_vec(), b"all".to_vec()));
    assert_eq!(entries[2].record, Record::value(b"name".to_vec(), b"logkv".to_vec()));
    assert_eq!(entries[3].record, Record::tombstone(b"hello".to_vec()));
}

#[test]
fn test_scan_does_not_touch_index() {
    let mut log = sample_log();

    let _ = entries(&mut log);

    assert_eq!(log.len(), 1);
    assert_eq!(log.get(b"name").unwrap(), b"logkv".to_vec());
}

#[test]
fn test_scanner_tracks_position() {
    let mut file = sample_log().into_parts().0;
    let end = file.len();

    let mut scanner = LogScanner::new(&mut file);
    assert_eq!(scanner.position(), 0);

    scanner.next().unwrap().unwrap();
    assert_eq!(scanner.position(), 27);

    for entry in scanner.by_ref() {
        entry.unwrap();
    }
    assert_eq!(scanner.position(), end);
}

#[test]
fn test_scan_stops_after_malformed_tail() {
    let mut log = sample_log();
    let (mut file, index) = log.into_parts();
    let tail = file.len();
    file.write(&[9, 9, 9]).unwrap();
    log = AppendOnlyLog::new(file, index);

    let results: Vec<_> = log.scan().collect();

    assert_eq!(results.len(), 5);
    assert!(results[..4].iter().all(|r| r.is_ok()));
    assert!(matches!(
        results[4],
        Err(LogKvError::MalformedRecord { offset, .. }) if offset == tail
    ));
}

// =============================================================================
// Replay Tests
// =============================================================================

#[test]
fn test_replay_rebuilds_index() {
    let (file, _) = sample_log().into_parts();
    let mut log = AppendOnlyLog::new(file, HashIndex::new());
    assert!(log.is_empty());

    let stats = log.replay().unwrap();

    assert_eq!(
        stats,
        ReplayStats {
            records: 4,
            values: 3,
            tombstones: 1,
            live_keys: 1,
        }
    );
    assert_eq!(log.offset_of(b"name").unwrap(), 52);
    assert_eq!(log.get(b"name").unwrap(), b"logkv".to_vec());
    assert!(log.get(b"hello").unwrap_err().is_not_found());
}

#[test]
fn test_replay_points_at_newest_record() {
    let mut log = AppendOnlyLog::new(MemoryFile::new(), OrderedIndex::new());
    log.set(b"k", b"1").unwrap();
    log.set(b"k", b"2").unwrap();
    log.set(b"k", b"3").unwrap();
    let newest = log.offset_of(b"k").unwrap();

    let stats = log.replay().unwrap();

    assert_eq!(stats.records, 3);
    assert_eq!(log.offset_of(b"k").unwrap(), newest);
    assert_eq!(log.get(b"k").unwrap(), b"3".to_vec());
}

#[test]
fn test_replay_matches_live_index() {
    let mut log = sample_log();
    let before: Vec<(Vec<u8>, u64)> = [b"hello".as_slice(), b"name".as_slice()]
        .iter()
        .filter_map(|k| log.offset_of(k).ok().map(|o| (k.to_vec(), o)))
        .collect();

    log.replay().unwrap();

    let after: Vec<(Vec<u8>, u64)> = [b"hello".as_slice(), b"name".as_slice()]
        .iter()
        .filter_map(|k| log.offset_of(k).ok().map(|o| (k.to_vec(), o)))
        .collect();
    assert_eq!(before, after);
}

#[test]
fn test_replay_discards_stale_index_entries() {
    let mut log = sample_log();
    let (file, mut index) = log.into_parts();
    logkv::Index::set(&mut index, b"phantom", 0);
    log = AppendOnlyLog::new(file, index);

    log.replay().unwrap();

    assert!(!log.contains(b"phantom"));
}

#[test]
fn test_replay_tombstone_without_value() {
    // A tombstone whose key was never set is skipped
    let mut file = MemoryFile::new();
    file.write(&Record::tombstone(b"never".to_vec()).encode()).unwrap();
    file.write(&Record::value(b"k".to_vec(), b"v".to_vec()).encode()).unwrap();
    let mut log = AppendOnlyLog::new(file, HashIndex::new());

    let stats = log.replay().unwrap();

    assert_eq!(stats.tombstones, 1);
    assert_eq!(stats.live_keys, 1);
    assert!(!log.contains(b"never"));
}

#[test]
fn test_replay_keeps_prefix_before_malformed_record() {
    let (mut file, _) = sample_log().into_parts();
    file.write(&[0, 200]).unwrap();
    let mut log = AppendOnlyLog::new(file, HashIndex::new());

    let err = log.replay().unwrap_err();

    assert!(matches!(err, LogKvError::MalformedRecord { offset: 100, .. }));
    assert_eq!(log.get(b"name").unwrap(), b"logkv".to_vec());
    assert!(!log.contains(b"hello"));
}

// =============================================================================
// Disk Replay Tests
// =============================================================================

#[test]
fn test_replay_after_reopen() {
    let temp = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(temp.path())
        .tablespace("replay")
        .build();
    {
        let mut log = AppendOnlyLog::open(&config).unwrap();
        log.set(b"a", b"1").unwrap();
        log.set(b"b", b"2").unwrap();
        log.delete(b"a").unwrap();
        log.close().unwrap();
    }

    let mut log = AppendOnlyLog::open(&config).unwrap();
    assert!(log.is_empty());

    let stats = log.replay().unwrap();

    assert_eq!(stats.records, 3);
    assert_eq!(log.get(b"b").unwrap(), b"2".to_vec());
    assert!(log.get(b"a").unwrap_err().is_not_found());

    // Writes after replay land after the old records
    log.set(b"c", b"3").unwrap();
    assert_eq!(log.scan().count(), 4);
}

#[test]
fn test_replay_on_open() {
    let temp = TempDir::new().unwrap();
    let config = Config::builder().data_dir(temp.path()).build();
    {
        let mut log = AppendOnlyLog::open(&config).unwrap();
        log.set(b"persisted", b"yes").unwrap();
    }

    let replaying = Config {
        replay_on_open: true,
        ..config
    };
    let mut log = AppendOnlyLog::open(&replaying).unwrap();

    assert_eq!(log.get(b"persisted").unwrap(), b"yes".to_vec());
}

#[test]
fn test_replay_on_open_fails_on_corrupt_log() {
    let temp = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(temp.path())
        .replay_on_open(true)
        .build();
    std::fs::write(config.log_path(), [5u8; 20]).unwrap();

    let result = AppendOnlyLog::open(&config);

    assert!(matches!(result, Err(LogKvError::MalformedRecord { offset: 0, .. })));

    // The raw log is still readable without replay
    let plain = Config {
        replay_on_open: false,
        open_mode: OpenMode::Append,
        ..config
    };
    assert_eq!(AppendOnlyLog::open(&plain).unwrap().log_len(), 20);
}
