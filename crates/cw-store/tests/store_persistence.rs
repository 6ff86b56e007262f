//! On-disk persistence tests for the reading store.

use chrono::{Duration, TimeZone, Utc};
use cw_common::{Reading, Zone};
use cw_store::ReadingStore;

#[test]
fn readings_survive_close_and_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("traffic.db");
    let ts = Utc.with_ymd_and_hms(2026, 8, 25, 10, 0, 0).unwrap();

    let batch = vec![
        Reading::new(ts, Zone::Saddar, 74, 17.8),
        Reading::new(ts, Zone::Clifton, 31, 30.7),
    ];

    let mut store = ReadingStore::open(&db).unwrap();
    store.append(&batch).unwrap();
    store.close().unwrap();

    let store = ReadingStore::open(&db).unwrap();
    let got = store.query_since(ts - Duration::hours(1)).unwrap();
    assert_eq!(got, batch);
}

#[test]
fn cutoff_spanning_known_range_returns_exactly_the_tail() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("traffic.db");
    let base = Utc.with_ymd_and_hms(2026, 8, 25, 0, 0, 0).unwrap();

    // One reading per hour across a full day.
    let batch: Vec<Reading> = (0..24)
        .map(|h| Reading::new(base + Duration::hours(h), Zone::Gulshan, 40 + h, 25.0))
        .collect();

    let mut store = ReadingStore::open(&db).unwrap();
    store.append(&batch).unwrap();

    let cutoff = base + Duration::hours(18);
    let got = store.query_since(cutoff).unwrap();
    assert_eq!(got, batch[18..].to_vec());
}

#[test]
fn unreachable_store_path_is_a_storage_failure() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("no-such-dir").join("traffic.db");
    let err = ReadingStore::open(&missing).unwrap_err();
    assert_eq!(err.code(), 20);
}
