//! Reading store gateway over SQLite.
//!
//! This crate owns the only persistent state in Citywatch: the append-only
//! `traffic` table. The gateway is deliberately narrow:
//! - `append` inserts a batch of readings (duplicates are NOT deduplicated)
//! - `query_since` returns everything at or after a cutoff, in arrival order
//!
//! There is no caching and no retry policy; a failing store surfaces as
//! `Error::Storage` and the caller decides what to do. The store handle is
//! an explicit value passed into every operation, opened and closed around
//! a scoped session rather than held in a process-wide singleton.

use chrono::{DateTime, SecondsFormat, Utc};
use cw_common::{Error, Reading, Result, Window, Zone};
use rusqlite::Connection;
use std::path::Path;

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS traffic (
    timestamp TEXT NOT NULL,
    location TEXT NOT NULL,
    traffic_volume INTEGER NOT NULL,
    avg_speed REAL NOT NULL
)";

fn storage_err(e: rusqlite::Error) -> Error {
    Error::Storage(e.to_string())
}

/// Timestamps are stored as RFC 3339 UTC with fixed microsecond precision
/// and a `Z` suffix, so lexicographic comparison in SQL equals
/// chronological comparison.
fn fmt_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_ts(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Validation(format!("bad stored timestamp {:?}: {}", raw, e)))
}

/// Handle on one SQLite-backed reading store.
///
/// One logical caller at a time; concurrent sharing between sessions is
/// out of scope and undefined.
#[derive(Debug)]
pub struct ReadingStore {
    conn: Connection,
}

impl ReadingStore {
    /// Open (creating if needed) an on-disk store.
    pub fn open(path: &Path) -> Result<ReadingStore> {
        let conn = Connection::open(path).map_err(storage_err)?;
        conn.execute(CREATE_TABLE, []).map_err(storage_err)?;
        tracing::debug!(path = %path.display(), "opened reading store");
        Ok(ReadingStore { conn })
    }

    /// Open a fresh in-memory store. Used by tests and dry runs.
    pub fn open_in_memory() -> Result<ReadingStore> {
        let conn = Connection::open_in_memory().map_err(storage_err)?;
        conn.execute(CREATE_TABLE, []).map_err(storage_err)?;
        Ok(ReadingStore { conn })
    }

    /// Append a batch of readings in one transaction.
    ///
    /// Not idempotent: appending the same batch twice stores it twice.
    /// Returns the number of rows inserted.
    pub fn append(&mut self, readings: &[Reading]) -> Result<usize> {
        let tx = self.conn.transaction().map_err(storage_err)?;
        {
            let mut stmt = tx
                .prepare("INSERT INTO traffic VALUES (?1, ?2, ?3, ?4)")
                .map_err(storage_err)?;
            for r in readings {
                stmt.execute((fmt_ts(r.timestamp), r.zone.as_str(), r.volume, r.speed))
                    .map_err(storage_err)?;
            }
        }
        tx.commit().map_err(storage_err)?;
        tracing::debug!(rows = readings.len(), "appended readings");
        Ok(readings.len())
    }

    /// All readings with `timestamp >= cutoff`, in arrival order.
    ///
    /// An empty result is a normal outcome, not an error.
    pub fn query_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<Reading>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT timestamp, location, traffic_volume, avg_speed
                 FROM traffic WHERE timestamp >= ?1 ORDER BY rowid",
            )
            .map_err(storage_err)?;
        let rows = stmt
            .query_map([fmt_ts(cutoff)], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, f64>(3)?,
                ))
            })
            .map_err(storage_err)?;

        let mut readings = Vec::new();
        for row in rows {
            let (ts, location, volume, speed) = row.map_err(storage_err)?;
            let zone: Zone = location.parse()?;
            readings.push(Reading::new(parse_ts(&ts)?, zone, volume, speed));
        }
        tracing::debug!(rows = readings.len(), cutoff = %fmt_ts(cutoff), "loaded window rows");
        Ok(readings)
    }

    /// Load the trailing `hours` window ending at `now`.
    pub fn load_window(&self, now: DateTime<Utc>, hours: i64) -> Result<Window> {
        let cutoff = Window::cutoff_for(now, hours);
        let readings = self.query_since(cutoff)?;
        Ok(Window::new(cutoff, readings))
    }

    /// Close the session, surfacing any pending failure.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| storage_err(e))
    }
}
