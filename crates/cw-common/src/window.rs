//! Time-window semantics for one detection pass.
//!
//! A `Window` is the set of readings whose timestamp is at or after a
//! cutoff derived from "now minus H hours", in arrival order. Windows are
//! ephemeral: rebuilt on every refresh, never cached or persisted.

use crate::reading::Reading;
use chrono::{DateTime, Duration, Utc};

/// A trailing lookback of readings feeding one detection pass.
///
/// An empty window is a valid, terminal state: detection is skipped
/// entirely rather than fit on zero samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    /// Inclusive lower bound on `Reading::timestamp`.
    pub cutoff: DateTime<Utc>,
    /// Matching readings, in arrival order.
    pub readings: Vec<Reading>,
}

impl Window {
    pub fn new(cutoff: DateTime<Utc>, readings: Vec<Reading>) -> Self {
        Window { cutoff, readings }
    }

    /// Cutoff for a trailing lookback of `hours` ending at `now`.
    pub fn cutoff_for(now: DateTime<Utc>, hours: i64) -> DateTime<Utc> {
        now - Duration::hours(hours)
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }
}
