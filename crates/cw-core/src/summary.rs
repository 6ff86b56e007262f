//! Window summary metrics.
//!
//! Mirrors the dashboard's metric tiles: reading count, mean volume, mean
//! speed, and per-zone counts for the current window.

use cw_common::{Window, Zone};
use serde::{Deserialize, Serialize};

/// Aggregate metrics for one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSummary {
    /// Readings in the window.
    pub count: usize,
    /// Mean traffic volume; `None` for an empty window.
    pub mean_volume: Option<f64>,
    /// Mean speed in km/h; `None` for an empty window.
    pub mean_speed: Option<f64>,
    /// Reading count per zone, in `Zone::ALL` order.
    pub zone_counts: Vec<(Zone, usize)>,
}

/// Compute summary metrics over a window.
pub fn summarize(window: &Window) -> WindowSummary {
    let count = window.len();
    let (mean_volume, mean_speed) = if count == 0 {
        (None, None)
    } else {
        let vol: i64 = window.readings.iter().map(|r| r.volume).sum();
        let speed: f64 = window.readings.iter().map(|r| r.speed).sum();
        (
            Some(vol as f64 / count as f64),
            Some(speed / count as f64),
        )
    };

    let zone_counts = Zone::ALL
        .iter()
        .map(|&zone| {
            let n = window.readings.iter().filter(|r| r.zone == zone).count();
            (zone, n)
        })
        .collect();

    WindowSummary {
        count,
        mean_volume,
        mean_speed,
        zone_counts,
    }
}
