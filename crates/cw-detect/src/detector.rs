//! Window-level anomaly detection.
//!
//! `detect` classifies every reading in a window as normal or anomalous by
//! fitting an isolation forest on the window's `(volume, speed)` pairs and
//! flagging the readings whose score sits strictly above the
//! `(1 - contamination)` quantile of the window's scores. Strictness makes
//! a window of identical readings (one shared score) come back empty
//! instead of fully flagged.
//!
//! Guarantees:
//! - `detect(empty) = empty`, with no model fit attempted
//! - every flagged reading is a field-for-field member of the input window,
//!   returned in window order
//! - non-finite feature values fail validation before any fit
//! - labels are recomputed per call; nothing is persisted between calls

use crate::forest::{IsolationForest, N_FEATURES};
use cw_common::{DetectorSettings, Reading, Result, Window};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// One reading flagged as anomalous, with its isolation score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlaggedReading {
    pub reading: Reading,
    /// Isolation score in (0, 1]; higher is more anomalous.
    pub score: f64,
}

/// Result of one detection pass over a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyReport {
    /// Flagged readings, in window order. Always a subset of the window.
    pub flagged: Vec<FlaggedReading>,
    /// Score threshold used for this pass; `None` when the window was
    /// empty and no model was fit.
    pub threshold: Option<f64>,
    /// Number of readings evaluated (the window size).
    pub evaluated: usize,
}

impl AnomalyReport {
    fn empty() -> Self {
        AnomalyReport {
            flagged: Vec::new(),
            threshold: None,
            evaluated: 0,
        }
    }
}

/// Classify a window's readings and return the anomalous subset.
///
/// Pass `settings.random_state` to pin the forest for reproducible runs;
/// without it, repeated calls over an identical window may flag a
/// different (though typically similar) subset.
pub fn detect(window: &Window, settings: &DetectorSettings) -> Result<AnomalyReport> {
    if window.is_empty() {
        tracing::debug!("empty window, skipping detection");
        return Ok(AnomalyReport::empty());
    }

    let points = features(&window.readings)?;

    let mut rng = match settings.random_state {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let forest = IsolationForest::fit(&points, settings, &mut rng)?;

    let scores: Vec<f64> = points.iter().map(|p| forest.score(p)).collect();
    let threshold = quantile(&scores, 1.0 - settings.contamination);

    let flagged: Vec<FlaggedReading> = window
        .readings
        .iter()
        .zip(&scores)
        .filter(|(_, &score)| score > threshold)
        .map(|(reading, &score)| FlaggedReading {
            reading: reading.clone(),
            score,
        })
        .collect();

    tracing::info!(
        evaluated = window.len(),
        flagged = flagged.len(),
        threshold,
        "detection pass complete"
    );

    Ok(AnomalyReport {
        flagged,
        threshold: Some(threshold),
        evaluated: window.len(),
    })
}

/// Extract `(volume, speed)` feature pairs, failing on non-finite values
/// before any model fit is attempted.
fn features(readings: &[Reading]) -> Result<Vec<[f64; N_FEATURES]>> {
    readings
        .iter()
        .map(|r| {
            r.validate()?;
            Ok([r.volume as f64, r.speed])
        })
        .collect()
}

/// Linear-interpolation quantile of `values` at `q` in [0, 1].
fn quantile(values: &[f64], q: f64) -> f64 {
    debug_assert!(!values.is_empty());
    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);

    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = pos - lo as f64;
    sorted[lo] + frac * (sorted[hi] - sorted[lo])
}
