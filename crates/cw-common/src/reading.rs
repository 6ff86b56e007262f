//! The traffic `Reading` record and the fixed `Zone` set.
//!
//! Readings are append-only: created by the simulator, stored once, never
//! mutated or deleted. Windows and anomaly reports reference them by value.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Named city zones that produce traffic readings.
///
/// The zone set is fixed; an unknown zone name coming back from the store
/// is a validation failure, not a new zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    Saddar,
    Clifton,
    Gulshan,
    Defence,
}

impl Zone {
    /// All zones, in the order the simulator visits them.
    pub const ALL: [Zone; 4] = [Zone::Saddar, Zone::Clifton, Zone::Gulshan, Zone::Defence];

    /// Canonical zone name as stored in the `location` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Zone::Saddar => "Saddar",
            Zone::Clifton => "Clifton",
            Zone::Gulshan => "Gulshan",
            Zone::Defence => "Defence",
        }
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Zone {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Saddar" => Ok(Zone::Saddar),
            "Clifton" => Ok(Zone::Clifton),
            "Gulshan" => Ok(Zone::Gulshan),
            "Defence" => Ok(Zone::Defence),
            other => Err(Error::Validation(format!("unknown zone: {}", other))),
        }
    }
}

/// One sample of traffic state at a zone and point in time.
///
/// `volume` is a traffic-load percentage, expected (not enforced) to sit in
/// roughly [0, 100]. `speed` is km/h, expected non-negative. Arrival order
/// is not guaranteed monotonic in `timestamp`; each reading carries its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Sample time, UTC.
    pub timestamp: DateTime<Utc>,
    /// Zone the sample was taken in.
    pub zone: Zone,
    /// Traffic volume, percentage of capacity.
    pub volume: i64,
    /// Average speed, km/h.
    pub speed: f64,
}

impl Reading {
    pub fn new(timestamp: DateTime<Utc>, zone: Zone, volume: i64, speed: f64) -> Self {
        Reading {
            timestamp,
            zone,
            volume,
            speed,
        }
    }

    /// Check the numeric fields are usable as model features.
    ///
    /// Volume is integral and always finite; speed must not be NaN or
    /// infinite. Range expectations (volume in [0,100], speed >= 0) are
    /// documented, not enforced.
    pub fn validate(&self) -> Result<()> {
        if !self.speed.is_finite() {
            return Err(Error::Validation(format!(
                "non-finite speed {} for zone {} at {}",
                self.speed,
                self.zone,
                self.timestamp.to_rfc3339()
            )));
        }
        Ok(())
    }
}
