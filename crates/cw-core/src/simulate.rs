//! Simulated traffic readings.
//!
//! One simulation tick produces one reading per zone at the tick's
//! timestamp: volume uniform in [20, 100), speed falling linearly with
//! volume and floored at 5 km/h. Seed the simulator for reproducible
//! fixtures; unseeded runs draw from the OS.

use chrono::{DateTime, Utc};
use cw_common::{Reading, Zone};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generator of simulated per-zone readings.
pub struct Simulator {
    rng: StdRng,
}

impl Simulator {
    pub fn new(random_state: Option<u64>) -> Simulator {
        let rng = match random_state {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Simulator { rng }
    }

    /// One tick: a reading for every zone, all stamped `now`.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<Reading> {
        Zone::ALL
            .iter()
            .map(|&zone| {
                let volume = self.rng.random_range(20..100);
                let speed = (40.0 - volume as f64 * 0.3).max(5.0);
                Reading::new(now, zone, volume, speed)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 25, 12, 0, 0).unwrap()
    }

    #[test]
    fn tick_covers_every_zone_once() {
        let mut sim = Simulator::new(Some(0));
        let readings = sim.tick(now());
        assert_eq!(readings.len(), Zone::ALL.len());
        for (reading, zone) in readings.iter().zip(Zone::ALL) {
            assert_eq!(reading.zone, zone);
            assert_eq!(reading.timestamp, now());
        }
    }

    #[test]
    fn simulated_values_stay_in_model_ranges() {
        let mut sim = Simulator::new(Some(1));
        for _ in 0..50 {
            for r in sim.tick(now()) {
                assert!((20..100).contains(&r.volume));
                assert!(r.speed >= 5.0 && r.speed <= 34.0);
                assert!(r.validate().is_ok());
            }
        }
    }

    #[test]
    fn speed_falls_with_volume() {
        let mut sim = Simulator::new(Some(2));
        for r in sim.tick(now()) {
            let expected = (40.0 - r.volume as f64 * 0.3).max(5.0);
            assert_eq!(r.speed, expected);
        }
    }

    #[test]
    fn same_seed_reproduces_readings() {
        let a = Simulator::new(Some(9)).tick(now());
        let b = Simulator::new(Some(9)).tick(now());
        assert_eq!(a, b);
    }
}
