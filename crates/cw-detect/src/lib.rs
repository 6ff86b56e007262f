//! Citywatch outlier detection.
//!
//! Isolation-based scoring over the joint `(volume, speed)` distribution of
//! one window of readings. The detector is a pure function of
//! (window, settings, random state); it holds no memory between calls and
//! recomputes labels from scratch on every refresh.

pub mod detector;
pub mod forest;

pub use detector::{detect, AnomalyReport, FlaggedReading};
pub use forest::IsolationForest;
