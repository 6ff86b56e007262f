//! Citywatch common types, errors, and settings.
//!
//! This crate provides foundational types shared across cw-* crates:
//! - The `Reading` record and the fixed `Zone` set
//! - Time-window semantics for detection passes
//! - The unified error type with stable codes
//! - Settings loading and validation

pub mod error;
pub mod reading;
pub mod settings;
pub mod window;

pub use error::{Error, ErrorCategory, Result};
pub use reading::{Reading, Zone};
pub use settings::{DetectorSettings, Settings, SimulatorSettings, WindowSettings};
pub use window::Window;
