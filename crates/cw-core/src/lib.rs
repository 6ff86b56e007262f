//! Citywatch core library.
//!
//! This library glues the store gateway and the detector into the
//! simulate / detect / summarize / export pipeline behind the `cw-core`
//! binary:
//! - Simulated traffic generation, one reading per zone per tick
//! - Window summary metrics
//! - CSV export of anomaly reports
//! - Logging initialization
//!
//! The binary entry point is in `main.rs`.

pub mod export;
pub mod logging;
pub mod simulate;
pub mod summary;

pub use export::write_csv;
pub use simulate::Simulator;
pub use summary::{summarize, WindowSummary};
