//! In-memory smart-meter telemetry simulator.
//!
//! Independently ticking meter tasks write synthetic readings into a shared
//! latest-value store; readers take snapshots of it at any time.

#[cfg(feature = "api")]
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod io;
pub mod logging;
/// Simulated meters, readings, and the daily load profile.
pub mod meter;
/// Meter scheduling, shared state, clocks, and summaries.
pub mod sim;
#[cfg(feature = "tui")]
pub mod tui;

pub use error::{Error, Result};
