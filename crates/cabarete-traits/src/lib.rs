#![doc(issue_tracker_base_url = "https://github.com/factordynamics/cabarete/issues/")]
#![forbid(unsafe_code)]

//! Core types and trait definitions for the Cabarete research toolkit.
//!
//! This crate provides the foundational abstractions for factor computation,
//! portfolio construction, and walk-forward simulation: batch and sector
//! types, run configuration, the [`Factor`] and [`Engine`] traits, and the
//! shared error type.

/// The version of the cabarete-traits crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Module declarations
pub mod engine;
pub mod error;
pub mod factor;
pub mod params;
pub mod stats;
pub mod types;

// Re-exports
pub use engine::{BacktestMetrics, BacktestReport, Engine};
pub use error::{CabareteError, Result};
pub use factor::{Factor, FactorStyle};
pub use params::WeeklyParams;
pub use types::{Date, Fundamentals, Panel, SectorMap, Ticker, UNKNOWN_SECTOR, WeeklyBatch};
