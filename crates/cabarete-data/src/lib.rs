#![forbid(unsafe_code)]

//! Data boundary for the Cabarete toolkit.
//!
//! Everything here produces the core's input mappings and nothing more:
//! CSV adapters with header-alias normalization, walk-forward batch
//! assembly from snapshot panels, and an HTTP market-data client. The
//! engines never perform I/O themselves.

pub mod adapter;
pub mod batches;
pub mod client;
pub mod error;
pub mod types;

pub use adapter::{load_eps_csv, load_fundamentals_csv, load_prices_csv, load_sectors_csv};
pub use batches::{BENCHMARK_KEY, batches_from_panels};
pub use client::MarketDataClient;
pub use error::{DataError, Result};
