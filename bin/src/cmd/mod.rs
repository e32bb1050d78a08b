//! CLI command implementations.

pub(crate) mod backtest;
pub(crate) mod demo;
pub(crate) mod fetch;
pub(crate) mod snapshots;
pub(crate) mod telemetry;
pub(crate) mod weekly;
pub(crate) mod weights;
