#![forbid(unsafe_code)]

//! Run registry, snapshot persistence, and config hashing.
//!
//! The engines emit plain numeric structures; this crate decides how they
//! land on disk: run records keyed by `(date, run_id)`, JSON artifacts
//! with tagged non-finite floats, reproducibility hashes, and frozen data
//! snapshots. Timestamps and run ids come from an injected [`RunContext`]
//! so tests stay deterministic.

pub mod artifacts;
pub mod context;
pub mod hashing;
pub mod record;
pub mod registry;
pub mod safe;
pub mod snapshot;

pub use artifacts::{
    load_latest_ic_series, read_json, write_backtest_artifacts, write_ic_series, write_json,
};
pub use context::{FixedContext, RunContext, SystemContext};
pub use hashing::{code_sha, hash_config};
pub use record::RunRecord;
pub use registry::{list_runs, load_run, save_run};
pub use safe::{MetricValue, to_metric_map};
pub use snapshot::{Snapshot, list_snapshots, load_snapshot, write_snapshot};
