//! Run artifact reading and writing.
//!
//! Backtest runs persist their time series next to the registry record;
//! telemetry runs persist per-factor IC series under a `factors/`
//! subdirectory, which the adaptive weighting pass loads back.

use crate::safe::MetricValue;
use cabarete_traits::{BacktestReport, Date, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Write a value as pretty JSON, creating parent directories as needed.
///
/// # Errors
///
/// Returns an I/O or serialization error on failure.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(value)?)?;
    Ok(())
}

/// Read a JSON value back.
///
/// # Errors
///
/// Returns an I/O error when the file is missing or a serialization error
/// when it does not parse.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Persist a backtest report's time series as `returns.json`.
///
/// # Errors
///
/// Returns an I/O or serialization error on failure.
pub fn write_backtest_artifacts(run_dir: &Path, report: &BacktestReport) -> Result<()> {
    let returns = serde_json::json!({
        "gross": report.gross_returns,
        "net": report.net_returns,
        "benchmark": report.benchmark_returns,
        "equity": report.equity,
        "weights": report.weights_history,
    });
    write_json(&run_dir.join("returns.json"), &returns)
}

/// Persist one factor's IC series and summary under
/// `<factors_dir>/<factor>/`.
///
/// The series passes through [`MetricValue`] so NaN ICs survive the JSON
/// round-trip.
///
/// # Errors
///
/// Returns an I/O or serialization error on failure.
pub fn write_ic_series(
    factors_dir: &Path,
    factor: &str,
    series: &BTreeMap<Date, f64>,
    summary: &BTreeMap<String, MetricValue>,
) -> Result<()> {
    let dir = factors_dir.join(factor);
    let safe_series: BTreeMap<Date, MetricValue> = series
        .iter()
        .map(|(date, &value)| (*date, MetricValue(value)))
        .collect();
    write_json(&dir.join("ic_series.json"), &safe_series)?;
    write_json(&dir.join("ic_summary.json"), summary)
}

/// Load the IC series of the most recent telemetry run.
///
/// Scans `<runs_dir>/<day>/<run_id>/factors/` directories, takes the
/// latest by path order, and reads each factor subdirectory's
/// `ic_series.json`. When `factor_names` is given, other factors are
/// skipped. Returns an empty map when no telemetry run exists.
///
/// # Errors
///
/// Returns an I/O or serialization error when an artifact exists but
/// cannot be read.
pub fn load_latest_ic_series(
    runs_dir: &Path,
    factor_names: Option<&[String]>,
) -> Result<BTreeMap<String, BTreeMap<Date, f64>>> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    if runs_dir.exists() {
        for day_entry in fs::read_dir(runs_dir)? {
            let day_path = day_entry?.path();
            if !day_path.is_dir() {
                continue;
            }
            for run_entry in fs::read_dir(&day_path)? {
                let factors_path = run_entry?.path().join("factors");
                if factors_path.is_dir() {
                    candidates.push(factors_path);
                }
            }
        }
    }
    candidates.sort();
    let Some(latest) = candidates.last() else {
        return Ok(BTreeMap::new());
    };

    let mut out = BTreeMap::new();
    for entry in fs::read_dir(latest)? {
        let factor_dir = entry?.path();
        if !factor_dir.is_dir() {
            continue;
        }
        let Some(name) = factor_dir.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(wanted) = factor_names {
            if !wanted.iter().any(|w| w == name) {
                continue;
            }
        }
        let series_path = factor_dir.join("ic_series.json");
        if !series_path.exists() {
            continue;
        }
        let safe_series: BTreeMap<Date, MetricValue> = read_json(&series_path)?;
        let series = safe_series
            .into_iter()
            .map(|(date, value)| (date, value.get()))
            .collect();
        out.insert(name.to_string(), series);
    }
    Ok(out)
}
