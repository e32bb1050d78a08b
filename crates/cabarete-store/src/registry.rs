//! On-disk run registry.
//!
//! Runs live under `<base>/<YYYY-MM-DD>/<run_id>/` with three files:
//! `run.json` (the full record), `metrics.json`, and `hashes.json`
//! (code/config/data provenance).

use crate::record::RunRecord;
use cabarete_traits::{CabareteError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Persist a run record and its metadata files.
///
/// # Errors
///
/// Returns an I/O or serialization error if the directory cannot be
/// created or a file cannot be written.
pub fn save_run(record: &RunRecord, base_dir: &Path) -> Result<PathBuf> {
    let day = record.started_at.get(..10).ok_or_else(|| {
        CabareteError::InvalidInput(format!(
            "started_at is not an RFC 3339 timestamp: {}",
            record.started_at
        ))
    })?;
    let run_path = base_dir.join(day).join(&record.run_id);
    fs::create_dir_all(&run_path)?;

    let run_json = serde_json::to_string_pretty(record)?;
    fs::write(run_path.join("run.json"), run_json)?;

    let metrics_json = serde_json::to_string_pretty(&record.metrics)?;
    fs::write(run_path.join("metrics.json"), metrics_json)?;

    let hashes = serde_json::json!({
        "code_sha": record.code_sha,
        "config_hash": record.config_hash,
        "data_snapshot_id": record.data_snapshot_id,
    });
    fs::write(
        run_path.join("hashes.json"),
        serde_json::to_string_pretty(&hashes)?,
    )?;

    Ok(run_path)
}

/// Load a run record back from its directory.
///
/// # Errors
///
/// Returns an I/O error if `run.json` is missing or a serialization error
/// if it does not parse.
pub fn load_run(run_dir: &Path) -> Result<RunRecord> {
    let contents = fs::read_to_string(run_dir.join("run.json"))?;
    Ok(serde_json::from_str(&contents)?)
}

/// All run directories under the registry, sorted ascending by path
/// (date, then run id).
///
/// # Errors
///
/// Returns an I/O error if the registry layout cannot be read. A missing
/// base directory yields an empty list.
pub fn list_runs(base_dir: &Path) -> Result<Vec<PathBuf>> {
    if !base_dir.exists() {
        return Ok(Vec::new());
    }
    let mut runs = Vec::new();
    for day_entry in fs::read_dir(base_dir)? {
        let day_path = day_entry?.path();
        if !day_path.is_dir() {
            continue;
        }
        for run_entry in fs::read_dir(&day_path)? {
            let run_path = run_entry?.path();
            if run_path.is_dir() {
                runs.push(run_path);
            }
        }
    }
    runs.sort();
    Ok(runs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::safe::MetricValue;
    use std::collections::BTreeMap;

    fn temp_registry(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("cabarete-registry-{tag}-{}", std::process::id()))
    }

    fn demo_record(run_id: &str, day: &str) -> RunRecord {
        RunRecord {
            run_id: run_id.to_string(),
            code_sha: "deadbee".to_string(),
            data_snapshot_id: "SNAP".to_string(),
            config_hash: "0".repeat(64),
            started_at: format!("{day}T12:00:00+00:00"),
            ended_at: format!("{day}T12:00:05+00:00"),
            metrics: [("Sharpe".to_string(), MetricValue(1.5))].into(),
            paths: BTreeMap::new(),
        }
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let base = temp_registry("roundtrip");
        let record = demo_record("aaa111bbb222", "2024-01-05");

        let run_path = save_run(&record, &base).unwrap();
        assert!(run_path.join("run.json").exists());
        assert!(run_path.join("metrics.json").exists());
        assert!(run_path.join("hashes.json").exists());

        let back = load_run(&run_path).unwrap();
        assert_eq!(back.run_id, record.run_id);
        assert_eq!(back.metrics["Sharpe"].get(), 1.5);

        fs::remove_dir_all(&base).unwrap();
    }

    #[test]
    fn test_list_runs_sorted() {
        let base = temp_registry("list");
        save_run(&demo_record("bbb", "2024-01-12"), &base).unwrap();
        save_run(&demo_record("aaa", "2024-01-05"), &base).unwrap();

        let runs = list_runs(&base).unwrap();
        assert_eq!(runs.len(), 2);
        assert!(runs[0].ends_with("2024-01-05/aaa"));
        assert!(runs[1].ends_with("2024-01-12/bbb"));

        fs::remove_dir_all(&base).unwrap();
    }

    #[test]
    fn test_list_runs_missing_base() {
        let runs = list_runs(Path::new("/nonexistent/cabarete-runs")).unwrap();
        assert!(runs.is_empty());
    }

    #[test]
    fn test_save_rejects_malformed_timestamp() {
        let mut record = demo_record("ccc", "2024-01-05");
        record.started_at = "bad".to_string();
        assert!(save_run(&record, &temp_registry("bad")).is_err());
    }
}
