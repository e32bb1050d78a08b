//! Run records.

use crate::safe::MetricValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Immutable summary of one simulation run.
///
/// Created once when a run finishes and never mutated afterwards; the
/// registry persists it alongside the run's artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    /// Unique run identifier.
    pub run_id: String,
    /// Source revision the run was produced from.
    pub code_sha: String,
    /// Identifier of the data snapshot the run consumed.
    pub data_snapshot_id: String,
    /// Deterministic hash of the run configuration.
    pub config_hash: String,
    /// RFC 3339 start timestamp.
    pub started_at: String,
    /// RFC 3339 end timestamp.
    pub ended_at: String,
    /// Flat metrics mapping with JSON-safe non-finite values.
    pub metrics: BTreeMap<String, MetricValue>,
    /// Output locations keyed by role (e.g. `"root"`).
    pub paths: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_roundtrip_with_non_finite_metrics() {
        let record = RunRecord {
            run_id: "abc123def456".to_string(),
            code_sha: "deadbee".to_string(),
            data_snapshot_id: "SNAP_DEMO".to_string(),
            config_hash: "f".repeat(64),
            started_at: "2024-01-05T12:00:00+00:00".to_string(),
            ended_at: "2024-01-05T12:00:01+00:00".to_string(),
            metrics: [
                ("Sharpe".to_string(), MetricValue(f64::INFINITY)),
                ("Beta".to_string(), MetricValue(f64::NAN)),
                ("CAGR".to_string(), MetricValue(0.12)),
            ]
            .into(),
            paths: [("root".to_string(), "runs/2024-01-05/abc123def456".to_string())].into(),
        };

        let json = serde_json::to_string_pretty(&record).unwrap();
        let back: RunRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.run_id, record.run_id);
        assert_eq!(back.metrics["Sharpe"].get(), f64::INFINITY);
        assert!(back.metrics["Beta"].get().is_nan());
        assert_eq!(back.metrics["CAGR"].get(), 0.12);
    }
}
