//! Engine contract shared by the scalar and vectorized backtests.
//!
//! Both engine variants consume the same batch sequence and produce the
//! same report shape, so callers can swap implementations freely. The
//! scalar engine is authoritative for correctness; the vectorized variant
//! trades exact top-K selection for cross-sectional array math.

use crate::{Result, SectorMap, Ticker, WeeklyBatch};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A walk-forward simulation engine.
pub trait Engine: Send + Sync {
    /// Name of this engine implementation, for logging and run metadata.
    fn name(&self) -> &str;

    /// Simulate the batch sequence and produce a full report.
    ///
    /// # Errors
    ///
    /// Returns an input-validation error when `batches` is empty or the
    /// engine's configuration is invalid. Numeric degeneracy inside the
    /// simulation never errors; it surfaces as NaN/±inf metrics instead.
    fn run(&self, batches: &[WeeklyBatch], sectors: &SectorMap) -> Result<BacktestReport>;
}

/// Summary metrics for one simulation run.
///
/// Annualization assumes weekly periods (scale factor sqrt(52)).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BacktestMetrics {
    /// Annualized Sharpe ratio of net returns.
    pub sharpe: f64,
    /// Annualized Sortino ratio of net returns.
    pub sortino: f64,
    /// Weekly alpha versus the benchmark series.
    pub alpha: f64,
    /// Beta versus the benchmark series.
    pub beta: f64,
    /// Compound annual growth rate of the equity curve.
    pub cagr: f64,
    /// Maximum peak-to-trough drawdown of the equity curve.
    pub max_drawdown: f64,
    /// Average per-period turnover.
    pub avg_turnover: f64,
    /// Final equity value (initial equity is 1.0).
    pub terminal_equity: f64,
    /// Number of simulated weeks.
    pub total_weeks: usize,
}

impl BacktestMetrics {
    /// Flat `name -> value` view for persistence and display.
    #[must_use]
    pub fn as_map(&self) -> BTreeMap<String, f64> {
        [
            ("Sharpe", self.sharpe),
            ("Sortino", self.sortino),
            ("Alpha", self.alpha),
            ("Beta", self.beta),
            ("CAGR", self.cagr),
            ("MaxDD", self.max_drawdown),
            ("Turnover", self.avg_turnover),
            ("TerminalEquity", self.terminal_equity),
            ("TotalWeeks", self.total_weeks as f64),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
    }
}

/// Full output of a walk-forward simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestReport {
    /// Summary metrics.
    pub metrics: BacktestMetrics,
    /// Gross portfolio return per period.
    pub gross_returns: Vec<f64>,
    /// Net portfolio return per period (gross minus the flat cost).
    pub net_returns: Vec<f64>,
    /// Benchmark average return per period.
    pub benchmark_returns: Vec<f64>,
    /// Equity curve compounded from 1.0; length is periods + 1.
    pub equity: Vec<f64>,
    /// Portfolio weights per period.
    pub weights_history: Vec<BTreeMap<Ticker, f64>>,
    /// Sum of per-period turnover over the run.
    pub total_turnover: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_metrics() -> BacktestMetrics {
        BacktestMetrics {
            sharpe: 1.2,
            sortino: 1.8,
            alpha: 0.001,
            beta: 0.9,
            cagr: 0.12,
            max_drawdown: 0.05,
            avg_turnover: 0.3,
            terminal_equity: 1.25,
            total_weeks: 52,
        }
    }

    #[test]
    fn test_metrics_as_map_keys() {
        let map = sample_metrics().as_map();
        assert_eq!(map.len(), 9);
        assert_eq!(map["Sharpe"], 1.2);
        assert_eq!(map["MaxDD"], 0.05);
        assert_eq!(map["TotalWeeks"], 52.0);
    }

    #[test]
    fn test_metrics_serialize_roundtrip() {
        let metrics = sample_metrics();
        let json = serde_json::to_string(&metrics).unwrap();
        let back: BacktestMetrics = serde_json::from_str(&json).unwrap();
        assert_eq!(metrics, back);
    }
}
