//! Common types used throughout the Cabarete toolkit.
//!
//! This module defines the core data structures for representing per-ticker
//! time series, sector classifications, and the weekly rebalance batches the
//! engines consume.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// Re-export date type from chrono
pub use chrono::NaiveDate as Date;

/// A market symbol identifier.
///
/// Tickers identify securities across the Cabarete toolkit, e.g. "AAPL".
pub type Ticker = String;

/// Wide-by-date panel: `date -> ticker -> value`.
///
/// `BTreeMap` keys keep dates in ascending order, which every panel
/// computation in the toolkit relies on.
pub type Panel = BTreeMap<Date, BTreeMap<Ticker, f64>>;

/// Sentinel sector assigned to tickers missing from a [`SectorMap`].
pub const UNKNOWN_SECTOR: &str = "UNK";

/// Latest-known fundamental snapshot for one ticker.
///
/// All fields default to 0.0; a missing snapshot dilutes the ticker's
/// quality score rather than failing the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Fundamentals {
    /// Gross profit margin.
    pub gpm: f64,
    /// Accruals ratio (higher is worse).
    pub accruals: f64,
    /// Leverage ratio (higher is worse).
    pub leverage: f64,
}

/// Ticker-to-sector classification, read-only over a run.
///
/// Tickers absent from the map resolve to [`UNKNOWN_SECTOR`], so partial
/// sector data never aborts a simulation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectorMap {
    map: BTreeMap<Ticker, String>,
}

impl SectorMap {
    /// Create a sector map from ticker/sector pairs.
    #[must_use]
    pub const fn new(map: BTreeMap<Ticker, String>) -> Self {
        Self { map }
    }

    /// Sector label for a ticker, falling back to [`UNKNOWN_SECTOR`].
    #[must_use]
    pub fn sector_of(&self, ticker: &str) -> &str {
        self.map.get(ticker).map_or(UNKNOWN_SECTOR, String::as_str)
    }

    /// Number of explicitly mapped tickers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the map has no explicit entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate over the explicit ticker/sector pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&Ticker, &String)> {
        self.map.iter()
    }

    /// Borrow the underlying mapping.
    #[must_use]
    pub const fn as_map(&self) -> &BTreeMap<Ticker, String> {
        &self.map
    }
}

impl FromIterator<(Ticker, String)> for SectorMap {
    fn from_iter<I: IntoIterator<Item = (Ticker, String)>>(iter: I) -> Self {
        Self {
            map: iter.into_iter().collect(),
        }
    }
}

impl From<BTreeMap<Ticker, String>> for SectorMap {
    fn from(map: BTreeMap<Ticker, String>) -> Self {
        Self::new(map)
    }
}

/// All data needed for a single weekly rebalance step.
///
/// Histories are ordered oldest to newest. A batch is immutable once
/// constructed and owned by whoever assembled it (CLI, adapter, or test).
///
/// # Invariants
///
/// - `next_returns` keys are a subset of `prices` keys.
/// - Histories shorter than a factor's lookback degrade that factor to a
///   zero/neutral score for the ticker, never to an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeeklyBatch {
    /// Weekly close history per ticker.
    pub prices: BTreeMap<Ticker, Vec<f64>>,
    /// Weekly EPS-estimate history per ticker.
    pub eps: BTreeMap<Ticker, Vec<f64>>,
    /// Latest fundamentals snapshot per ticker.
    pub fundamentals: BTreeMap<Ticker, Fundamentals>,
    /// Realized next-period return per ticker.
    pub next_returns: BTreeMap<Ticker, f64>,
    /// Optional benchmark return(s) for the period, keyed by benchmark id.
    pub benchmark: Option<BTreeMap<String, f64>>,
}

impl WeeklyBatch {
    /// Tickers in this batch's universe (the price map's keys).
    pub fn universe(&self) -> impl Iterator<Item = &Ticker> {
        self.prices.keys()
    }

    /// Average benchmark return for the period, 0.0 when absent.
    #[must_use]
    pub fn avg_benchmark_return(&self) -> f64 {
        match &self.benchmark {
            Some(bench) if !bench.is_empty() => {
                bench.values().sum::<f64>() / bench.len() as f64
            }
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sector_map_fallback() {
        let sectors: SectorMap = [("AAA".to_string(), "Tech".to_string())]
            .into_iter()
            .collect();
        assert_eq!(sectors.sector_of("AAA"), "Tech");
        assert_eq!(sectors.sector_of("ZZZ"), UNKNOWN_SECTOR);
    }

    #[test]
    fn test_sector_map_len() {
        let sectors = SectorMap::default();
        assert!(sectors.is_empty());
        assert_eq!(sectors.sector_of("ANY"), UNKNOWN_SECTOR);
    }

    #[test]
    fn test_batch_universe() {
        let mut batch = WeeklyBatch::default();
        batch.prices.insert("AAA".to_string(), vec![1.0, 2.0]);
        batch.prices.insert("BBB".to_string(), vec![3.0, 4.0]);
        let universe: Vec<_> = batch.universe().cloned().collect();
        assert_eq!(universe, vec!["AAA".to_string(), "BBB".to_string()]);
    }

    #[test]
    fn test_avg_benchmark_return() {
        let mut batch = WeeklyBatch::default();
        assert_eq!(batch.avg_benchmark_return(), 0.0);

        batch.benchmark = Some(
            [("SPY".to_string(), 0.02), ("QQQ".to_string(), 0.04)]
                .into_iter()
                .collect(),
        );
        assert!((batch.avg_benchmark_return() - 0.03).abs() < 1e-12);
    }

    #[test]
    fn test_fundamentals_default() {
        let funda = Fundamentals::default();
        assert_eq!(funda.gpm, 0.0);
        assert_eq!(funda.accruals, 0.0);
        assert_eq!(funda.leverage, 0.0);
    }

    #[test]
    fn test_date_type() {
        use chrono::Datelike;
        let date: Date = Date::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(date.year(), 2024);
    }
}
