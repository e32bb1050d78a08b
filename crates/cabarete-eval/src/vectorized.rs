//! Array-based walk-forward engine variant.
//!
//! Cross-sections are held in `ndarray` vectors and the top-K cut is taken
//! against a rank-quantile threshold instead of an explicit rank-and-slice.
//! The quantile cut can disagree with the scalar engine at tie boundaries
//! and when the universe size is not evenly divisible by `top_k`; the
//! scalar [`WalkForward`](crate::WalkForward) is authoritative where they
//! differ. Both engines share the period loop, cap passes, and metrics.

use crate::backtest::simulate;
use cabarete_factors::{Momentum, QualityComposite, RevisionVelocity};
use cabarete_portfolio::{cap_by_name, cap_by_sector};
use cabarete_traits::{
    BacktestReport, Engine, Factor, Result, SectorMap, Ticker, WeeklyBatch, WeeklyParams,
    stats::MIN_STD_THRESHOLD,
};
use ndarray::Array1;
use std::collections::BTreeMap;

/// Vectorized engine with quantile-threshold top-K selection.
#[derive(Debug, Clone)]
pub struct VectorizedWalkForward {
    params: WeeklyParams,
}

impl VectorizedWalkForward {
    /// Create a vectorized engine, validating the configuration up front.
    ///
    /// # Errors
    ///
    /// Returns an input-validation error for out-of-range parameters.
    pub fn new(params: WeeklyParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    fn weigh(&self, batch: &WeeklyBatch, sectors: &SectorMap) -> BTreeMap<Ticker, f64> {
        let universe: Vec<Ticker> = batch.universe().cloned().collect();
        if universe.is_empty() {
            return BTreeMap::new();
        }

        let mom = score_array(&universe, &Momentum::default().score(batch));
        let rev = score_array(&universe, &RevisionVelocity::default().score(batch));
        let qual = score_array(&universe, &QualityComposite::default().score(batch));

        let composite = self.params.w_mom * &sector_zscore_array(&mom, &universe, sectors)
            + self.params.w_rev * &sector_zscore_array(&rev, &universe, sectors)
            + self.params.w_qual * &sector_zscore_array(&qual, &universe, sectors);

        let selected = quantile_select(&composite, self.params.top_k);
        if selected.is_empty() {
            return BTreeMap::new();
        }
        let weight = 1.0 / selected.len() as f64;
        let preliminary: BTreeMap<Ticker, f64> = selected
            .into_iter()
            .map(|idx| (universe[idx].clone(), weight))
            .collect();

        let capped = cap_by_name(&preliminary, self.params.name_cap);
        cap_by_sector(&capped, sectors, self.params.sector_cap)
    }
}

impl Engine for VectorizedWalkForward {
    fn name(&self) -> &str {
        "vectorized"
    }

    fn run(&self, batches: &[WeeklyBatch], sectors: &SectorMap) -> Result<BacktestReport> {
        simulate(batches, &self.params, |batch| self.weigh(batch, sectors))
    }
}

/// Dense score vector in universe order; missing tickers score 0.
fn score_array(universe: &[Ticker], scores: &BTreeMap<Ticker, f64>) -> Array1<f64> {
    Array1::from_iter(
        universe
            .iter()
            .map(|t| scores.get(t).copied().unwrap_or(0.0)),
    )
}

/// Sector z-score over a dense vector, matching the map-based
/// neutralization: groups of fewer than two members or with ~zero variance
/// collapse to 0.
fn sector_zscore_array(
    values: &Array1<f64>,
    universe: &[Ticker],
    sectors: &SectorMap,
) -> Array1<f64> {
    let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (idx, ticker) in universe.iter().enumerate() {
        groups.entry(sectors.sector_of(ticker)).or_default().push(idx);
    }

    let mut out = Array1::zeros(values.len());
    for indices in groups.values() {
        if indices.len() < 2 {
            continue;
        }
        let group = Array1::from_iter(indices.iter().map(|&i| values[i]));
        let mean = group.mean().unwrap_or(0.0);
        let std = group.std(1.0);
        if std < MIN_STD_THRESHOLD {
            continue;
        }
        for &i in indices {
            out[i] = (values[i] - mean) / std;
        }
    }
    out
}

/// Indices whose percentile rank clears the `1 - k/n` quantile threshold.
fn quantile_select(composite: &Array1<f64>, top_k: usize) -> Vec<usize> {
    let n = composite.len();
    if n == 0 {
        return Vec::new();
    }

    // Percentile ranks via stable ascending argsort.
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        composite[a]
            .partial_cmp(&composite[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let mut ranks = vec![0.0; n];
    for (pos, &idx) in order.iter().enumerate() {
        ranks[idx] = (pos + 1) as f64 / n as f64;
    }

    let level = (1.0 - top_k.max(1) as f64 / n as f64).clamp(0.0, 1.0);
    let threshold = linear_quantile(&ranks, level);

    (0..n).filter(|&i| ranks[i] >= threshold - 1e-12).collect()
}

/// Linearly interpolated quantile of a sample.
fn linear_quantile(values: &[f64], level: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let position = level * (sorted.len() - 1) as f64;
    let lo = position.floor() as usize;
    let hi = position.ceil() as usize;
    let frac = position - lo as f64;
    sorted[lo] * (1.0 - frac) + sorted[hi] * frac
}
