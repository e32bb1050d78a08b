//! Earnings-estimate revision velocity.

use cabarete_traits::{Factor, Ticker, WeeklyBatch};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration for the revision-velocity factor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RevisionConfig {
    /// Short change window in periods.
    pub short: usize,
    /// Long change window in periods; expected to exceed `short`.
    pub long: usize,
}

impl Default for RevisionConfig {
    fn default() -> Self {
        Self { short: 4, long: 12 }
    }
}

/// Short-horizon estimate change minus long-horizon estimate change.
///
/// For each ticker: `(latest - value_at(-1-short)) - (latest - value_at(-1-long))`.
/// Histories shorter than `max(short, long) + 1` score 0.
#[must_use]
pub fn revision_velocity(
    eps: &BTreeMap<Ticker, Vec<f64>>,
    short: usize,
    long: usize,
) -> BTreeMap<Ticker, f64> {
    let window = short.max(long) + 1;
    let mut out = BTreeMap::new();
    for (ticker, series) in eps {
        let n = series.len();
        if n < window {
            out.insert(ticker.clone(), 0.0);
            continue;
        }
        let latest = series[n - 1];
        let short_change = latest - series[n - 1 - short];
        let long_change = latest - series[n - 1 - long];
        out.insert(ticker.clone(), short_change - long_change);
    }
    out
}

/// Revision-velocity factor over the batch's EPS histories.
#[derive(Debug, Clone, Default)]
pub struct RevisionVelocity {
    config: RevisionConfig,
}

impl RevisionVelocity {
    /// Create a revision-velocity factor with the given configuration.
    #[must_use]
    pub const fn new(config: RevisionConfig) -> Self {
        Self { config }
    }
}

impl Factor for RevisionVelocity {
    fn name(&self) -> &str {
        "revisions"
    }

    fn score(&self, batch: &WeeklyBatch) -> BTreeMap<Ticker, f64> {
        revision_velocity(&batch.eps, self.config.short, self.config.long)
    }

    fn lookback(&self) -> usize {
        self.config.short.max(self.config.long) + 1
    }
}
