//! Regime gates on factor eligibility.
//!
//! Gates flag dates where a factor should sit out: high-volatility regimes
//! gate off everything that is not defensive, and downtrends additionally
//! gate off momentum factors. Both signals derive from a benchmark weekly
//! return series.

use cabarete_traits::{Date, FactorStyle, stats};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Thresholds and windows for the regime filters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RegimeConfig {
    /// Rolling weekly volatility above this flags a high-vol regime.
    pub high_vol_threshold: f64,
    /// Window (in periods) for the rolling volatility.
    pub vol_window: usize,
    /// Window (in periods) for the trend moving average.
    pub trend_window: usize,
}

impl Default for RegimeConfig {
    fn default() -> Self {
        Self {
            high_vol_threshold: 0.03,
            vol_window: 13,
            trend_window: 26,
        }
    }
}

/// Per-date, per-factor eligibility gates.
///
/// `true` means the factor may carry weight on that date. Before the
/// volatility or trend windows fill, the rolling stats are undefined: an
/// unfilled vol window is treated as calm, while an unfilled trend window
/// is treated as not-uptrend, which keeps momentum gated off during
/// warmup. Explicit `overrides` rows replace the computed gate for the
/// named factors. An empty benchmark series yields an empty gate map
/// (every lookup then defaults to eligible).
#[must_use]
pub fn regime_gates(
    benchmark: &BTreeMap<Date, f64>,
    factors: &[(String, FactorStyle)],
    config: &RegimeConfig,
    overrides: Option<&BTreeMap<Date, BTreeMap<String, bool>>>,
) -> BTreeMap<Date, BTreeMap<String, bool>> {
    if benchmark.is_empty() {
        return BTreeMap::new();
    }

    let dates: Vec<Date> = benchmark.keys().copied().collect();
    let returns: Vec<f64> = benchmark.values().copied().collect();

    let mut equity = Vec::with_capacity(returns.len());
    let mut acc = 1.0;
    for r in &returns {
        acc *= 1.0 + r;
        equity.push(acc);
    }

    let mut out = BTreeMap::new();
    for (i, date) in dates.iter().enumerate() {
        let high_vol = if i + 1 >= config.vol_window {
            let window = &returns[i + 1 - config.vol_window..=i];
            stats::sample_std(window) > config.high_vol_threshold
        } else {
            false
        };
        let uptrend = if i + 1 >= config.trend_window {
            let window = &equity[i + 1 - config.trend_window..=i];
            equity[i] > stats::mean(window)
        } else {
            false
        };

        let mut row = BTreeMap::new();
        for (name, style) in factors {
            let mut open = true;
            if high_vol && *style != FactorStyle::Defensive {
                open = false;
            }
            if !uptrend && *style == FactorStyle::Momentum {
                open = false;
            }
            row.insert(name.clone(), open);
        }

        if let Some(rows) = overrides {
            if let Some(forced) = rows.get(date) {
                for (name, &value) in forced {
                    row.insert(name.clone(), value);
                }
            }
        }
        out.insert(*date, row);
    }
    out
}
