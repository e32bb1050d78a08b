//! Information Coefficient math.
//!
//! The IC is the cross-sectional Spearman rank correlation between factor
//! scores and realized next-period returns: the toolkit's measure of a
//! factor's predictive skill on one date.

use cabarete_traits::{Date, Panel, Ticker};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cross-sectional Spearman IC for one date.
///
/// Pairs are taken over the key intersection of the two maps with
/// non-finite values dropped; fewer than two usable pairs yields NaN.
/// Ties receive average ranks.
#[must_use]
pub fn spearman_ic(
    scores: &BTreeMap<Ticker, f64>,
    next_returns: &BTreeMap<Ticker, f64>,
) -> f64 {
    let pairs: Vec<(f64, f64)> = scores
        .iter()
        .filter_map(|(ticker, &s)| {
            next_returns.get(ticker).and_then(|&r| {
                (s.is_finite() && r.is_finite()).then_some((s, r))
            })
        })
        .collect();

    if pairs.len() < 2 {
        return f64::NAN;
    }

    let score_ranks = average_ranks(&pairs.iter().map(|(s, _)| *s).collect::<Vec<_>>());
    let return_ranks = average_ranks(&pairs.iter().map(|(_, r)| *r).collect::<Vec<_>>());
    rank_correlation(&score_ranks, &return_ranks)
}

/// Per-date IC series over the date intersection of two panels.
#[must_use]
pub fn ic_series(scores: &Panel, next_returns: &Panel) -> BTreeMap<Date, f64> {
    scores
        .iter()
        .filter_map(|(date, row)| {
            next_returns
                .get(date)
                .map(|returns| (*date, spearman_ic(row, returns)))
        })
        .collect()
}

/// Next-period return per date per ticker, aligned to the earlier date:
/// the value at `t` is `px(t+1) / px(t) - 1`. The final date has no next
/// period and is omitted.
#[must_use]
pub fn next_period_returns(prices: &Panel) -> Panel {
    let dates: Vec<Date> = prices.keys().copied().collect();
    let rows: Vec<&BTreeMap<Ticker, f64>> = prices.values().collect();

    let mut out = Panel::new();
    for i in 0..dates.len().saturating_sub(1) {
        let mut row = BTreeMap::new();
        for (ticker, &now) in rows[i] {
            if let Some(&next) = rows[i + 1].get(ticker) {
                if now != 0.0 {
                    row.insert(ticker.clone(), next / now - 1.0);
                }
            }
        }
        out.insert(dates[i], row);
    }
    out
}

/// Summary statistics of an IC time series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IcSummary {
    /// Number of finite IC observations.
    pub n: usize,
    /// Mean IC.
    pub mean: f64,
    /// Sample standard deviation of the IC.
    pub std: f64,
    /// Information ratio: mean / std.
    pub ir: f64,
    /// t-statistic of the mean IC.
    pub t_stat: f64,
}

/// Summarize an IC series, dropping non-finite observations first.
#[must_use]
pub fn ic_summary(series: &BTreeMap<Date, f64>) -> IcSummary {
    let finite: Vec<f64> = series.values().copied().filter(|v| v.is_finite()).collect();
    let n = finite.len();
    if n == 0 {
        return IcSummary {
            n: 0,
            mean: f64::NAN,
            std: f64::NAN,
            ir: f64::NAN,
            t_stat: f64::NAN,
        };
    }
    let mean = finite.iter().sum::<f64>() / n as f64;
    let std = if n > 1 {
        let var =
            finite.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        var.sqrt()
    } else {
        f64::NAN
    };
    let (ir, t_stat) = if std.is_finite() && std != 0.0 {
        (mean / std, mean / (std / (n as f64).sqrt()))
    } else {
        (f64::NAN, f64::NAN)
    };
    IcSummary {
        n,
        mean,
        std,
        ir,
        t_stat,
    }
}

/// Ranks with ties averaged, e.g. `[1, 2, 2, 3] -> [0, 1.5, 1.5, 3]`.
fn average_ranks(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut indexed: Vec<(usize, f64)> = values.iter().copied().enumerate().collect();
    indexed.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j < n && (indexed[j].1 - indexed[i].1).abs() < f64::EPSILON {
            j += 1;
        }
        let avg_rank = (i + j - 1) as f64 / 2.0;
        for entry in &indexed[i..j] {
            ranks[entry.0] = avg_rank;
        }
        i = j;
    }
    ranks
}

/// Pearson correlation of two rank vectors.
fn rank_correlation(ranks_x: &[f64], ranks_y: &[f64]) -> f64 {
    let x = Array1::from_vec(ranks_x.to_vec());
    let y = Array1::from_vec(ranks_y.to_vec());
    let n = x.len();
    if n < 2 {
        return f64::NAN;
    }

    let mean_x = x.mean().unwrap_or(0.0);
    let mean_y = y.mean().unwrap_or(0.0);
    let dx = &x - mean_x;
    let dy = &y - mean_y;

    let cov = dx.dot(&dy);
    let var_x = dx.dot(&dx);
    let var_y = dy.dot(&dy);
    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    cov / (var_x.sqrt() * var_y.sqrt())
}
