//! Walk-forward batch assembly from snapshot panels.

use cabarete_traits::{Date, Fundamentals, Panel, Ticker, WeeklyBatch};
use std::collections::BTreeMap;

/// Benchmark key used when batches carry an explicit benchmark series.
pub const BENCHMARK_KEY: &str = "BENCHMARK";

/// Build one [`WeeklyBatch`] per rebalance date from wide-by-date panels.
///
/// Starting after `warmup` periods, each batch carries the price and EPS
/// history up to and including its date, the latest fundamentals
/// snapshot, and realized next-period returns taken from the following
/// price row. The final price date has no next period and produces no
/// batch, so a panel of `n` dates yields `n - warmup - 1` batches (never
/// negative).
///
/// The batch benchmark is the entry of `benchmark` at the batch's date
/// when provided, otherwise the equal-weight mean of the universe's
/// next-period returns.
#[must_use]
pub fn batches_from_panels(
    prices: &Panel,
    eps: &Panel,
    fundamentals: &BTreeMap<Ticker, Fundamentals>,
    warmup: usize,
    benchmark: Option<&BTreeMap<Date, f64>>,
) -> Vec<WeeklyBatch> {
    let dates: Vec<Date> = prices.keys().copied().collect();
    let rows: Vec<&BTreeMap<Ticker, f64>> = prices.values().collect();
    if dates.len() < warmup + 2 {
        return Vec::new();
    }

    let mut batches = Vec::with_capacity(dates.len() - warmup - 1);
    for week in warmup..dates.len() - 1 {
        let as_of = dates[week];

        let mut price_history: BTreeMap<Ticker, Vec<f64>> = BTreeMap::new();
        for ticker in rows[week].keys() {
            let series: Vec<f64> = rows[..=week]
                .iter()
                .filter_map(|row| row.get(ticker).copied())
                .collect();
            price_history.insert(ticker.clone(), series);
        }

        let mut eps_history: BTreeMap<Ticker, Vec<f64>> = BTreeMap::new();
        for (_, eps_row) in eps.range(..=as_of) {
            for (ticker, &value) in eps_row {
                eps_history.entry(ticker.clone()).or_default().push(value);
            }
        }

        let mut next_returns = BTreeMap::new();
        for (ticker, &now) in rows[week] {
            if let Some(&next) = rows[week + 1].get(ticker) {
                if now != 0.0 {
                    next_returns.insert(ticker.clone(), next / now - 1.0);
                }
            }
        }

        let bench_return = benchmark
            .and_then(|series| series.get(&as_of).copied())
            .unwrap_or_else(|| {
                if next_returns.is_empty() {
                    0.0
                } else {
                    next_returns.values().sum::<f64>() / next_returns.len() as f64
                }
            });

        batches.push(WeeklyBatch {
            prices: price_history,
            eps: eps_history,
            fundamentals: fundamentals.clone(),
            next_returns,
            benchmark: Some([(BENCHMARK_KEY.to_string(), bench_return)].into()),
        });
    }
    batches
}
