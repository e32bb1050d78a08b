//! Demo snapshot generation.

use anyhow::Result;
use cabarete_store::{RunContext, Snapshot, SystemContext, write_snapshot};
use cabarete_traits::{Date, Fundamentals, Panel, Ticker};
use chrono::Duration;
use std::collections::BTreeMap;
use std::path::Path;

const TICKERS: [&str; 3] = ["AAA", "BBB", "CCC"];
const SECTORS: [&str; 3] = ["Tech", "Finance", "Health"];
const BASE_PRICES: [f64; 3] = [50.0, 38.0, 28.0];
const GROWTH: [f64; 3] = [0.011, 0.007, 0.009];
const BASE_EPS: [f64; 3] = [2.0, 1.4, 1.1];
const EPS_TREND: [f64; 3] = [0.02, 0.015, 0.017];

/// Warmup periods the demo prepends so every factor has enough history.
const WARMUP: usize = 13;

/// Generate and persist a synthetic three-ticker snapshot.
pub(crate) fn run(weeks: usize, id: Option<String>, out: &Path) -> Result<()> {
    let ctx = SystemContext;
    let snapshot_id =
        id.unwrap_or_else(|| ctx.now().format("SNAP_%Y%m%d_%H%M%S").to_string());

    let snapshot = build_snapshot(&snapshot_id, weeks);
    let path = write_snapshot(&snapshot, out)?;

    println!("Demo snapshot written");
    println!("  id:     {snapshot_id}");
    println!("  path:   {}", path.display());
    println!(
        "  weeks:  {} ({} warmup + {weeks} tradable)",
        WARMUP + weeks + 1,
        WARMUP
    );
    println!("  names:  {}", TICKERS.join(", "));
    Ok(())
}

/// Deterministic drift-plus-seasonal price and EPS paths, mirroring the
/// toolkit's reference demo data.
fn build_snapshot(snapshot_id: &str, weeks: usize) -> Snapshot {
    let start = Date::from_ymd_opt(2023, 1, 6).unwrap();
    let total_points = WARMUP + weeks + 1;

    let mut prices = Panel::new();
    let mut eps = Panel::new();
    for step in 0..total_points {
        let date = start + Duration::weeks(step as i64);
        let mut price_row = BTreeMap::new();
        let mut eps_row = BTreeMap::new();
        for (idx, ticker) in TICKERS.iter().enumerate() {
            let drift = BASE_PRICES[idx] * (1.0 + GROWTH[idx]).powi(step as i32);
            let seasonal = 1.0 + 0.01 * (step as f64 / 3.0 + (idx + 1) as f64).sin();
            price_row.insert(ticker.to_string(), drift * seasonal);

            let level = BASE_EPS[idx] + EPS_TREND[idx] * step as f64;
            let cycle = 0.04 * (step as f64 / 4.0 + (idx + 1) as f64).cos();
            eps_row.insert(ticker.to_string(), level + cycle);
        }
        prices.insert(date, price_row);
        eps.insert(date, eps_row);
    }

    let fundamentals: BTreeMap<Ticker, Fundamentals> = TICKERS
        .iter()
        .enumerate()
        .map(|(idx, ticker)| {
            (
                ticker.to_string(),
                Fundamentals {
                    gpm: 0.45 + 0.01 * (idx + 1) as f64,
                    accruals: 0.12 + 0.002 * idx as f64,
                    leverage: 0.25 + 0.001 * (TICKERS.len() - idx) as f64,
                },
            )
        })
        .collect();

    let sectors = TICKERS
        .iter()
        .zip(SECTORS)
        .map(|(t, s)| (t.to_string(), s.to_string()))
        .collect();

    Snapshot {
        snapshot_id: snapshot_id.to_string(),
        prices,
        eps,
        fundamentals,
        sectors,
    }
}
