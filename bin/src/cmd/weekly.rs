//! Single weekly step command.

use anyhow::{Result, anyhow};
use cabarete_data::batches_from_panels;
use cabarete_eval::run_weekly;
use cabarete_store::load_snapshot;
use cabarete_traits::WeeklyParams;
use std::path::Path;

pub(crate) fn run(snapshot_dir: &Path, top_k: Option<usize>, warmup: usize) -> Result<()> {
    let mut params = WeeklyParams::default();
    if let Some(top_k) = top_k {
        params.top_k = top_k;
    }

    let snapshot = load_snapshot(snapshot_dir)?;
    let batches = batches_from_panels(
        &snapshot.prices,
        &snapshot.eps,
        &snapshot.fundamentals,
        warmup,
        None,
    );
    let Some(batch) = batches.last() else {
        return Err(anyhow!(
            "snapshot {} has too few dates for warmup {warmup}",
            snapshot.snapshot_id
        ));
    };

    let outcome = run_weekly(batch, &snapshot.sectors, &params)?;

    println!("\nWeekly step on snapshot {}\n", snapshot.snapshot_id);
    println!("Holdings ({} names):", outcome.breadth);
    for (ticker, weight) in &outcome.weights {
        println!("  {ticker:<8} {:>8.4}", weight);
    }
    println!();
    for (name, value) in outcome.as_map() {
        println!("  {name:<14} {value:>12.6}");
    }
    Ok(())
}
