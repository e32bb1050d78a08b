//! Adaptive factor weighting command.

use anyhow::{Result, anyhow};
use cabarete_combine::{AdaptiveConfig, adaptive_weighting};
use cabarete_eval::next_period_returns;
use cabarete_factors::PanelFactor;
use cabarete_store::{
    RunContext, SystemContext, load_latest_ic_series, load_snapshot, write_json,
};
use cabarete_traits::{Date, FactorStyle};
use std::collections::BTreeMap;
use std::path::Path;

pub(crate) fn run(
    runs_dir: &Path,
    snapshot_dir: Option<&Path>,
    alpha: f64,
    factor_names: &[String],
) -> Result<()> {
    let wanted = (!factor_names.is_empty()).then_some(factor_names);
    let ic_series = load_latest_ic_series(runs_dir, wanted)?;
    if ic_series.is_empty() {
        return Err(anyhow!(
            "no IC telemetry artifacts under {} (run `cabarete telemetry` first)",
            runs_dir.display()
        ));
    }

    // Unrecognized factor names still participate, classified as neutral.
    let styles: Vec<(String, FactorStyle)> = ic_series
        .keys()
        .map(|name| {
            let style = PanelFactor::parse(name)
                .map_or(FactorStyle::Neutral, |factor| factor.style());
            (name.clone(), style)
        })
        .collect();

    let benchmark = match snapshot_dir {
        Some(dir) => Some(benchmark_from_snapshot(dir)?),
        None => None,
    };

    let config = AdaptiveConfig {
        alpha,
        ..Default::default()
    };
    let report = adaptive_weighting(&ic_series, benchmark.as_ref(), &styles, &config);

    let ctx = SystemContext;
    let started = ctx.now();
    let run_path = runs_dir
        .join(started.format("%Y-%m-%d").to_string())
        .join(format!("weights_{}", ctx.new_run_id()));
    let weights_dir = run_path.join("factors").join("weights");

    write_json(&weights_dir.join("ic_ema.json"), &report.ic_ema)?;
    write_json(&weights_dir.join("gates.json"), &report.gates)?;
    write_json(&weights_dir.join("weights.json"), &report.weights)?;
    write_json(&weights_dir.join("contrib.json"), &report.contributions)?;
    write_json(&weights_dir.join("summary.json"), &report.summary)?;
    write_json(
        &run_path.join("run.json"),
        &serde_json::json!({
            "started_at": started.to_rfc3339(),
            "alpha_ic_ema": alpha,
            "factors": styles.iter().map(|(name, _)| name).collect::<Vec<_>>(),
        }),
    )?;

    println!("\nAdaptive factor weighting ({} factors)\n", styles.len());
    for (name, summary) in &report.summary {
        println!(
            "  {name:<18} ic_ema={:>7.4} weight={:>6.3} gate={:>5.2} contrib={:>8.5}",
            summary.ic_ema_mean, summary.avg_weight, summary.avg_gate, summary.avg_contribution
        );
    }
    println!("\nArtifacts: {}", run_path.display());
    Ok(())
}

/// Equal-weight universe return per date, derived from the snapshot's
/// price panel and used as the regime benchmark.
fn benchmark_from_snapshot(snapshot_dir: &Path) -> Result<BTreeMap<Date, f64>> {
    let snapshot = load_snapshot(snapshot_dir)?;
    let returns = next_period_returns(&snapshot.prices);
    Ok(returns
        .into_iter()
        .filter(|(_, row)| !row.is_empty())
        .map(|(date, row)| {
            let mean = row.values().sum::<f64>() / row.len() as f64;
            (date, mean)
        })
        .collect())
}
