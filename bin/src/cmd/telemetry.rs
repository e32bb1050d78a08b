//! Factor IC telemetry command.

use anyhow::{Result, anyhow};
use cabarete_eval::factor_ic_telemetry;
use cabarete_factors::PanelFactor;
use cabarete_store::{
    MetricValue, RunContext, SystemContext, code_sha, load_snapshot, write_ic_series, write_json,
};
use std::collections::BTreeMap;
use std::path::Path;

pub(crate) fn run(snapshot_dir: &Path, factor_names: &[String], runs_dir: &Path) -> Result<()> {
    let factors: Vec<PanelFactor> = if factor_names.is_empty() {
        PanelFactor::ALL.to_vec()
    } else {
        factor_names
            .iter()
            .map(|name| {
                PanelFactor::parse(name).ok_or_else(|| anyhow!("unknown factor '{name}'"))
            })
            .collect::<Result<_>>()?
    };

    let snapshot = load_snapshot(snapshot_dir)?;
    let telemetry = factor_ic_telemetry(
        &snapshot.prices,
        &snapshot.eps,
        &snapshot.fundamentals,
        &factors,
    );

    let ctx = SystemContext;
    let started = ctx.now();
    let run_id = ctx.new_run_id();
    let run_path = runs_dir
        .join(started.format("%Y-%m-%d").to_string())
        .join(&run_id);
    let factors_dir = run_path.join("factors");

    let run_meta = serde_json::json!({
        "run_id": run_id,
        "code_sha": code_sha(),
        "data_snapshot_id": snapshot.snapshot_id,
        "started_at": started.to_rfc3339(),
        "factors": factors.iter().map(|f| f.name()).collect::<Vec<_>>(),
    });
    write_json(&run_path.join("run.json"), &run_meta)?;

    println!("\nFactor IC telemetry on snapshot {}\n", snapshot.snapshot_id);
    for factor in &factors {
        let name = factor.name();
        let series = &telemetry.ic_series[name];
        let summary = &telemetry.summaries[name];

        let summary_map: BTreeMap<String, MetricValue> = [
            ("n".to_string(), MetricValue(summary.n as f64)),
            ("ic_mean".to_string(), MetricValue(summary.mean)),
            ("ic_std".to_string(), MetricValue(summary.std)),
            ("ir".to_string(), MetricValue(summary.ir)),
            ("tstat".to_string(), MetricValue(summary.t_stat)),
        ]
        .into();
        write_ic_series(&factors_dir, name, series, &summary_map)?;

        println!(
            "  {name:<18} n={:<4} mean={:>7.4} ir={:>7.4}",
            summary.n, summary.mean, summary.ir
        );
    }
    println!("\nArtifacts: {}", run_path.display());
    Ok(())
}
