//! Backtest command implementation.

use anyhow::{Result, anyhow};
use cabarete_data::batches_from_panels;
use cabarete_eval::{VectorizedWalkForward, WalkForward};
use cabarete_store::{
    RunContext, RunRecord, SystemContext, code_sha, hash_config, load_snapshot, save_run,
    to_metric_map, write_backtest_artifacts, write_json,
};
use cabarete_traits::{BacktestReport, Engine, WeeklyParams};
use std::collections::BTreeMap;
use std::path::Path;

/// Optional parameter overrides from the command line.
pub(crate) struct ParamOverrides {
    pub(crate) top_k: Option<usize>,
    pub(crate) name_cap: Option<f64>,
    pub(crate) sector_cap: Option<f64>,
    pub(crate) cost_bps: Option<f64>,
}

impl ParamOverrides {
    fn apply(&self, mut params: WeeklyParams) -> WeeklyParams {
        if let Some(top_k) = self.top_k {
            params.top_k = top_k;
        }
        if let Some(name_cap) = self.name_cap {
            params.name_cap = name_cap;
        }
        if let Some(sector_cap) = self.sector_cap {
            params.sector_cap = sector_cap;
        }
        if let Some(cost_bps) = self.cost_bps {
            params.cost_bps_week = cost_bps;
        }
        params
    }
}

pub(crate) fn run(
    snapshot_dir: &Path,
    engine_name: &str,
    overrides: ParamOverrides,
    warmup: usize,
    runs_dir: &Path,
    format: &str,
) -> Result<()> {
    let params = overrides.apply(WeeklyParams::default());

    let snapshot = load_snapshot(snapshot_dir)?;
    let batches = batches_from_panels(
        &snapshot.prices,
        &snapshot.eps,
        &snapshot.fundamentals,
        warmup,
        None,
    );
    if batches.is_empty() {
        return Err(anyhow!(
            "snapshot {} has too few dates for warmup {warmup}",
            snapshot.snapshot_id
        ));
    }

    let engine: Box<dyn Engine> = match engine_name {
        "scalar" => Box::new(WalkForward::new(params)?),
        "vectorized" => Box::new(VectorizedWalkForward::new(params)?),
        other => return Err(anyhow!("unknown engine '{other}' (scalar|vectorized)")),
    };

    let ctx = SystemContext;
    let started = ctx.now();
    let run_id = ctx.new_run_id();

    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                   Walk-Forward Backtest                      ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");
    println!("Snapshot: {}", snapshot.snapshot_id);
    println!("Engine:   {}", engine.name());
    println!("Weeks:    {}", batches.len());
    println!("Run id:   {run_id}\n");

    let report = engine.run(&batches, &snapshot.sectors)?;

    let config = serde_json::json!({
        "params": params,
        "engine": engine.name(),
        "warmup": warmup,
        "weeks": batches.len(),
        "data_snapshot_id": snapshot.snapshot_id,
    });

    let record = RunRecord {
        run_id: run_id.clone(),
        code_sha: code_sha(),
        data_snapshot_id: snapshot.snapshot_id.clone(),
        config_hash: hash_config(&config)?,
        started_at: started.to_rfc3339(),
        ended_at: ctx.now().to_rfc3339(),
        metrics: to_metric_map(&report.metrics.as_map()),
        paths: BTreeMap::new(),
    };
    let run_path = save_run(&record, runs_dir)?;
    write_backtest_artifacts(&run_path, &report)?;
    write_json(&run_path.join("config.json"), &config)?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&record.metrics)?);
    } else {
        print_metrics(&report);
    }
    println!("\nArtifacts: {}", run_path.display());
    Ok(())
}

fn print_metrics(report: &BacktestReport) {
    let m = &report.metrics;
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("RESULTS");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    println!("  Sharpe:            {:>10.2}", m.sharpe);
    println!("  Sortino:           {:>10.2}", m.sortino);
    println!("  Alpha (weekly):    {:>10.4}", m.alpha);
    println!("  Beta:              {:>10.2}", m.beta);
    println!("  CAGR:              {:>10.2}%", m.cagr * 100.0);
    println!("  Max Drawdown:      {:>10.2}%", m.max_drawdown * 100.0);
    println!("  Avg Turnover:      {:>10.2}%", m.avg_turnover * 100.0);
    println!("  Terminal Equity:   {:>10.4}", m.terminal_equity);
    println!("  Weeks:             {:>10}", m.total_weeks);
}
