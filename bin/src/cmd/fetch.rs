//! Snapshot fetch command.

use anyhow::Result;
use cabarete_data::MarketDataClient;
use cabarete_store::{RunContext, Snapshot, SystemContext, write_snapshot};
use std::path::Path;

pub(crate) async fn run(
    symbols: &[String],
    from: &str,
    to: &str,
    id: Option<String>,
    out: &Path,
) -> Result<()> {
    let ctx = SystemContext;
    let snapshot_id =
        id.unwrap_or_else(|| ctx.now().format("SNAP_%Y%m%d_%H%M%S").to_string());
    let symbol_refs: Vec<&str> = symbols.iter().map(String::as_str).collect();

    let client = MarketDataClient::from_env()?;
    println!("Fetching {} symbols from {from} to {to}...", symbols.len());

    let (prices, eps, fundamentals, sectors) =
        client.snapshot_inputs(&symbol_refs, from, to, 40).await?;

    let snapshot = Snapshot {
        snapshot_id: snapshot_id.clone(),
        prices,
        eps,
        fundamentals,
        sectors,
    };
    let path = write_snapshot(&snapshot, out)?;

    println!("Snapshot written");
    println!("  id:    {snapshot_id}");
    println!("  path:  {}", path.display());
    println!("  dates: {}", snapshot.prices.len());
    Ok(())
}
