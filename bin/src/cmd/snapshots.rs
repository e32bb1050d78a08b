//! Snapshot listing command.

use anyhow::Result;
use cabarete_store::list_snapshots;
use std::path::Path;

pub(crate) fn run(dir: &Path) -> Result<()> {
    let ids = list_snapshots(dir)?;
    if ids.is_empty() {
        println!("No snapshots under {}", dir.display());
        return Ok(());
    }
    println!("Snapshots under {}:", dir.display());
    for id in ids {
        println!("  {id}");
    }
    Ok(())
}
