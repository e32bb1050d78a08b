//! Data snapshot persistence.
//!
//! A snapshot freezes the four inputs of a run (price panel, EPS panel,
//! latest fundamentals, sector map) under a snapshot id, so any run can
//! be reproduced against the exact data it saw.

use cabarete_traits::{Fundamentals, Panel, Result, SectorMap, Ticker};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// A frozen set of run inputs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Snapshot identifier (also the directory name).
    pub snapshot_id: String,
    /// Weekly close panel.
    pub prices: Panel,
    /// Weekly EPS-estimate panel.
    pub eps: Panel,
    /// Latest fundamentals per ticker.
    pub fundamentals: BTreeMap<Ticker, Fundamentals>,
    /// Ticker-to-sector classification.
    pub sectors: SectorMap,
}

#[derive(Serialize, Deserialize)]
struct Manifest {
    snapshot_id: String,
}

fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    fs::write(path, serde_json::to_string(value)?)?;
    Ok(())
}

/// Write a snapshot under `<base>/<snapshot_id>/`.
///
/// # Errors
///
/// Returns an I/O or serialization error if any file cannot be written.
pub fn write_snapshot(snapshot: &Snapshot, base_dir: &Path) -> Result<PathBuf> {
    let out = base_dir.join(&snapshot.snapshot_id);
    fs::create_dir_all(&out)?;

    write_json(&out.join("prices_by_date.json"), &snapshot.prices)?;
    write_json(&out.join("eps_by_date.json"), &snapshot.eps)?;
    write_json(
        &out.join("fundamentals_latest.json"),
        &snapshot.fundamentals,
    )?;
    write_json(&out.join("sector_map.json"), &snapshot.sectors)?;
    write_json(
        &out.join("manifest.json"),
        &Manifest {
            snapshot_id: snapshot.snapshot_id.clone(),
        },
    )?;
    Ok(out)
}

/// Load a snapshot back from its directory.
///
/// # Errors
///
/// Returns an I/O error when a component file is missing or a
/// serialization error when one does not parse.
pub fn load_snapshot(snapshot_dir: &Path) -> Result<Snapshot> {
    let read = |name: &str| -> Result<String> {
        Ok(fs::read_to_string(snapshot_dir.join(name))?)
    };
    let manifest: Manifest = serde_json::from_str(&read("manifest.json")?)?;
    Ok(Snapshot {
        snapshot_id: manifest.snapshot_id,
        prices: serde_json::from_str(&read("prices_by_date.json")?)?,
        eps: serde_json::from_str(&read("eps_by_date.json")?)?,
        fundamentals: serde_json::from_str(&read("fundamentals_latest.json")?)?,
        sectors: serde_json::from_str(&read("sector_map.json")?)?,
    })
}

/// Snapshot ids present under a base directory, sorted ascending.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be read. A missing base
/// directory yields an empty list.
pub fn list_snapshots(base_dir: &Path) -> Result<Vec<String>> {
    if !base_dir.exists() {
        return Ok(Vec::new());
    }
    let mut ids = Vec::new();
    for entry in fs::read_dir(base_dir)? {
        let path = entry?.path();
        if path.is_dir() {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                ids.push(name.to_string());
            }
        }
    }
    ids.sort();
    Ok(ids)
}
