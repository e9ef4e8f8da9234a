use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::dataset::DatasetRow;

const SNAPSHOT_VERSION: u32 = 1;

/// Whole-table snapshot used for both checkpointing and final output.
/// Always rewritten in full; a restart recomputes and loses at most one
/// checkpoint interval of progress.
#[derive(Debug, Serialize, Deserialize)]
struct TableSnapshot {
    version: u32,
    written_at: String,
    rows: Vec<DatasetRow>,
}

pub fn write_full(path: &Path, rows: &[DatasetRow]) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("create output dir {}", dir.display()))?;
    }

    let snapshot = TableSnapshot {
        version: SNAPSHOT_VERSION,
        written_at: Utc::now().to_rfc3339(),
        rows: rows.to_vec(),
    };
    let json = serde_json::to_string(&snapshot).context("serialize table snapshot")?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("write snapshot {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("swap snapshot into {}", path.display()))?;
    Ok(())
}

pub fn read_full(path: &Path) -> Result<Vec<DatasetRow>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read snapshot {}", path.display()))?;
    let snapshot =
        serde_json::from_str::<TableSnapshot>(&raw).context("decode table snapshot")?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(anyhow!(
            "snapshot version {} unsupported (expected {})",
            snapshot.version,
            SNAPSHOT_VERSION
        ));
    }
    Ok(snapshot.rows)
}

/// Final write: the full table plus chronological train/test splits with
/// no shuffling. The first 30% of rows land in the test file, the rest
/// in the train file.
pub fn write_with_splits(path: &Path, rows: &[DatasetRow]) -> Result<()> {
    write_full(path, rows)?;

    let split = (rows.len() * 3) / 10;
    let (test, train) = rows.split_at(split);
    write_full(&sibling_with_suffix(path, "_test"), test)?;
    write_full(&sibling_with_suffix(path, "_train"), train)?;
    Ok(())
}

fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("dataset");
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("json");
    path.with_file_name(format!("{stem}{suffix}.{ext}"))
}
