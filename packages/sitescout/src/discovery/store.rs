//! Discovery record persistence.
//!
//! One JSON file per run, named `{family}_discovery_{timestamp}.json`.
//! Records are immutable once persisted and are never deleted on failure.

use std::path::{Path, PathBuf};

use crate::error::{Result, ScoutError};
use crate::sites::SiteId;
use crate::types::discovery::DiscoveryRecord;

/// Timestamp format with filename-safe characters.
const FILE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H-%M-%S";

/// Persist a record, returning the path it was written to.
pub fn save_record(dir: &Path, record: &DiscoveryRecord) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| ScoutError::io(dir, e))?;

    let timestamp = record.timestamp.format(FILE_TIMESTAMP_FORMAT);
    let path = dir.join(format!("{}_discovery_{timestamp}.json", record.site));

    let json = serde_json::to_string_pretty(record)?;
    std::fs::write(&path, json).map_err(|e| ScoutError::io(&path, e))?;

    tracing::info!(path = %path.display(), "discovery record saved");
    Ok(path)
}

/// Load a record from a file.
pub fn load_record(path: &Path) -> Result<DiscoveryRecord> {
    let json = std::fs::read_to_string(path).map_err(|e| ScoutError::io(path, e))?;
    Ok(serde_json::from_str(&json)?)
}

/// Most recent record file for a family, by sorted filename.
pub fn latest_record(dir: &Path, site: SiteId) -> Result<Option<PathBuf>> {
    if !dir.exists() {
        return Ok(None);
    }

    let prefix = format!("{site}_discovery_");
    let mut candidates: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(|e| ScoutError::io(dir, e))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(&prefix) && n.ends_with(".json"))
        })
        .collect();

    candidates.sort();
    Ok(candidates.pop())
}
