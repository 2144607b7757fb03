//! Persistence of the last reported values.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::PluginResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastValues {
    /// Unix time in seconds when the values were emitted.
    pub timestamp: i64,
    pub values: BTreeMap<String, f64>,
}

pub fn load(path: &Path) -> PluginResult<Option<LastValues>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path)?;
    let state = serde_json::from_str::<LastValues>(&contents)?;
    Ok(Some(state))
}

/// Write `state` to `path`.
///
/// The JSON goes to a sibling file first and is renamed over `path`, so a
/// concurrent reader sees either the previous contents or the new ones.
pub fn save(path: &Path, state: &LastValues) -> PluginResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let contents = serde_json::to_string_pretty(state)?;
    let staging = staging_path(path);
    std::fs::write(&staging, contents)?;
    if let Err(err) = std::fs::rename(&staging, path) {
        let _ = std::fs::remove_file(&staging);
        return Err(err.into());
    }
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
