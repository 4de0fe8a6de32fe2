//! Export and import of tasks and vents as pretty JSON

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::{Task, Vent};
use crate::error::AppResult;

/// Full backup of both collections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub vents: Vec<Vent>,
    pub export_date: DateTime<Utc>,
}

/// Vents-only export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VentExport {
    pub vents: Vec<Vent>,
    pub export_date: DateTime<Utc>,
}

/// `ventask-2026-03-10.json`
pub fn default_filename(now: DateTime<Utc>) -> String {
    format!("ventask-{}.json", now.format("%Y-%m-%d"))
}

/// `ventask-vents-2026-03-10.json`
pub fn default_vents_filename(now: DateTime<Utc>) -> String {
    format!("ventask-vents-{}.json", now.format("%Y-%m-%d"))
}

impl ExportDocument {
    pub fn new(tasks: Vec<Task>, vents: Vec<Vent>, now: DateTime<Utc>) -> Self {
        Self {
            tasks,
            vents,
            export_date: now,
        }
    }

    /// Write to `out`, or the default name in the current directory
    pub fn write(&self, out: Option<&Path>) -> AppResult<PathBuf> {
        let path = out
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(default_filename(self.export_date)));
        debug!(path = %path.display(), "write: called");
        write_pretty(&path, self)?;
        info!(path = %path.display(), tasks = self.tasks.len(), vents = self.vents.len(), "Exported");
        Ok(path)
    }

    /// Read an export back; vents-only exports load with no tasks
    pub fn read(path: &Path) -> AppResult<Self> {
        debug!(path = %path.display(), "read: called");
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl VentExport {
    pub fn new(vents: Vec<Vent>, now: DateTime<Utc>) -> Self {
        Self { vents, export_date: now }
    }

    pub fn write(&self, out: Option<&Path>) -> AppResult<PathBuf> {
        let path = out
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(default_vents_filename(self.export_date)));
        debug!(path = %path.display(), "write: called");
        write_pretty(&path, self)?;
        info!(path = %path.display(), vents = self.vents.len(), "Exported vents");
        Ok(path)
    }
}

fn write_pretty<T: Serialize>(path: &Path, value: &T) -> AppResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(value)?)?;
    Ok(())
}
