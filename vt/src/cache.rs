//! Local JSON cache
//!
//! Mirrors the last-known collections and user settings as
//! `ventask_<key>.json` files so the app keeps working when the store is
//! unavailable.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{Task, Vent};
use crate::error::AppResult;

const KEY_PREFIX: &str = "ventask_";
const TASKS_KEY: &str = "tasks";
const VENTS_KEY: &str = "vents";
const SETTINGS_KEY: &str = "settings";
const DRAFT_KEY: &str = "draft";

/// User settings kept beside the cached collections
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_key: Option<String>,
    pub provider: Option<String>,
    pub custom_prompt: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LocalCache {
    dir: PathBuf,
}

impl LocalCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}{}.json", KEY_PREFIX, key))
    }

    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> AppResult<()> {
        debug!(%key, "save: called");
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path(key), serde_json::to_string(value)?)?;
        Ok(())
    }

    /// `None` when nothing has been cached under `key`
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        debug!(%key, "load: called");
        match fs::read_to_string(self.path(key)) {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn remove(&self, key: &str) -> AppResult<()> {
        debug!(%key, "remove: called");
        match fs::remove_file(self.path(key)) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }

    // === Collections ===

    /// Best-effort mirror; a failed write is logged, not raised
    pub fn mirror_tasks(&self, tasks: &[Task]) {
        if let Err(e) = self.save(TASKS_KEY, tasks) {
            warn!(error = %e, "Failed to cache tasks");
        }
    }

    pub fn mirror_vents(&self, vents: &[Vent]) {
        if let Err(e) = self.save(VENTS_KEY, vents) {
            warn!(error = %e, "Failed to cache vents");
        }
    }

    pub fn tasks(&self) -> AppResult<Vec<Task>> {
        Ok(self.load(TASKS_KEY)?.unwrap_or_default())
    }

    pub fn vents(&self) -> AppResult<Vec<Vent>> {
        Ok(self.load(VENTS_KEY)?.unwrap_or_default())
    }

    // === Settings and draft ===

    pub fn settings(&self) -> AppResult<Settings> {
        Ok(self.load(SETTINGS_KEY)?.unwrap_or_default())
    }

    pub fn save_settings(&self, settings: &Settings) -> AppResult<()> {
        self.save(SETTINGS_KEY, settings)
    }

    pub fn draft(&self) -> AppResult<Option<String>> {
        self.load(DRAFT_KEY)
    }

    /// Store the in-progress vent text; blank text clears it
    pub fn save_draft(&self, text: &str) -> AppResult<()> {
        if text.trim().is_empty() {
            self.remove(DRAFT_KEY)
        } else {
            self.save(DRAFT_KEY, text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Recurrence;
    use chrono::Utc;
    use tempfile::tempdir;

    #[test]
    fn test_file_naming() {
        let temp = tempdir().unwrap();
        let cache = LocalCache::new(temp.path());
        cache.save("probe", &42).unwrap();
        assert!(temp.path().join("ventask_probe.json").exists());
        assert_eq!(cache.load::<i32>("probe").unwrap(), Some(42));

        cache.remove("probe").unwrap();
        cache.remove("probe").unwrap();
        assert_eq!(cache.load::<i32>("probe").unwrap(), None);
    }

    #[test]
    fn test_collections_mirror() {
        let temp = tempdir().unwrap();
        let cache = LocalCache::new(temp.path().join("nested"));
        assert!(cache.tasks().unwrap().is_empty());

        let now = Utc::now();
        let tasks = vec![Task::with_id("t1", "Stretch", Recurrence::Daily, now)];
        cache.mirror_tasks(&tasks);
        cache.mirror_vents(&[Vent::new("jams", now)]);

        assert_eq!(cache.tasks().unwrap(), tasks);
        assert_eq!(cache.vents().unwrap()[0].text, "jams");
    }

    #[test]
    fn test_settings_and_draft() {
        let temp = tempdir().unwrap();
        let cache = LocalCache::new(temp.path());
        assert_eq!(cache.settings().unwrap(), Settings::default());

        let settings = Settings {
            api_key: Some("sk-test".to_string()),
            provider: Some("anthropic".to_string()),
            custom_prompt: None,
        };
        cache.save_settings(&settings).unwrap();
        assert_eq!(cache.settings().unwrap(), settings);

        cache.save_draft("half a thought").unwrap();
        assert_eq!(cache.draft().unwrap().as_deref(), Some("half a thought"));
        cache.save_draft("  ").unwrap();
        assert!(cache.draft().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("ventask_tasks.json"), "not json").unwrap();
        let cache = LocalCache::new(temp.path());
        assert!(cache.tasks().is_err());
    }
}
