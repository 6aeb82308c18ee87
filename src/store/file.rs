//! JSON-file store in a data directory

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use super::{SnapshotStore, StoreError};
use crate::state::{AppSettings, SettingsPatch, TimerRecord};

const TIMERS_FILE: &str = "stage-timer-data.json";
const SETTINGS_FILE: &str = "stage-timer-settings.json";

/// Stores timers and settings as two JSON files
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read_json<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, StoreError> {
        let path = self.dir.join(name);
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&data)?))
    }

    /// Write to a sibling temp file, then rename over the target
    fn write_json<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(name);
        let tmp = path.with_extension("json.tmp");
        let data = serde_json::to_string_pretty(value)?;
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &path)?;
        debug!("Wrote {}", path.display());
        Ok(())
    }
}

impl SnapshotStore for FileStore {
    fn read_timers(&self) -> Result<Option<Vec<TimerRecord>>, StoreError> {
        self.read_json(TIMERS_FILE)
    }

    fn write_timers(&self, timers: &[TimerRecord]) -> Result<(), StoreError> {
        self.write_json(TIMERS_FILE, timers)
    }

    fn read_settings(&self) -> Result<Option<SettingsPatch>, StoreError> {
        self.read_json(SETTINGS_FILE)
    }

    fn write_settings(&self, settings: &AppSettings) -> Result<(), StoreError> {
        self.write_json(SETTINGS_FILE, settings)
    }
}
