//! In-memory store for ephemeral runs

use std::sync::Mutex;

use super::{SnapshotStore, StoreError};
use crate::state::{AppSettings, SettingsPatch, TimerRecord};

#[derive(Debug, Default)]
pub struct MemoryStore {
    timers: Mutex<Option<Vec<TimerRecord>>>,
    settings: Mutex<Option<AppSettings>>,
}

fn poisoned<T>(e: std::sync::PoisonError<T>) -> StoreError {
    std::io::Error::other(format!("memory store lock poisoned: {e}")).into()
}

impl SnapshotStore for MemoryStore {
    fn read_timers(&self) -> Result<Option<Vec<TimerRecord>>, StoreError> {
        Ok(self.timers.lock().map_err(poisoned)?.clone())
    }

    fn write_timers(&self, timers: &[TimerRecord]) -> Result<(), StoreError> {
        *self.timers.lock().map_err(poisoned)? = Some(timers.to_vec());
        Ok(())
    }

    fn read_settings(&self) -> Result<Option<SettingsPatch>, StoreError> {
        let Some(settings) = self.settings.lock().map_err(poisoned)?.clone() else {
            return Ok(None);
        };
        let patch = serde_json::from_value(serde_json::to_value(settings)?)?;
        Ok(Some(patch))
    }

    fn write_settings(&self, settings: &AppSettings) -> Result<(), StoreError> {
        *self.settings.lock().map_err(poisoned)? = Some(settings.clone());
        Ok(())
    }
}
