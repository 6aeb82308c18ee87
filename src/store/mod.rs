//! Timer and settings persistence
//!
//! The store collaborator is abstracted behind [`SnapshotStore`]. Loading never
//! fails: each source falls through to the next, ending at a hard-coded list.
//! Saving is best-effort and only logs on failure.

pub mod file;
pub mod memory;

use std::path::Path;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::state::{AppSettings, SettingsPatch, Timer, TimerRecord};

pub use file::FileStore;
pub use memory::MemoryStore;

/// Default timer list shipped with the binary
pub const BUNDLED_TIMERS: &str = include_str!("../../assets/timers.json");

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persistence collaborator for the previous session's timers and settings
pub trait SnapshotStore: Send + Sync {
    /// `Ok(None)` when nothing has been saved yet
    fn read_timers(&self) -> Result<Option<Vec<TimerRecord>>, StoreError>;
    fn write_timers(&self, timers: &[TimerRecord]) -> Result<(), StoreError>;
    fn read_settings(&self) -> Result<Option<SettingsPatch>, StoreError>;
    fn write_settings(&self, settings: &AppSettings) -> Result<(), StoreError>;
}

/// Where the default timer list comes from when no session was saved
#[derive(Debug, Clone, Copy)]
pub enum DefaultsSource<'a> {
    Bundled,
    File(&'a Path),
}

impl DefaultsSource<'_> {
    fn read(&self) -> Result<Vec<TimerRecord>, StoreError> {
        let records = match self {
            DefaultsSource::Bundled => serde_json::from_str(BUNDLED_TIMERS)?,
            DefaultsSource::File(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        };
        Ok(records)
    }
}

/// Last-resort timers used when every other source fails
pub fn fallback_timers() -> Vec<Timer> {
    vec![
        Timer::new("Presentation", 1800),
        Timer::new("Q&A", 300),
        Timer::new("Break", 900),
        Timer::new("Setup", 600),
    ]
}

/// Load timers from the saved session, then the defaults, then the fallback list
pub fn load_timers(store: &dyn SnapshotStore, defaults: DefaultsSource<'_>) -> Vec<Timer> {
    match store.read_timers() {
        Ok(Some(records)) if !records.is_empty() => {
            info!("Restored {} timers from previous session", records.len());
            return records.into_iter().map(Timer::from).collect();
        }
        Ok(Some(_)) => debug!("Saved timer list is empty, trying defaults"),
        Ok(None) => debug!("No saved timers, trying defaults"),
        Err(e) => warn!("Failed to read saved timers: {}", e),
    }

    match defaults.read() {
        Ok(records) if !records.is_empty() => {
            info!("Loaded {} default timers ({:?})", records.len(), defaults);
            return records.into_iter().map(Timer::from).collect();
        }
        Ok(_) => warn!("Default timer list ({:?}) is empty", defaults),
        Err(e) => warn!("Failed to load default timers ({:?}): {}", defaults, e),
    }

    info!("Using built-in fallback timers");
    fallback_timers()
}

/// Persist the full ordered timer list, logging failures
pub fn save_timers(store: &dyn SnapshotStore, timers: &[Timer]) -> bool {
    let records: Vec<TimerRecord> = timers.iter().map(Timer::to_record).collect();
    match store.write_timers(&records) {
        Ok(()) => {
            debug!("Saved {} timers", records.len());
            true
        }
        Err(e) => {
            warn!("Failed to save timers: {}", e);
            false
        }
    }
}

/// Saved settings merged over the defaults
pub fn load_settings(store: &dyn SnapshotStore) -> AppSettings {
    match store.read_settings() {
        Ok(Some(patch)) => AppSettings::from_patch(patch),
        Ok(None) => AppSettings::default(),
        Err(e) => {
            warn!("Failed to read saved settings, using defaults: {}", e);
            AppSettings::default()
        }
    }
}

pub fn save_settings(store: &dyn SnapshotStore, settings: &AppSettings) -> bool {
    match store.write_settings(settings) {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to save settings: {}", e);
            false
        }
    }
}
