//! Plain-data snapshots exchanged with the editor window

use serde::{Deserialize, Serialize};

use super::{settings::SettingsPatch, AppSettings, TimerRecord};

/// Full, disconnected copy of the live settings and timers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub settings: AppSettings,
    pub timers: Vec<TimerRecord>,
}

/// Editor submission; either half may be omitted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotPatch {
    #[serde(default)]
    pub settings: Option<SettingsPatch>,
    #[serde(default)]
    pub timers: Option<Vec<TimerRecord>>,
}

/// Outcome of importing a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOutcome {
    /// Number of live timers after the import
    pub timer_count: usize,
    /// Whether the new state reached the store
    pub persisted: bool,
}
