//! State management module
//!
//! This module contains the timer entity, the live timer board, the display
//! settings and the controller that owns them.

pub mod app_state;
pub mod board;
pub mod settings;
pub mod snapshot;
pub mod timer;

// Re-export main types
pub use app_state::{AppError, AppState};
pub use board::{BoardError, EdgeState, TimerBoard, TimerEvent};
pub use settings::{AppSettings, ColorPatch, ColorSettings, SettingsPatch, SoundPatch, SoundSettings};
pub use snapshot::{ImportOutcome, Snapshot, SnapshotPatch};
pub use timer::{Timer, TimerPhase, TimerRecord};
