//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{AppSettings, ColorSettings, Timer, TimerPhase};

/// A timer as the floating window renders it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerView {
    pub index: usize,
    pub title: String,
    pub time: u32,
    pub time_remaining: i64,
    pub formatted_time: String,
    pub phase: TimerPhase,
    /// Background color, `None` when the timer is idle
    pub color: Option<String>,
    pub progress: f64,
    pub is_running: bool,
    pub is_archived: bool,
}

impl TimerView {
    pub fn new(index: usize, timer: &Timer, colors: &ColorSettings) -> Self {
        Self {
            index,
            title: timer.title.clone(),
            time: timer.initial_time,
            time_remaining: timer.time_remaining,
            formatted_time: timer.formatted_time(),
            phase: timer.phase(),
            color: timer.color(colors).map(str::to_string),
            progress: timer.progress(),
            is_running: timer.is_running,
            is_archived: timer.is_archived,
        }
    }

    pub fn list(timers: &[Timer], colors: &ColorSettings) -> Vec<Self> {
        timers
            .iter()
            .enumerate()
            .map(|(index, timer)| Self::new(index, timer, colors))
            .collect()
    }
}

/// Response for timer actions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerView,
}

impl ActionResponse {
    pub fn new(status: &str, message: String, timer: TimerView) -> Self {
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            timer,
        }
    }
}

/// Current board as shown by the floating window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimersResponse {
    pub timers: Vec<TimerView>,
    pub running: Option<usize>,
    pub timestamp: DateTime<Utc>,
}

/// Request body for adding a timer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTimerRequest {
    pub title: String,
    pub time: u32,
}

/// Result of saving an editor snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveResponse {
    pub status: String,
    pub timer_count: usize,
    pub persisted: bool,
    /// Retryable notice shown by the editor when persistence failed
    pub notice: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Editor session state change
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorResponse {
    pub open: bool,
    pub already_open: bool,
    pub timestamp: DateTime<Utc>,
}

/// Daemon status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub settings: AppSettings,
    pub timer_count: usize,
    pub running: Option<usize>,
    pub editor_open: bool,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
