//! Main application state management

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Instant,
};
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::{
    AppSettings, BoardError, ImportOutcome, Snapshot, SnapshotPatch, Timer, TimerBoard, TimerEvent,
};
use crate::{
    services::Notifier,
    store::{self, SnapshotStore},
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to lock {0}")]
    Lock(&'static str),
    #[error(transparent)]
    Board(#[from] BoardError),
}

fn lock<'a, T>(mutex: &'a Mutex<T>, what: &'static str) -> Result<MutexGuard<'a, T>, AppError> {
    mutex.lock().map_err(|e| {
        warn!("Failed to lock {}: {}", what, e);
        AppError::Lock(what)
    })
}

/// Process-scoped controller owning the live timers, the settings and the notifier.
///
/// Created once in `main` and shared as `Arc<AppState>` with the update loop
/// and the HTTP API. The editor only reaches the live board through
/// [`AppState::export_snapshot`] and [`AppState::import_snapshot`].
pub struct AppState {
    /// Live timers and their notification edge tracking
    pub board: Mutex<TimerBoard>,
    pub settings: Mutex<AppSettings>,
    pub notifier: Notifier,
    pub store: Arc<dyn SnapshotStore>,
    /// Whether a settings editor session is open
    pub editor_open: Mutex<bool>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
}

impl AppState {
    pub fn new(
        timers: Vec<Timer>,
        settings: AppSettings,
        notifier: Notifier,
        store: Arc<dyn SnapshotStore>,
        port: u16,
        host: String,
    ) -> Self {
        notifier.update_sounds(settings.sounds);
        Self {
            board: Mutex::new(TimerBoard::new(timers)),
            settings: Mutex::new(settings),
            notifier,
            store,
            editor_open: Mutex::new(false),
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
        }
    }

    fn record_action(&self, action: String) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action);
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Advance every running timer by one second and dispatch resulting cues.
    /// Cues are only queued here, so the tick never waits on audio.
    pub fn tick(&self) -> Result<Vec<TimerEvent>, AppError> {
        let events = lock(&self.board, "timer board")?.tick();
        for event in &events {
            info!("Timer event: {:?}", event);
            self.notifier.dispatch(*event);
        }
        Ok(events)
    }

    /// Pause the timer if running, otherwise start it and pause every other timer
    pub fn toggle_timer(&self, index: usize) -> Result<Timer, AppError> {
        let (event, timer) = {
            let mut board = lock(&self.board, "timer board")?;
            let event = board.toggle(index)?;
            let timer = board.get(index).cloned().ok_or(BoardError::NotFound(index))?;
            (event, timer)
        };

        match event {
            Some(event) => {
                info!("Started timer {} '{}' at {}", index, timer.title, timer.formatted_time());
                self.notifier.dispatch(event);
                self.record_action(format!("start:{index}"));
            }
            None => {
                info!("Paused timer {} '{}' at {}", index, timer.title, timer.formatted_time());
                self.record_action(format!("pause:{index}"));
            }
        }
        Ok(timer)
    }

    pub fn reset_timer(&self, index: usize) -> Result<Timer, AppError> {
        let timer = self.edit_timer(index, |board| board.reset(index))?;
        info!("Reset timer {} '{}'", index, timer.title);
        self.record_action(format!("reset:{index}"));
        Ok(timer)
    }

    pub fn archive_timer(&self, index: usize) -> Result<Timer, AppError> {
        let timer = self.edit_timer(index, |board| board.archive(index))?;
        info!("Archived timer {} '{}'", index, timer.title);
        self.record_action(format!("archive:{index}"));
        self.persist_timers();
        Ok(timer)
    }

    pub fn unarchive_timer(&self, index: usize) -> Result<Timer, AppError> {
        let timer = self.edit_timer(index, |board| board.unarchive(index))?;
        info!("Unarchived timer {} '{}'", index, timer.title);
        self.record_action(format!("unarchive:{index}"));
        self.persist_timers();
        Ok(timer)
    }

    /// Append an idle timer and return its index
    pub fn add_timer(&self, title: String, initial_time: u32) -> Result<usize, AppError> {
        let index = lock(&self.board, "timer board")?.add(Timer::new(title.clone(), initial_time));
        info!("Added timer {} '{}' ({}s)", index, title, initial_time);
        self.record_action(format!("add:{index}"));
        self.persist_timers();
        Ok(index)
    }

    pub fn remove_timer(&self, index: usize) -> Result<Timer, AppError> {
        let timer = lock(&self.board, "timer board")?.remove(index)?;
        info!("Removed timer {} '{}'", index, timer.title);
        self.record_action(format!("remove:{index}"));
        self.persist_timers();
        Ok(timer)
    }

    fn edit_timer<F>(&self, index: usize, edit: F) -> Result<Timer, AppError>
    where
        F: FnOnce(&mut TimerBoard) -> Result<(), BoardError>,
    {
        let mut board = lock(&self.board, "timer board")?;
        edit(&mut board)?;
        Ok(board.get(index).cloned().ok_or(BoardError::NotFound(index))?)
    }

    /// Current timers, cloned
    pub fn get_timers(&self) -> Result<Vec<Timer>, AppError> {
        Ok(lock(&self.board, "timer board")?.timers().to_vec())
    }

    pub fn get_settings(&self) -> Result<AppSettings, AppError> {
        Ok(lock(&self.settings, "settings")?.clone())
    }

    /// Disconnected copy of settings and timers for the editor
    pub fn export_snapshot(&self) -> Result<Snapshot, AppError> {
        let board = lock(&self.board, "timer board")?;
        let settings = lock(&self.settings, "settings")?;
        Ok(Snapshot {
            settings: settings.clone(),
            timers: board.records(),
        })
    }

    /// Apply an editor submission.
    ///
    /// Settings merge key by key. Timers, when present, replace the whole live
    /// collection and edge tracking is rebuilt from the incoming values. The
    /// result is then saved; a save failure leaves the live state as imported.
    pub fn import_snapshot(&self, patch: SnapshotPatch) -> Result<ImportOutcome, AppError> {
        let (settings, timers) = {
            let mut board = lock(&self.board, "timer board")?;
            let mut settings = lock(&self.settings, "settings")?;

            if let Some(settings_patch) = patch.settings {
                settings.merge(settings_patch);
            }
            if let Some(records) = patch.timers {
                board.replace(records.into_iter().map(Timer::from).collect());
                info!("Replaced live timers with {} imported timers", board.len());
            }
            (settings.clone(), board.timers().to_vec())
        };

        self.notifier.update_sounds(settings.sounds);
        self.record_action("import".to_string());

        let persisted = store::save_timers(self.store.as_ref(), &timers)
            & store::save_settings(self.store.as_ref(), &settings);

        Ok(ImportOutcome {
            timer_count: timers.len(),
            persisted,
        })
    }

    /// Save the current timers, logging failures
    pub fn persist_timers(&self) -> bool {
        match self.get_timers() {
            Ok(timers) => store::save_timers(self.store.as_ref(), &timers),
            Err(e) => {
                warn!("Skipping timer save: {}", e);
                false
            }
        }
    }

    /// Save timers and settings, logging failures
    pub fn persist(&self) -> bool {
        let timers_saved = self.persist_timers();
        let settings_saved = match self.get_settings() {
            Ok(settings) => store::save_settings(self.store.as_ref(), &settings),
            Err(e) => {
                warn!("Skipping settings save: {}", e);
                false
            }
        };
        timers_saved && settings_saved
    }

    /// Mark the editor open; returns `true` if it already was
    pub fn open_editor(&self) -> Result<bool, AppError> {
        let mut open = lock(&self.editor_open, "editor session")?;
        let was_open = std::mem::replace(&mut *open, true);
        if was_open {
            debug!("Editor already open");
        } else {
            info!("Editor opened");
        }
        Ok(was_open)
    }

    /// Mark the editor closed; returns `true` if it was open
    pub fn close_editor(&self) -> Result<bool, AppError> {
        let was_open = std::mem::replace(&mut *lock(&self.editor_open, "editor session")?, false);
        if was_open {
            info!("Editor closed");
        }
        Ok(was_open)
    }

    pub fn is_editor_open(&self) -> bool {
        self.editor_open.lock().map(|open| *open).unwrap_or(false)
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
