//! Audio cue notifier
//!
//! The notifier never plays anything itself. It checks the sound flags and
//! queues a [`Cue`] for the cue player task, so callers never wait on audio.

use std::sync::{Arc, Mutex};

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::state::{SoundSettings, TimerEvent};

/// One step of a cue pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tone {
    pub frequency_hz: u32,
    pub duration_ms: u32,
    /// Pause before this tone starts
    pub delay_ms: u32,
}

const fn tone(frequency_hz: u32, duration_ms: u32, delay_ms: u32) -> Tone {
    Tone {
        frequency_hz,
        duration_ms,
        delay_ms,
    }
}

/// Gap inserted between consecutive tones of a pattern
pub const TONE_GAP_MS: u64 = 50;

const START_PATTERN: [Tone; 3] = [tone(440, 150, 0), tone(554, 150, 0), tone(659, 200, 0)];
const END_PATTERN: [Tone; 3] = [tone(800, 300, 0), tone(600, 300, 0), tone(400, 400, 0)];
const WARNING_PATTERN: [Tone; 2] = [tone(880, 200, 0), tone(880, 200, 100)];
const OVERTIME_PATTERN: [Tone; 4] = [
    tone(1000, 100, 0),
    tone(1000, 100, 80),
    tone(1000, 100, 80),
    tone(1000, 100, 80),
];

/// The four acoustically distinct cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    Start,
    End,
    Warning,
    Overtime,
}

impl Cue {
    pub fn pattern(self) -> &'static [Tone] {
        match self {
            Cue::Start => &START_PATTERN,
            Cue::End => &END_PATTERN,
            Cue::Warning => &WARNING_PATTERN,
            Cue::Overtime => &OVERTIME_PATTERN,
        }
    }

    fn enabled(self, sounds: &SoundSettings) -> bool {
        match self {
            Cue::Start => sounds.timer_start,
            Cue::End => sounds.timer_end,
            Cue::Warning => sounds.warning,
            Cue::Overtime => sounds.overtime,
        }
    }
}

impl From<TimerEvent> for Cue {
    fn from(event: TimerEvent) -> Self {
        match event {
            TimerEvent::Started { .. } => Cue::Start,
            TimerEvent::Warning { .. } => Cue::Warning,
            TimerEvent::Ended { .. } => Cue::End,
            TimerEvent::Overtime { .. } => Cue::Overtime,
        }
    }
}

/// Receiving end drained by the cue player task
pub type CueReceiver = mpsc::UnboundedReceiver<Cue>;

/// Fire-and-forget cue dispatcher gated by the sound settings
#[derive(Debug, Clone)]
pub struct Notifier {
    sounds: Arc<Mutex<SoundSettings>>,
    tx: mpsc::UnboundedSender<Cue>,
}

impl Notifier {
    /// Create a notifier and the receiver its cues are delivered to
    pub fn channel(sounds: SoundSettings) -> (Self, CueReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        let notifier = Self {
            sounds: Arc::new(Mutex::new(sounds)),
            tx,
        };
        (notifier, rx)
    }

    pub fn notify_start(&self) {
        self.notify(Cue::Start);
    }

    pub fn notify_end(&self) {
        self.notify(Cue::End);
    }

    pub fn notify_warning(&self) {
        self.notify(Cue::Warning);
    }

    pub fn notify_overtime(&self) {
        self.notify(Cue::Overtime);
    }

    pub fn dispatch(&self, event: TimerEvent) {
        self.notify(Cue::from(event));
    }

    /// Queue a cue if enabled. Never blocks and never fails the caller.
    pub fn notify(&self, cue: Cue) {
        let enabled = match self.sounds.lock() {
            Ok(sounds) => cue.enabled(&sounds),
            Err(e) => {
                warn!("Failed to lock sound settings, skipping {:?} cue: {}", cue, e);
                return;
            }
        };
        if !enabled {
            debug!("{:?} cue disabled", cue);
            return;
        }
        if let Err(e) = self.tx.send(cue) {
            warn!("Cue player unavailable, skipping {:?} cue: {}", e.0, e);
        }
    }

    pub fn update_sounds(&self, sounds: SoundSettings) {
        match self.sounds.lock() {
            Ok(mut current) => *current = sounds,
            Err(e) => warn!("Failed to lock sound settings: {}", e),
        }
    }

    pub fn sounds(&self) -> Option<SoundSettings> {
        self.sounds.lock().ok().map(|s| *s)
    }
}
