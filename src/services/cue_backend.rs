//! Playback backends for audio cues

use std::{io::Write, time::Duration};

use async_trait::async_trait;
use clap::ValueEnum;
use tokio::time::sleep;
use tracing::{debug, info};

use super::notifier::{Cue, TONE_GAP_MS};

/// Something that can render a cue. Failures are reported, never fatal.
#[async_trait]
pub trait CueBackend: Send + Sync {
    async fn play(&self, cue: Cue) -> Result<(), String>;
}

/// Backend selection from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CueBackendKind {
    /// Log each cue and its tone pattern
    Log,
    /// Ring the terminal bell once per tone
    Bell,
    /// Discard cues
    Mute,
}

impl CueBackendKind {
    pub fn build(self) -> Box<dyn CueBackend> {
        match self {
            CueBackendKind::Log => Box::new(LogBackend),
            CueBackendKind::Bell => Box::new(BellBackend),
            CueBackendKind::Mute => Box::new(MuteBackend),
        }
    }
}

#[derive(Debug, Default)]
pub struct LogBackend;

#[async_trait]
impl CueBackend for LogBackend {
    async fn play(&self, cue: Cue) -> Result<(), String> {
        let tones: Vec<String> = cue
            .pattern()
            .iter()
            .map(|t| format!("{}Hz/{}ms", t.frequency_hz, t.duration_ms))
            .collect();
        info!("[CUE] {:?}: {}", cue, tones.join(" "));
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct BellBackend;

#[async_trait]
impl CueBackend for BellBackend {
    async fn play(&self, cue: Cue) -> Result<(), String> {
        debug!("Ringing bell for {:?} cue", cue);
        let pattern = cue.pattern();
        for (i, tone) in pattern.iter().enumerate() {
            if tone.delay_ms > 0 {
                sleep(Duration::from_millis(u64::from(tone.delay_ms))).await;
            }
            let mut stdout = std::io::stdout();
            stdout
                .write_all(b"\x07")
                .and_then(|_| stdout.flush())
                .map_err(|e| format!("Failed to ring terminal bell: {}", e))?;
            sleep(Duration::from_millis(u64::from(tone.duration_ms))).await;
            if i + 1 < pattern.len() {
                sleep(Duration::from_millis(TONE_GAP_MS)).await;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MuteBackend;

#[async_trait]
impl CueBackend for MuteBackend {
    async fn play(&self, _cue: Cue) -> Result<(), String> {
        Ok(())
    }
}
