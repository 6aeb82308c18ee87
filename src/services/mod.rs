//! External collaborator services
//!
//! This module contains the audio cue notifier and the backends that play cues.

pub mod cue_backend;
pub mod notifier;

// Re-export main types
pub use cue_backend::{BellBackend, CueBackend, CueBackendKind, LogBackend, MuteBackend};
pub use notifier::{Cue, CueReceiver, Notifier, Tone};
