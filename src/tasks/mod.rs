//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod cue_player;
pub mod update_loop;

// Re-export main functions
pub use cue_player::cue_player_task;
pub use update_loop::{update_loop_task, UpdateLoop};
