//! Stage Timer - A floating countdown-timer daemon
//!
//! This library provides the timer model, the once-per-second update loop
//! with its audio cue notifications, and the snapshot bridge used by the
//! settings editor to read and replace the live timers.

pub mod config;
pub mod state;
pub mod api;
pub mod services;
pub mod store;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::AppState;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
