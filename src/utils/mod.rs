//! Process-level helpers
//!
//! Signal handling used to stop the server and save timers on exit.

pub mod signals;

pub use signals::shutdown_signal;
