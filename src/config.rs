//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};

use clap::Parser;
use directories::ProjectDirs;

use crate::services::CueBackendKind;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "stage-timer")]
#[command(about = "Floating stage-timer daemon with color states and audio cues")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Directory holding the saved timers and settings
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Default timer list used when no session was saved (bundled list if omitted)
    #[arg(long)]
    pub defaults: Option<PathBuf>,

    /// Keep timers and settings in memory only
    #[arg(long)]
    pub ephemeral: bool,

    /// Update loop period in milliseconds
    #[arg(long, default_value = "1000", value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_ms: u64,

    /// How audio cues are played
    #[arg(long, value_enum, default_value = "log")]
    pub cues: CueBackendKind,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Explicit data dir, else the platform data dir, else the working directory
    pub fn data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        ProjectDirs::from("dev", "stage-timer", "stage-timer")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
