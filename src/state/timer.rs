//! Timer entity and its persisted record shape

use serde::{Deserialize, Serialize};

use super::settings::ColorSettings;

/// Seconds at or below which a running timer is in its warning window
pub const WARNING_THRESHOLD_SECS: i64 = 60;

/// Presentation phase of a timer, derived from its fields on every read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerPhase {
    Idle,
    Running,
    Warning,
    Overtime,
}

impl TimerPhase {
    /// Phase for a given running flag and remaining seconds
    pub fn derive(is_running: bool, time_remaining: i64) -> Self {
        if !is_running {
            TimerPhase::Idle
        } else if time_remaining < 0 {
            TimerPhase::Overtime
        } else if time_remaining <= WARNING_THRESHOLD_SECS {
            TimerPhase::Warning
        } else {
            TimerPhase::Running
        }
    }
}

impl std::fmt::Display for TimerPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TimerPhase::Idle => "idle",
            TimerPhase::Running => "running",
            TimerPhase::Warning => "warning",
            TimerPhase::Overtime => "overtime",
        };
        write!(f, "{label}")
    }
}

/// A single countdown timer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timer {
    pub title: String,
    pub initial_time: u32,
    pub time_remaining: i64,
    pub is_running: bool,
    pub is_archived: bool,
}

impl Timer {
    /// Create an idle timer with the full duration remaining
    pub fn new(title: impl Into<String>, initial_time: u32) -> Self {
        Self::with_state(title, initial_time, None, false, false)
    }

    /// Create a timer with explicit state; `time_remaining` falls back to `initial_time`
    pub fn with_state(
        title: impl Into<String>,
        initial_time: u32,
        time_remaining: Option<i64>,
        is_running: bool,
        is_archived: bool,
    ) -> Self {
        Self {
            title: title.into(),
            initial_time,
            time_remaining: time_remaining.unwrap_or(i64::from(initial_time)),
            // an archived timer never runs
            is_running: is_running && !is_archived,
            is_archived,
        }
    }

    /// Consume one second if running. No lower bound.
    pub fn tick(&mut self) {
        if self.is_running {
            self.time_remaining -= 1;
        }
    }

    pub fn start(&mut self) {
        self.is_running = true;
    }

    pub fn pause(&mut self) {
        self.is_running = false;
    }

    pub fn toggle(&mut self) {
        self.is_running = !self.is_running;
    }

    /// Restore the full duration and stop
    pub fn reset(&mut self) {
        self.time_remaining = i64::from(self.initial_time);
        self.is_running = false;
    }

    /// Hide the timer; archiving always pauses
    pub fn archive(&mut self) {
        self.is_archived = true;
        self.is_running = false;
    }

    pub fn unarchive(&mut self) {
        self.is_archived = false;
    }

    /// Remaining time as `[-]MM:SS`; minutes are not clamped
    pub fn formatted_time(&self) -> String {
        let sign = if self.time_remaining < 0 { "-" } else { "" };
        let abs = self.time_remaining.unsigned_abs();
        format!("{sign}{:02}:{:02}", abs / 60, abs % 60)
    }

    pub fn phase(&self) -> TimerPhase {
        TimerPhase::derive(self.is_running, self.time_remaining)
    }

    /// Display color for the current phase, `None` when idle (transparent)
    pub fn color<'a>(&self, colors: &'a ColorSettings) -> Option<&'a str> {
        match self.phase() {
            TimerPhase::Idle => None,
            TimerPhase::Running => Some(&colors.running),
            TimerPhase::Warning => Some(&colors.warning),
            TimerPhase::Overtime => Some(&colors.overtime),
        }
    }

    /// Fraction of the configured duration still remaining, in `[0, 1]`
    pub fn progress(&self) -> f64 {
        if self.initial_time == 0 {
            return 0.0;
        }
        (self.time_remaining as f64 / f64::from(self.initial_time)).clamp(0.0, 1.0)
    }

    pub fn to_record(&self) -> TimerRecord {
        TimerRecord {
            title: self.title.clone(),
            time: self.initial_time,
            time_remaining: self.time_remaining,
            is_running: self.is_running,
            is_archived: self.is_archived,
        }
    }

    pub fn from_record(record: &TimerRecord) -> Self {
        Self::with_state(
            record.title.clone(),
            record.time,
            Some(record.time_remaining),
            record.is_running,
            record.is_archived,
        )
    }
}

impl From<TimerRecord> for Timer {
    fn from(record: TimerRecord) -> Self {
        Self::from_record(&record)
    }
}

/// Persisted and exchanged timer shape. `time` is the on-disk name for the initial duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawTimerRecord")]
pub struct TimerRecord {
    pub title: String,
    pub time: u32,
    pub time_remaining: i64,
    pub is_running: bool,
    pub is_archived: bool,
}

/// Lenient input shape: accepts `initialTime` from older editors and a missing `timeRemaining`
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTimerRecord {
    title: String,
    #[serde(default)]
    time: Option<u32>,
    #[serde(default)]
    initial_time: Option<u32>,
    #[serde(default)]
    time_remaining: Option<i64>,
    #[serde(default)]
    is_running: bool,
    #[serde(default)]
    is_archived: bool,
}

impl TryFrom<RawTimerRecord> for TimerRecord {
    type Error = String;

    fn try_from(raw: RawTimerRecord) -> Result<Self, Self::Error> {
        let time = raw
            .time
            .or(raw.initial_time)
            .ok_or_else(|| format!("timer '{}' has no duration", raw.title))?;

        Ok(Self {
            title: raw.title,
            time,
            time_remaining: raw.time_remaining.unwrap_or(i64::from(time)),
            is_running: raw.is_running && !raw.is_archived,
            is_archived: raw.is_archived,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(seconds: i64) -> Timer {
        Timer::with_state("Talk", 600, Some(seconds), true, false)
    }

    #[test]
    fn tick_decrements_without_floor() {
        let mut timer = running(2);
        for _ in 0..5 {
            timer.tick();
        }
        assert_eq!(timer.time_remaining, -3);
    }

    #[test]
    fn tick_is_noop_when_paused() {
        let mut timer = Timer::new("Talk", 90);
        timer.tick();
        assert_eq!(timer.time_remaining, 90);
    }

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(running(125).formatted_time(), "02:05");
        assert_eq!(running(-65).formatted_time(), "-01:05");
        assert_eq!(running(0).formatted_time(), "00:00");
        assert_eq!(running(-1).formatted_time(), "-00:01");
        assert_eq!(running(6000).formatted_time(), "100:00");
    }

    #[test]
    fn reset_restores_duration_and_stops() {
        let mut timer = running(-40);
        timer.reset();
        assert_eq!(timer.time_remaining, 600);
        assert!(!timer.is_running);
    }

    #[test]
    fn archive_force_pauses_and_unarchive_keeps_paused() {
        let mut timer = running(100);
        timer.archive();
        assert!(timer.is_archived);
        assert!(!timer.is_running);

        timer.unarchive();
        assert!(!timer.is_archived);
        assert!(!timer.is_running);
    }

    #[test]
    fn toggle_flips_running() {
        let mut timer = Timer::new("Q&A", 300);
        timer.toggle();
        assert!(timer.is_running);
        timer.toggle();
        assert!(!timer.is_running);
    }

    #[test]
    fn phase_follows_thresholds() {
        assert_eq!(Timer::new("a", 100).phase(), TimerPhase::Idle);
        assert_eq!(running(61).phase(), TimerPhase::Running);
        assert_eq!(running(60).phase(), TimerPhase::Warning);
        assert_eq!(running(0).phase(), TimerPhase::Warning);
        assert_eq!(running(-1).phase(), TimerPhase::Overtime);
    }

    #[test]
    fn color_is_none_when_idle() {
        let colors = ColorSettings::default();
        assert_eq!(Timer::new("a", 10).color(&colors), None);
        assert_eq!(running(10).color(&colors), Some(colors.warning.as_str()));
        assert_eq!(running(-10).color(&colors), Some(colors.overtime.as_str()));
    }

    #[test]
    fn progress_is_clamped() {
        assert_eq!(running(300).progress(), 0.5);
        assert_eq!(running(-5).progress(), 0.0);
        assert_eq!(Timer::new("zero", 0).progress(), 0.0);
    }

    #[test]
    fn record_round_trip_preserves_every_field() {
        let timers = [
            Timer::new("Setup", 600),
            running(-12),
            Timer::with_state("Old", 45, Some(3), false, true),
        ];
        for timer in timers {
            assert_eq!(Timer::from_record(&timer.to_record()), timer);
        }
    }

    #[test]
    fn record_serializes_initial_time_as_time() {
        let json = serde_json::to_value(running(42).to_record()).unwrap();
        assert_eq!(json["time"], 600);
        assert_eq!(json["timeRemaining"], 42);
        assert_eq!(json["isRunning"], true);
        assert_eq!(json["isArchived"], false);
        assert!(json.get("initialTime").is_none());
    }

    #[test]
    fn record_accepts_legacy_keys_and_defaults() {
        let record: TimerRecord =
            serde_json::from_str(r#"{"title":"Break","initialTime":900}"#).unwrap();
        assert_eq!(record.time, 900);
        assert_eq!(record.time_remaining, 900);
        assert!(!record.is_running);
        assert!(!record.is_archived);

        let both: TimerRecord = serde_json::from_str(
            r#"{"title":"x","time":30,"initialTime":99,"timeRemaining":null,"isRunning":true}"#,
        )
        .unwrap();
        assert_eq!(both.time, 30);
        assert_eq!(both.time_remaining, 30);
        assert!(both.is_running);
    }

    #[test]
    fn record_without_duration_is_rejected() {
        assert!(serde_json::from_str::<TimerRecord>(r#"{"title":"x"}"#).is_err());
        assert!(serde_json::from_str::<TimerRecord>(r#"{"title":"x","time":-5}"#).is_err());
    }

    #[test]
    fn archived_record_never_loads_running() {
        let record: TimerRecord = serde_json::from_str(
            r#"{"title":"x","time":30,"isRunning":true,"isArchived":true}"#,
        )
        .unwrap();
        assert!(!Timer::from(record).is_running);
    }
}
