//! Once-per-second timer update loop

use std::{sync::Arc, time::Duration};
use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, error, info};

use crate::state::AppState;

/// Background task that advances the live timers once per period
pub async fn update_loop_task(state: Arc<AppState>, period: Duration) {
    info!("Starting timer update loop ({}ms period)", period.as_millis());

    // first trigger one full period after start
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        match state.tick() {
            Ok(events) if !events.is_empty() => {
                debug!("Tick dispatched {} notifications", events.len());
            }
            Ok(_) => {}
            Err(e) => error!("Timer tick failed: {}", e),
        }
    }
}

/// Handle to the running update loop. Starting again replaces the previous loop.
#[derive(Debug)]
pub struct UpdateLoop {
    period: Duration,
    handle: Option<JoinHandle<()>>,
}

impl UpdateLoop {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            handle: None,
        }
    }

    /// Spawn the loop, aborting any loop this handle already started
    pub fn start(&mut self, state: Arc<AppState>) {
        self.stop();
        let period = self.period;
        self.handle = Some(tokio::spawn(update_loop_task(state, period)));
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            info!("Timer update loop stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for UpdateLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        services::{Cue, Notifier},
        state::{AppSettings, Timer},
        store::MemoryStore,
    };

    fn state_with(remaining: i64) -> (Arc<AppState>, crate::services::CueReceiver) {
        let settings = AppSettings::default();
        let (notifier, rx) = Notifier::channel(settings.sounds);
        let state = AppState::new(
            vec![Timer::with_state("Talk", 600, Some(remaining), false, false)],
            settings,
            notifier,
            Arc::new(MemoryStore::default()),
            0,
            "127.0.0.1".to_string(),
        );
        (Arc::new(state), rx)
    }

    fn remaining(state: &AppState) -> i64 {
        state.get_timers().unwrap()[0].time_remaining
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period() {
        let (state, _rx) = state_with(100);
        state.toggle_timer(0).unwrap();

        let mut update_loop = UpdateLoop::new(Duration::from_secs(1));
        update_loop.start(Arc::clone(&state));
        assert!(update_loop.is_running());

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(remaining(&state), 100);

        tokio::time::sleep(Duration::from_millis(3000)).await;
        assert_eq!(remaining(&state), 97);
    }

    #[tokio::test(start_paused = true)]
    async fn restarting_does_not_double_tick() {
        let (state, _rx) = state_with(100);
        state.toggle_timer(0).unwrap();

        let mut update_loop = UpdateLoop::new(Duration::from_secs(1));
        update_loop.start(Arc::clone(&state));
        tokio::time::sleep(Duration::from_millis(1500)).await;
        update_loop.start(Arc::clone(&state));
        tokio::time::sleep(Duration::from_millis(3500)).await;

        // one tick before the restart, three after
        assert_eq!(remaining(&state), 96);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_halts_ticking() {
        let (state, _rx) = state_with(100);
        state.toggle_timer(0).unwrap();

        let mut update_loop = UpdateLoop::new(Duration::from_secs(1));
        update_loop.start(Arc::clone(&state));
        tokio::time::sleep(Duration::from_millis(2500)).await;
        update_loop.stop();
        assert!(!update_loop.is_running());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(remaining(&state), 98);
    }

    #[tokio::test(start_paused = true)]
    async fn loop_fires_warning_cue() {
        let (state, mut rx) = state_with(62);
        state.toggle_timer(0).unwrap();
        assert_eq!(rx.try_recv().ok(), Some(Cue::Start));

        let mut update_loop = UpdateLoop::new(Duration::from_secs(1));
        update_loop.start(Arc::clone(&state));
        tokio::time::sleep(Duration::from_millis(2500)).await;

        assert_eq!(rx.try_recv().ok(), Some(Cue::Warning));
        assert!(rx.try_recv().is_err());
    }
}
