//! Cue player background task

use tracing::{info, warn};

use crate::services::{CueBackend, CueReceiver};

/// Play queued cues one after another until every notifier is dropped
pub async fn cue_player_task(mut cues: CueReceiver, backend: Box<dyn CueBackend>) {
    info!("Starting cue player task");

    while let Some(cue) = cues.recv().await {
        if let Err(e) = backend.play(cue).await {
            warn!("Skipping {:?} cue: {}", cue, e);
        }
    }

    info!("Cue player stopped");
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::{
        services::{Cue, Notifier},
        state::SoundSettings,
    };

    struct Recording {
        played: Arc<Mutex<Vec<Cue>>>,
        fail_on: Option<Cue>,
    }

    #[async_trait]
    impl CueBackend for Recording {
        async fn play(&self, cue: Cue) -> Result<(), String> {
            if Some(cue) == self.fail_on {
                return Err("audio device missing".to_string());
            }
            self.played.lock().unwrap().push(cue);
            Ok(())
        }
    }

    #[tokio::test]
    async fn backend_failure_skips_only_that_cue() {
        let played = Arc::new(Mutex::new(Vec::new()));
        let (notifier, rx) = Notifier::channel(SoundSettings::default());
        let backend = Recording {
            played: Arc::clone(&played),
            fail_on: Some(Cue::Warning),
        };

        notifier.notify_start();
        notifier.notify_warning();
        notifier.notify_end();
        drop(notifier);

        cue_player_task(rx, Box::new(backend)).await;
        assert_eq!(*played.lock().unwrap(), vec![Cue::Start, Cue::End]);
    }
}
