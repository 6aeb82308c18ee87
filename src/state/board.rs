//! Live timer collection with per-timer notification edge tracking

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use super::timer::{Timer, TimerRecord, WARNING_THRESHOLD_SECS};

/// Notification-worthy transitions produced by the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimerEvent {
    Started { index: usize },
    Warning { index: usize },
    Ended { index: usize },
    Overtime { index: usize },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("no timer at index {0}")]
    NotFound(usize),
    #[error("timer at index {0} is archived")]
    Archived(usize),
}

/// Remembers which notifications already fired for one timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeState {
    pub time_remaining: i64,
    pub was_warning: bool,
    pub was_overtime: bool,
}

impl EdgeState {
    /// Flags say "already past this threshold" for the given remaining time
    pub fn derive(time_remaining: i64) -> Self {
        Self {
            time_remaining,
            was_warning: time_remaining <= WARNING_THRESHOLD_SECS,
            was_overtime: time_remaining < 0,
        }
    }
}

/// Timers plus their edge state, always the same length
#[derive(Debug, Clone, Default)]
pub struct TimerBoard {
    timers: Vec<Timer>,
    edges: Vec<EdgeState>,
}

impl TimerBoard {
    pub fn new(timers: Vec<Timer>) -> Self {
        let mut board = Self::default();
        board.replace(timers);
        board
    }

    pub fn from_records(records: &[TimerRecord]) -> Self {
        Self::new(records.iter().map(Timer::from_record).collect())
    }

    /// Swap in a whole new collection and rebuild edge tracking from it
    pub fn replace(&mut self, timers: Vec<Timer>) {
        self.edges = timers
            .iter()
            .map(|timer| EdgeState::derive(timer.time_remaining))
            .collect();
        self.timers = timers;
    }

    pub fn timers(&self) -> &[Timer] {
        &self.timers
    }

    pub fn get(&self, index: usize) -> Option<&Timer> {
        self.timers.get(index)
    }

    pub fn edge(&self, index: usize) -> Option<&EdgeState> {
        self.edges.get(index)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn running_count(&self) -> usize {
        self.timers.iter().filter(|t| t.is_running).count()
    }

    pub fn records(&self) -> Vec<TimerRecord> {
        self.timers.iter().map(Timer::to_record).collect()
    }

    /// Advance every running timer by one second and report crossed thresholds
    pub fn tick(&mut self) -> Vec<TimerEvent> {
        let mut events = Vec::new();

        for (index, timer) in self.timers.iter_mut().enumerate() {
            let Some(prev) = self.edges.get_mut(index) else {
                continue;
            };

            timer.tick();

            if timer.is_running {
                let remaining = timer.time_remaining;

                if remaining == WARNING_THRESHOLD_SECS && !prev.was_warning {
                    prev.was_warning = true;
                    events.push(TimerEvent::Warning { index });
                }
                if remaining == 0 && prev.time_remaining > 0 {
                    events.push(TimerEvent::Ended { index });
                }
                if remaining == -1 && !prev.was_overtime {
                    prev.was_overtime = true;
                    events.push(TimerEvent::Overtime { index });
                }
            }

            prev.time_remaining = timer.time_remaining;
        }

        if !events.is_empty() {
            debug!("Tick produced events: {:?}", events);
        }
        events
    }

    /// Pause a running timer, or start it exclusively.
    /// Returns `Started` when the timer was started.
    pub fn toggle(&mut self, index: usize) -> Result<Option<TimerEvent>, BoardError> {
        let timer = self.timers.get(index).ok_or(BoardError::NotFound(index))?;
        let (is_running, is_archived) = (timer.is_running, timer.is_archived);

        if is_running {
            self.timers[index].pause();
            return Ok(None);
        }
        if is_archived {
            return Err(BoardError::Archived(index));
        }

        for timer in &mut self.timers {
            timer.pause();
        }
        let timer = &mut self.timers[index];
        timer.start();
        self.edges[index] = EdgeState::derive(timer.time_remaining);

        Ok(Some(TimerEvent::Started { index }))
    }

    pub fn reset(&mut self, index: usize) -> Result<(), BoardError> {
        let timer = self.timers.get_mut(index).ok_or(BoardError::NotFound(index))?;
        timer.reset();
        self.edges[index] = EdgeState::derive(timer.time_remaining);
        Ok(())
    }

    pub fn archive(&mut self, index: usize) -> Result<(), BoardError> {
        self.timers
            .get_mut(index)
            .ok_or(BoardError::NotFound(index))?
            .archive();
        Ok(())
    }

    pub fn unarchive(&mut self, index: usize) -> Result<(), BoardError> {
        self.timers
            .get_mut(index)
            .ok_or(BoardError::NotFound(index))?
            .unarchive();
        Ok(())
    }

    /// Append a new idle timer, returning its index
    pub fn add(&mut self, timer: Timer) -> usize {
        self.edges.push(EdgeState::derive(timer.time_remaining));
        self.timers.push(timer);
        self.timers.len() - 1
    }

    pub fn remove(&mut self, index: usize) -> Result<Timer, BoardError> {
        if index >= self.timers.len() {
            return Err(BoardError::NotFound(index));
        }
        self.edges.remove(index);
        Ok(self.timers.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(remaining: &[i64]) -> TimerBoard {
        TimerBoard::new(
            remaining
                .iter()
                .enumerate()
                .map(|(i, &r)| Timer::with_state(format!("T{i}"), 600, Some(r), false, false))
                .collect(),
        )
    }

    fn run_ticks(board: &mut TimerBoard, n: usize) -> Vec<TimerEvent> {
        (0..n).flat_map(|_| board.tick()).collect()
    }

    #[test]
    fn tick_decrements_only_running_timers() {
        let mut board = board_with(&[100, 100]);
        board.toggle(1).unwrap();
        run_ticks(&mut board, 7);
        assert_eq!(board.get(0).unwrap().time_remaining, 100);
        assert_eq!(board.get(1).unwrap().time_remaining, 93);
    }

    #[test]
    fn starting_one_timer_pauses_the_other() {
        let mut board = board_with(&[300, 300, 300]);
        board.toggle(0).unwrap();
        let event = board.toggle(2).unwrap();

        assert_eq!(event, Some(TimerEvent::Started { index: 2 }));
        assert_eq!(board.running_count(), 1);
        assert!(!board.get(0).unwrap().is_running);
        assert!(board.get(2).unwrap().is_running);
    }

    #[test]
    fn toggling_a_running_timer_pauses_it_silently() {
        let mut board = board_with(&[300]);
        board.toggle(0).unwrap();
        assert_eq!(board.toggle(0).unwrap(), None);
        assert_eq!(board.running_count(), 0);
    }

    #[test]
    fn warning_fires_once_on_reaching_sixty() {
        let mut board = board_with(&[62]);
        board.toggle(0).unwrap();

        assert!(board.tick().is_empty());
        assert_eq!(board.tick(), vec![TimerEvent::Warning { index: 0 }]);
        let later = run_ticks(&mut board, 59);
        assert!(later.iter().all(|e| !matches!(e, TimerEvent::Warning { .. })));
        assert_eq!(board.get(0).unwrap().time_remaining, 1);
    }

    #[test]
    fn end_fires_once_on_reaching_zero() {
        let mut board = board_with(&[2]);
        board.toggle(0).unwrap();

        assert!(board.tick().is_empty());
        assert_eq!(board.tick(), vec![TimerEvent::Ended { index: 0 }]);
    }

    #[test]
    fn overtime_fires_once_on_minus_one() {
        let mut board = board_with(&[1]);
        board.toggle(0).unwrap();

        assert_eq!(board.tick(), vec![TimerEvent::Ended { index: 0 }]);
        assert_eq!(board.tick(), vec![TimerEvent::Overtime { index: 0 }]);
        assert!(run_ticks(&mut board, 30).is_empty());
        assert_eq!(board.get(0).unwrap().time_remaining, -31);
    }

    #[test]
    fn full_countdown_fires_each_event_exactly_once() {
        let mut board = board_with(&[65]);
        board.toggle(0).unwrap();
        let events = run_ticks(&mut board, 120);
        assert_eq!(
            events,
            vec![
                TimerEvent::Warning { index: 0 },
                TimerEvent::Ended { index: 0 },
                TimerEvent::Overtime { index: 0 },
            ]
        );
    }

    #[test]
    fn resuming_inside_warning_zone_does_not_refire_warning() {
        let mut board = board_with(&[61]);
        board.toggle(0).unwrap();
        assert_eq!(board.tick(), vec![TimerEvent::Warning { index: 0 }]);

        board.toggle(0).unwrap();
        board.toggle(0).unwrap();
        let edge = board.edge(0).unwrap();
        assert!(edge.was_warning);
        assert!(!edge.was_overtime);

        let events = run_ticks(&mut board, 61);
        assert_eq!(
            events,
            vec![TimerEvent::Ended { index: 0 }, TimerEvent::Overtime { index: 0 }]
        );
    }

    #[test]
    fn resuming_in_overtime_does_not_refire_overtime() {
        let mut board = board_with(&[-10]);
        board.toggle(0).unwrap();
        assert!(run_ticks(&mut board, 5).is_empty());
    }

    #[test]
    fn replace_derives_flags_from_incoming_values() {
        let mut board = board_with(&[600]);
        board.replace(vec![
            Timer::with_state("a", 600, Some(30), true, false),
            Timer::with_state("b", 600, Some(-4), false, false),
            Timer::with_state("c", 600, Some(61), false, false),
        ]);

        assert_eq!(
            board.edge(0),
            Some(&EdgeState {
                time_remaining: 30,
                was_warning: true,
                was_overtime: false,
            })
        );
        assert!(board.edge(1).unwrap().was_overtime);
        assert!(!board.edge(2).unwrap().was_warning);
        assert!(board.tick().is_empty());
    }

    #[test]
    fn archived_timer_is_paused_and_cannot_be_started() {
        let mut board = board_with(&[300, 300]);
        board.toggle(0).unwrap();
        board.archive(0).unwrap();
        assert_eq!(board.running_count(), 0);

        assert_eq!(board.toggle(0), Err(BoardError::Archived(0)));
        board.toggle(1).unwrap();
        assert!(!board.get(0).unwrap().is_running);
        assert!(board.get(0).unwrap().is_archived);

        board.unarchive(0).unwrap();
        assert!(board.toggle(0).is_ok());
    }

    #[test]
    fn out_of_range_index_is_reported() {
        let mut board = board_with(&[300]);
        assert_eq!(board.toggle(3), Err(BoardError::NotFound(3)));
        assert_eq!(board.reset(3), Err(BoardError::NotFound(3)));
        assert!(board.remove(1).is_err());
    }

    #[test]
    fn reset_rearms_notifications() {
        let mut board = board_with(&[61]);
        board.toggle(0).unwrap();
        run_ticks(&mut board, 70);
        board.reset(0).unwrap();
        assert_eq!(board.edge(0), Some(&EdgeState::derive(600)));
    }

    #[test]
    fn add_and_remove_keep_edges_in_lockstep() {
        let mut board = board_with(&[300, 200]);
        let index = board.add(Timer::new("New Timer", 300));
        assert_eq!(index, 2);
        assert!(board.edge(2).is_some());

        let removed = board.remove(0).unwrap();
        assert_eq!(removed.title, "T0");
        assert_eq!(board.len(), 2);
        assert_eq!(board.edge(0).unwrap().time_remaining, 200);
        assert!(board.edge(2).is_none());
    }
}
