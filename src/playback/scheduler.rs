use chrono::{DateTime, Utc};
use std::collections::VecDeque;

use crate::source::parse_envelope;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_warn};

use super::{DisplayEntry, Emission, PlaybackState, PlaybackStatus};

/// Replays a fixed caption sequence one unit per tick while armed.
///
/// The scheduler never looks at a clock on its own; whoever owns it decides
/// when a tick happens. Disarming keeps the cursor, so re-arming continues
/// where playback left off.
#[derive(Debug, Clone, Default)]
pub struct PlaybackScheduler {
    sequence: Vec<String>,
    state: PlaybackState,
}

impl PlaybackScheduler {
    pub fn new(sequence: Vec<String>) -> Self {
        Self {
            sequence,
            state: PlaybackState::new(),
        }
    }

    pub fn arm(&mut self) {
        self.state.status = PlaybackStatus::Armed;
    }

    pub fn disarm(&mut self) {
        self.state.status = PlaybackStatus::Disarmed;
    }

    pub fn toggle(&mut self) -> PlaybackStatus {
        match self.state.status {
            PlaybackStatus::Armed => self.disarm(),
            PlaybackStatus::Disarmed => self.arm(),
        }
        self.state.status
    }

    pub fn tick(&mut self) -> Option<&Emission> {
        self.tick_at(Utc::now())
    }

    /// Emit the unit under the cursor stamped with `now`, then advance.
    /// Does nothing while disarmed or when there is nothing to play.
    pub fn tick_at(&mut self, now: DateTime<Utc>) -> Option<&Emission> {
        if !self.state.is_armed() || self.sequence.is_empty() {
            return None;
        }

        let text = self.sequence[self.state.cursor].clone();
        log_debug!("tick emits unit {} of {}", self.state.cursor, self.sequence.len());

        self.state.record(Emission {
            timestamp: now,
            text,
        });
        self.state.advance(self.sequence.len());
        self.state.history.front()
    }

    /// Tick driven by a per-tick JSON envelope instead of the stored sequence.
    /// A malformed envelope skips this tick's emission and leaves state alone.
    pub fn tick_envelope(&mut self, raw: &str, now: DateTime<Utc>) -> Option<&Emission> {
        if !self.state.is_armed() {
            return None;
        }

        match parse_envelope(raw) {
            Ok(text) => {
                self.state.record(Emission {
                    timestamp: now,
                    text,
                });
                self.state.history.front()
            }
            Err(err) => {
                log_warn!("skipping malformed caption envelope: {err:#}");
                None
            }
        }
    }

    pub fn status(&self) -> PlaybackStatus {
        self.state.status
    }

    pub fn is_armed(&self) -> bool {
        self.state.is_armed()
    }

    pub fn status_label(&self) -> &'static str {
        self.state.status.label()
    }

    pub fn cursor(&self) -> usize {
        self.state.cursor
    }

    pub fn sequence(&self) -> &[String] {
        &self.sequence
    }

    pub fn history(&self) -> &VecDeque<Emission> {
        &self.state.history
    }

    pub fn display_history(&self) -> Vec<DisplayEntry> {
        self.state.history.iter().map(Emission::to_display).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn units(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("caption unit number {i}")).collect()
    }

    fn texts(scheduler: &PlaybackScheduler) -> Vec<&str> {
        scheduler.history().iter().map(|e| e.text.as_str()).collect()
    }

    #[test]
    fn disarmed_ticks_are_no_ops() {
        let mut scheduler = PlaybackScheduler::new(units(3));
        for _ in 0..10 {
            assert!(scheduler.tick().is_none());
        }
        assert!(scheduler.history().is_empty());
        assert_eq!(scheduler.cursor(), 0);
    }

    #[test]
    fn empty_sequence_never_emits_even_when_armed() {
        let mut scheduler = PlaybackScheduler::new(Vec::new());
        scheduler.arm();
        for _ in 0..5 {
            assert!(scheduler.tick().is_none());
        }
        assert!(scheduler.history().is_empty());
        assert_eq!(scheduler.cursor(), 0);
    }

    #[test]
    fn cursor_wraps_after_full_cycle() {
        let sequence = units(3);
        let mut scheduler = PlaybackScheduler::new(sequence.clone());
        scheduler.arm();

        for _ in 0..4 {
            scheduler.tick();
        }

        assert_eq!(scheduler.history().len(), 4);
        // Most recent first: the 4th emission is at the front and repeats unit 0
        assert_eq!(scheduler.history()[0].text, sequence[0]);
        assert_eq!(scheduler.history()[3].text, sequence[0]);
        assert_eq!(scheduler.cursor(), 1);
    }

    #[test]
    fn rearm_resumes_from_same_cursor() {
        let sequence = units(3);
        let mut scheduler = PlaybackScheduler::new(sequence.clone());
        scheduler.arm();
        scheduler.tick();
        scheduler.tick();

        scheduler.disarm();
        for _ in 0..5 {
            scheduler.tick();
        }
        assert_eq!(scheduler.history().len(), 2);
        assert_eq!(scheduler.cursor(), 2);

        scheduler.arm();
        let emitted = scheduler.tick().map(|e| e.text.clone());

        assert_eq!(emitted.as_deref(), Some(sequence[2].as_str()));
    }

    #[test]
    fn history_is_most_recent_first() {
        let sequence = units(3);
        let mut scheduler = PlaybackScheduler::new(sequence.clone());
        scheduler.arm();

        let start = Utc::now();
        for step in 0..3 {
            scheduler.tick_at(start + Duration::seconds(3 * step));
            assert_eq!(scheduler.history()[0].text, sequence[step as usize]);
        }

        assert_eq!(
            texts(&scheduler),
            vec![sequence[2].as_str(), sequence[1].as_str(), sequence[0].as_str()]
        );
        assert!(scheduler.history()[0].timestamp > scheduler.history()[2].timestamp);
    }

    #[test]
    fn toggle_flips_status_and_label() {
        let mut scheduler = PlaybackScheduler::new(units(1));
        assert_eq!(scheduler.status_label(), "Inactive");
        assert_eq!(scheduler.toggle(), PlaybackStatus::Armed);
        assert_eq!(scheduler.status_label(), "Active");
        assert_eq!(scheduler.toggle(), PlaybackStatus::Disarmed);
    }

    #[test]
    fn arm_takes_effect_on_next_tick_only() {
        let mut scheduler = PlaybackScheduler::new(units(2));
        scheduler.tick();
        scheduler.arm();
        assert!(scheduler.history().is_empty());
        scheduler.tick();
        assert_eq!(scheduler.history().len(), 1);
    }

    #[test]
    fn envelope_tick_records_parsed_message() {
        let mut scheduler = PlaybackScheduler::new(units(2));
        scheduler.arm();

        let emitted = scheduler
            .tick_envelope(r#"{"message":"Car approaching from left"}"#, Utc::now())
            .map(|e| e.text.clone());

        assert_eq!(emitted.as_deref(), Some("Car approaching from left"));
        assert_eq!(scheduler.cursor(), 0);
    }

    #[test]
    fn malformed_envelope_skips_emission() {
        let mut scheduler = PlaybackScheduler::new(units(2));
        scheduler.arm();
        scheduler.tick();

        assert!(scheduler.tick_envelope("{not json", Utc::now()).is_none());
        assert!(scheduler.tick_envelope(r#"{"text":"wrong field"}"#, Utc::now()).is_none());

        assert_eq!(scheduler.history().len(), 1);
        assert_eq!(scheduler.cursor(), 1);
        assert!(scheduler.tick().is_some());
    }

    #[test]
    fn envelope_ignored_while_disarmed() {
        let mut scheduler = PlaybackScheduler::new(Vec::new());
        assert!(scheduler
            .tick_envelope(r#"{"message":"Door ahead"}"#, Utc::now())
            .is_none());
        assert!(scheduler.history().is_empty());
    }

    #[test]
    fn display_history_mirrors_emissions() {
        let mut scheduler = PlaybackScheduler::new(units(2));
        scheduler.arm();
        scheduler.tick();
        scheduler.tick();

        let display = scheduler.display_history();
        assert_eq!(display.len(), 2);
        assert_eq!(display[0].message, scheduler.history()[0].text);
    }
}
