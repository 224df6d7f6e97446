use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

const DISPLAY_TIME_FORMAT: &str = "%-I:%M %p";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PlaybackStatus {
    Disarmed,
    Armed,
}

impl Default for PlaybackStatus {
    fn default() -> Self {
        PlaybackStatus::Disarmed
    }
}

impl PlaybackStatus {
    /// Label shown next to the live caption log.
    pub fn label(self) -> &'static str {
        match self {
            PlaybackStatus::Armed => "Active",
            PlaybackStatus::Disarmed => "Inactive",
        }
    }
}

/// A caption unit stamped at the moment it was played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Emission {
    pub timestamp: DateTime<Utc>,
    pub text: String,
}

impl Emission {
    pub fn to_display(&self) -> DisplayEntry {
        DisplayEntry {
            time: self
                .timestamp
                .with_timezone(&Local)
                .format(DISPLAY_TIME_FORMAT)
                .to_string(),
            message: self.text.clone(),
        }
    }
}

/// Row handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayEntry {
    pub time: String,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct PlaybackState {
    pub status: PlaybackStatus,
    pub cursor: usize,
    /// Most recent emission first. Grows for the lifetime of the feed.
    pub history: VecDeque<Emission>,
}

impl PlaybackState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_armed(&self) -> bool {
        self.status == PlaybackStatus::Armed
    }

    pub fn record(&mut self, emission: Emission) {
        self.history.push_front(emission);
    }

    /// Step the cursor forward, wrapping at `len`.
    pub fn advance(&mut self, len: usize) {
        if len > 0 {
            self.cursor = (self.cursor + 1) % len;
        }
    }
}
