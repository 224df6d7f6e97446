use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::segmentation::{segment_messages, RawRecord, SegmentationConfig};

/// Body returned by the environment-message endpoint. The variant is picked
/// by which top-level field is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeedPayload {
    /// `{ "environment": [{ "message": ... }] }`, still needs segmenting
    Raw { environment: Vec<RawRecord> },
    /// `{ "messages": [...] }`, already split into caption units
    Presegmented { messages: Vec<String> },
}

impl FeedPayload {
    pub fn from_json(body: &str) -> Result<Self> {
        serde_json::from_str(body)
            .context("payload has neither an `environment` nor a `messages` array")
    }

    /// Turn the payload into the sequence the scheduler plays. Only raw
    /// records go through the segmenter.
    pub fn into_sequence(self, config: &SegmentationConfig) -> Result<Vec<String>> {
        match self {
            FeedPayload::Raw { environment } => segment_messages(&environment, config),
            FeedPayload::Presegmented { messages } => Ok(messages),
        }
    }
}

#[derive(Deserialize)]
struct Envelope {
    message: String,
}

/// Decode a single `{ "message": ... }` envelope delivered for one tick.
pub fn parse_envelope(raw: &str) -> Result<String> {
    let envelope: Envelope = serde_json::from_str(raw).context("invalid caption envelope")?;
    Ok(envelope.message)
}

/// Captions from the live-caption panel of the demo page.
pub fn sample_records() -> Vec<RawRecord> {
    [
        "Warning: Stairs ahead, approximately 5 steps down. Handrail available on the right side.",
        "Door detected 3 meters ahead. Push handle on the left side. The door opens outward.",
        "Person approaching from the right, approximately 2 meters away. They appear to be waiting to pass.",
        "Clear pathway ahead. Corridor width is approximately 2 meters. Wall guidance available on both sides.",
        "Crosswalk signal is green. No vehicles detected. Safe to cross the street.",
        "Restaurant entrance on the left. Automatic sliding doors. No steps detected.",
        "Bench detected 1 meter to your right. Approximately 1.5 meters long.",
        "Elevator buttons: Ground floor highlighted. Up and down arrows available.",
        "Wide open space ahead. Indoor lobby area. Multiple seating areas detected.",
        "Information desk 5 meters ahead. Staff member present.",
    ]
    .into_iter()
    .map(RawRecord::new)
    .collect()
}
