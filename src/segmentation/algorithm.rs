use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::segmentation::config::SegmentationConfig;

const SENTENCE_DELIMITER: char = '.';
const JOINER: &str = ". ";

/// One raw environment description as delivered by the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub message: String,
}

impl RawRecord {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Split every record on the sentence delimiter and flatten the trimmed,
/// non-empty fragments into one ordered list. Record boundaries are not kept.
pub fn split_fragments(records: &[RawRecord]) -> Vec<String> {
    records
        .iter()
        .flat_map(|record| record.message.split(SENTENCE_DELIMITER))
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Pending caption text plus its length in characters.
#[derive(Default)]
struct Accumulator {
    text: String,
    len: usize,
}

impl Accumulator {
    fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn replace(&mut self, fragment: &str) {
        self.text.clear();
        self.text.push_str(fragment);
        self.len = fragment.chars().count();
    }

    fn take(&mut self) -> String {
        self.len = 0;
        std::mem::take(&mut self.text)
    }
}

/// Main segmentation function: packs sentence fragments greedily into caption
/// units whose length lies inside the configured window.
///
/// An accumulator that cannot grow without exceeding `max_length` is emitted
/// only if it lies inside the window; otherwise it is dropped. A fragment
/// longer than `max_length` is therefore never emitted, and neither is a
/// trailing accumulator that never reaches the window.
pub fn segment_messages(records: &[RawRecord], config: &SegmentationConfig) -> Result<Vec<String>> {
    config.validate()?;

    let fragments = split_fragments(records);
    let mut units = Vec::new();
    let mut acc = Accumulator::default();

    for fragment in &fragments {
        let fragment_len = fragment.chars().count();

        if acc.is_empty() {
            acc.replace(fragment);
        } else {
            let candidate_len = acc.len + JOINER.len() + fragment_len;
            if candidate_len <= config.max_length {
                acc.text.push_str(JOINER);
                acc.text.push_str(fragment);
                acc.len = candidate_len;
            } else {
                if config.fits(acc.len) {
                    units.push(acc.take());
                }
                acc.replace(fragment);
            }
        }

        if config.fits(acc.len) {
            units.push(acc.take());
        }
    }

    // Edge case: leftover text only survives if it already fits the window
    if !acc.is_empty() && config.fits(acc.len) {
        units.push(acc.take());
    }

    Ok(units)
}
