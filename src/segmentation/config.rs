use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Length window (in characters) every caption unit must fit into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentationConfig {
    /// Shortest unit that may be emitted
    pub min_length: usize,

    /// Longest unit that may be emitted, also the packing limit
    pub max_length: usize,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            min_length: 40,
            max_length: 80,
        }
    }
}

impl SegmentationConfig {
    pub fn new(min_length: usize, max_length: usize) -> Result<Self> {
        let config = Self {
            min_length,
            max_length,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_length == 0 {
            bail!("min_length must be greater than zero");
        }
        if self.max_length < self.min_length {
            bail!(
                "max_length ({}) must be at least min_length ({})",
                self.max_length,
                self.min_length
            );
        }
        Ok(())
    }

    pub fn fits(&self, len: usize) -> bool {
        len >= self.min_length && len <= self.max_length
    }
}
