use anyhow::{bail, anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{PoisonError, RwLock},
    time::Duration,
};

use crate::segmentation::SegmentationConfig;
use crate::source::DEFAULT_SOURCE;

pub const SOURCE_ENV: &str = "IASSIST_SOURCE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeedSettings {
    pub source: String,
    pub tick_interval_ms: u64,
    pub min_length: usize,
    pub max_length: usize,
    pub auto_arm: bool,
    pub request_timeout_secs: u64,
}

impl Default for FeedSettings {
    fn default() -> Self {
        let window = SegmentationConfig::default();
        Self {
            source: DEFAULT_SOURCE.into(),
            tick_interval_ms: 3000,
            min_length: window.min_length,
            max_length: window.max_length,
            auto_arm: false,
            request_timeout_secs: 10,
        }
    }
}

impl FeedSettings {
    pub fn segmentation(&self) -> SegmentationConfig {
        SegmentationConfig {
            min_length: self.min_length,
            max_length: self.max_length,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        self.segmentation()
            .validate()
            .context("invalid caption length window")?;
        if self.tick_interval_ms == 0 {
            bail!("tickIntervalMs must be greater than zero");
        }
        Ok(())
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<FeedSettings>,
}

impl SettingsStore {
    /// Load settings from `path`, falling back to defaults when the file does
    /// not exist. `IASSIST_SOURCE` overrides the configured source.
    pub fn new(path: PathBuf) -> Result<Self> {
        let mut data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse settings in {}", path.display()))?
        } else {
            FeedSettings::default()
        };

        if let Ok(source) = std::env::var(SOURCE_ENV) {
            if !source.trim().is_empty() {
                data.source = source;
            }
        }

        data.validate()?;

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn feed(&self) -> FeedSettings {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn update_feed(&self, settings: FeedSettings) -> Result<()> {
        settings.validate()?;
        let mut guard = self
            .data
            .write()
            .map_err(|_| anyhow!("settings lock poisoned"))?;
        self.persist(&settings)?;
        *guard = settings;
        Ok(())
    }

    fn persist(&self, data: &FeedSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
