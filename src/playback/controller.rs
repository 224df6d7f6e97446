use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::{
    sync::{mpsc, Mutex},
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use super::{DisplayEntry, PlaybackScheduler, PlaybackStatus};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(3000);

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSnapshot {
    pub status: PlaybackStatus,
    pub status_label: &'static str,
    pub cursor: usize,
    pub sequence_len: usize,
    pub history: Vec<DisplayEntry>,
}

/// Drives a [`PlaybackScheduler`] from a fixed-period tokio interval and
/// forwards every emission to a subscriber channel.
#[derive(Clone)]
pub struct PlaybackController {
    scheduler: Arc<Mutex<PlaybackScheduler>>,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    cancel_token: Arc<Mutex<Option<CancellationToken>>>,
    tick_interval: Duration,
    events: mpsc::UnboundedSender<DisplayEntry>,
}

impl PlaybackController {
    pub fn new(
        scheduler: PlaybackScheduler,
        tick_interval: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<DisplayEntry>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let controller = Self {
            scheduler: Arc::new(Mutex::new(scheduler)),
            ticker: Arc::new(Mutex::new(None)),
            cancel_token: Arc::new(Mutex::new(None)),
            tick_interval,
            events,
        };
        (controller, receiver)
    }

    pub async fn arm(&self) {
        self.scheduler.lock().await.arm();
        log_info!("detection started");
    }

    pub async fn disarm(&self) {
        self.scheduler.lock().await.disarm();
        log_info!("detection stopped");
    }

    pub async fn toggle(&self) -> PlaybackStatus {
        let status = self.scheduler.lock().await.toggle();
        log_info!("detection {}", status.label().to_lowercase());
        status
    }

    pub async fn snapshot(&self) -> PlaybackSnapshot {
        let guard = self.scheduler.lock().await;
        PlaybackSnapshot {
            status: guard.status(),
            status_label: guard.status_label(),
            cursor: guard.cursor(),
            sequence_len: guard.sequence().len(),
            history: guard.display_history(),
        }
    }

    /// Begin issuing ticks. A ticker that is already running is replaced.
    pub async fn start(&self) {
        let mut ticker_guard = self.ticker.lock().await;
        if let Some(handle) = ticker_guard.take() {
            handle.abort();
        }
        if let Some(token) = self.cancel_token.lock().await.take() {
            token.cancel();
        }

        let token = CancellationToken::new();
        let handle = tokio::spawn(playback_loop(
            self.scheduler.clone(),
            self.tick_interval,
            self.events.clone(),
            token.clone(),
        ));

        *self.cancel_token.lock().await = Some(token);
        *ticker_guard = Some(handle);
    }

    /// Stop issuing ticks and wait for the ticker task to exit.
    pub async fn shutdown(&self) -> Result<()> {
        if let Some(token) = self.cancel_token.lock().await.take() {
            token.cancel();
        }

        if let Some(handle) = self.ticker.lock().await.take() {
            handle
                .await
                .context("playback ticker task failed to join")
                .map(|_| ())
        } else {
            Ok(())
        }
    }
}

async fn playback_loop(
    scheduler: Arc<Mutex<PlaybackScheduler>>,
    tick_interval: Duration,
    events: mpsc::UnboundedSender<DisplayEntry>,
    cancel_token: CancellationToken,
) {
    let mut interval = time::interval(tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let entry = {
                    let mut guard = scheduler.lock().await;
                    guard.tick().map(|emission| emission.to_display())
                };

                if let Some(entry) = entry {
                    log_debug!("caption {}: {}", entry.time, entry.message);
                    if events.send(entry).is_err() {
                        log_warn!("caption subscriber dropped; stopping playback");
                        break;
                    }
                }
            }
            _ = cancel_token.cancelled() => {
                log_info!("playback loop shutting down");
                break;
            }
        }
    }
}
