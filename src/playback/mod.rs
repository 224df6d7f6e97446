pub mod commands;
pub mod controller;
pub mod scheduler;
pub mod state;

pub use commands::{apply_command, CommandOutcome, FeedCommand};
pub use controller::{PlaybackController, PlaybackSnapshot, DEFAULT_TICK_INTERVAL};
pub use scheduler::PlaybackScheduler;
pub use state::{DisplayEntry, Emission, PlaybackState, PlaybackStatus};
