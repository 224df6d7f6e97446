use std::str::FromStr;

use anyhow::{anyhow, Error};

use super::{PlaybackController, PlaybackSnapshot, PlaybackStatus};

/// Operator commands accepted by the feed console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedCommand {
    Start,
    Stop,
    Toggle,
    History,
    Quit,
}

impl FromStr for FeedCommand {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "start" => Ok(FeedCommand::Start),
            "stop" => Ok(FeedCommand::Stop),
            "" | "toggle" => Ok(FeedCommand::Toggle),
            "history" => Ok(FeedCommand::History),
            "quit" | "exit" => Ok(FeedCommand::Quit),
            other => Err(anyhow!(
                "unknown command `{other}` (expected start, stop, toggle, history or quit)"
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub enum CommandOutcome {
    Status(PlaybackStatus),
    History(PlaybackSnapshot),
    Quit,
}

pub async fn apply_command(controller: &PlaybackController, command: FeedCommand) -> CommandOutcome {
    match command {
        FeedCommand::Start => {
            controller.arm().await;
            CommandOutcome::Status(PlaybackStatus::Armed)
        }
        FeedCommand::Stop => {
            controller.disarm().await;
            CommandOutcome::Status(PlaybackStatus::Disarmed)
        }
        FeedCommand::Toggle => CommandOutcome::Status(controller.toggle().await),
        FeedCommand::History => CommandOutcome::History(controller.snapshot().await),
        FeedCommand::Quit => CommandOutcome::Quit,
    }
}
