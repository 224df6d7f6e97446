mod cli;
pub mod playback;
pub mod segmentation;
pub mod settings;
pub mod source;
pub mod utils;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use cli::Cli;
use playback::{apply_command, CommandOutcome, FeedCommand, PlaybackController, PlaybackScheduler};
use settings::{FeedSettings, SettingsStore};
use source::{load_sequence, SourceLocation};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

pub const DEBUG_ENV: &str = "IASSIST_DEBUG";

fn debug_mode() -> bool {
    std::env::var(DEBUG_ENV)
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn resolve_settings(cli: &Cli) -> Result<FeedSettings> {
    let store = SettingsStore::new(cli.config.clone())?;
    let mut settings = store.feed();

    if let Some(source) = &cli.source {
        settings.source = source.clone();
    }
    if let Some(tick_ms) = cli.tick_ms {
        settings.tick_interval_ms = tick_ms;
    }
    settings.auto_arm |= cli.auto_arm;

    settings.validate()?;
    Ok(settings)
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging (reads RUST_LOG env var)
    utils::logging::init(debug_mode());

    log_info!("iAssist caption feed starting up...");

    let settings = resolve_settings(&cli)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_feed(settings))
}

async fn run_feed(settings: FeedSettings) -> Result<()> {
    let location = SourceLocation::parse(&settings.source);
    let sequence = load_sequence(
        &location,
        &settings.segmentation(),
        settings.request_timeout(),
    )
    .await?;

    let (controller, mut captions) =
        PlaybackController::new(PlaybackScheduler::new(sequence), settings.tick_interval());
    if settings.auto_arm {
        controller.arm().await;
    }
    controller.start().await;

    println!("Status: {}", controller.snapshot().await.status_label);
    println!("Commands: start, stop, toggle (or empty line), history, quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            Some(entry) = captions.recv() => {
                println!("{}: {}", entry.time, entry.message);
            }
            line = lines.next_line() => {
                let command = match line {
                    Ok(Some(line)) => match line.parse::<FeedCommand>() {
                        Ok(command) => command,
                        Err(err) => {
                            eprintln!("{err}");
                            continue;
                        }
                    },
                    // stdin closed
                    Ok(None) => break,
                    Err(err) => {
                        log_error!("failed to read command: {err}");
                        break;
                    }
                };

                match apply_command(&controller, command).await {
                    CommandOutcome::Status(status) => println!("Status: {}", status.label()),
                    CommandOutcome::History(snapshot) => {
                        for entry in snapshot.history {
                            println!("  {}: {}", entry.time, entry.message);
                        }
                    }
                    CommandOutcome::Quit => break,
                }
            }
        }
    }

    controller.shutdown().await?;
    log_info!("iAssist caption feed stopped");
    Ok(())
}
