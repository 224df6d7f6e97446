use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "iassist")]
#[command(about = "Replays segmented environment captions as a live detection feed", long_about = None)]
#[command(version)]
pub(crate) struct Cli {
    /// Settings file (JSON). Missing file means defaults.
    #[arg(short, long, default_value = "iassist.json")]
    pub(crate) config: PathBuf,

    /// Caption source: http(s) URL, JSON file path, or builtin:sample
    #[arg(short, long)]
    pub(crate) source: Option<String>,

    /// Tick period in milliseconds
    #[arg(long = "tick-ms")]
    pub(crate) tick_ms: Option<u64>,

    /// Start detection immediately instead of waiting for `start`
    #[arg(long)]
    pub(crate) auto_arm: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_local_settings_file() {
        let cli = Cli::parse_from(["iassist"]);
        assert_eq!(cli.config, PathBuf::from("iassist.json"));
        assert!(cli.source.is_none());
        assert!(!cli.auto_arm);
    }

    #[test]
    fn flags_override_settings() {
        let cli = Cli::parse_from([
            "iassist",
            "--source",
            "builtin:sample",
            "--tick-ms",
            "500",
            "--auto-arm",
        ]);
        assert_eq!(cli.source.as_deref(), Some("builtin:sample"));
        assert_eq!(cli.tick_ms, Some(500));
        assert!(cli.auto_arm);
    }
}
