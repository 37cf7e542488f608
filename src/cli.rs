//! CLI Argument Parsing
//!
//! - Global flags (--config, --json, --color, --verbose) are inherited by all subcommands
//! - No subcommand means `watch` with its defaults

use std::path::PathBuf;

use buildwatch::config::ColorMode;
use clap::{Parser, Subcommand};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

impl From<ColorWhen> for ColorMode {
    fn from(when: ColorWhen) -> Self {
        match when {
            ColorWhen::Auto => ColorMode::Auto,
            ColorWhen::Always => ColorMode::Always,
            ColorWhen::Never => ColorMode::Never,
        }
    }
}

/// buildwatch - re-run your build whenever the sources settle
#[derive(Parser, Debug)]
#[command(name = "buildwatch")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Run 'buildwatch' without a subcommand to start watching.")]
pub struct Cli {
    /// Config file (default: ./buildwatch.toml, then the user config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit one JSON object per event
    #[arg(long, global = true)]
    pub json: bool,

    /// Color output mode
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorWhen>,

    /// Show build output on success too (-v)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Watch the configured roots and rebuild on change
    Watch {
        /// Quiet window before a rebuild, in milliseconds
        #[arg(long)]
        debounce_ms: Option<u64>,

        /// Kill a build that runs longer than this (0 disables)
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Build command, run through the shell
        #[arg(long)]
        command: Option<String>,
    },

    /// Run the build once and exit with its outcome
    Build {
        /// Build command, run through the shell
        #[arg(long)]
        command: Option<String>,

        /// Kill the build if it runs longer than this (0 disables)
        #[arg(long)]
        timeout_secs: Option<u64>,
    },

    /// Print the effective configuration
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_subcommand() {
        let cli = Cli::try_parse_from(["buildwatch"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.json);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_cli_parse_watch_overrides() {
        let cli = Cli::try_parse_from([
            "buildwatch",
            "watch",
            "--debounce-ms",
            "150",
            "--timeout-secs",
            "0",
            "--command",
            "make all",
        ])
        .unwrap();
        if let Some(Commands::Watch {
            debounce_ms,
            timeout_secs,
            command,
        }) = cli.command
        {
            assert_eq!(debounce_ms, Some(150));
            assert_eq!(timeout_secs, Some(0));
            assert_eq!(command.as_deref(), Some("make all"));
        } else {
            panic!("Expected Watch command");
        }
    }

    #[test]
    fn test_cli_parse_build() {
        let cli = Cli::try_parse_from(["buildwatch", "build", "--command", "exit 1"]).unwrap();
        if let Some(Commands::Build {
            command,
            timeout_secs,
        }) = cli.command
        {
            assert_eq!(command.as_deref(), Some("exit 1"));
            assert!(timeout_secs.is_none());
        } else {
            panic!("Expected Build command");
        }
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "buildwatch",
            "config",
            "--json",
            "--config",
            "ci.toml",
            "-v",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 1);
        assert_eq!(cli.config, Some(PathBuf::from("ci.toml")));
        assert!(matches!(cli.command, Some(Commands::Config)));
    }

    #[test]
    fn test_cli_color_flag() {
        let cli = Cli::try_parse_from(["buildwatch", "--color", "never", "watch"]).unwrap();
        assert!(matches!(cli.color, Some(ColorWhen::Never)));
        assert_eq!(ColorMode::from(ColorWhen::Never), ColorMode::Never);
    }

    #[test]
    fn test_cli_rejects_non_numeric_debounce() {
        assert!(Cli::try_parse_from(["buildwatch", "watch", "--debounce-ms", "soon"]).is_err());
    }
}
