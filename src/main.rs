//! buildwatch CLI
//!
//! Usage: buildwatch [COMMAND]
//!
//! Commands:
//!   watch   Watch the configured roots and rebuild on change (default)
//!   build   Run the build once and exit with its outcome
//!   config  Print the effective configuration

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use commands::watch::WatchOverrides;
use commands::GlobalArgs;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let global = GlobalArgs {
        config: cli.config,
        json: cli.json,
        color: cli.color,
        verbose: cli.verbose,
    };

    match cli.command {
        None => commands::watch::cmd_watch(&global, WatchOverrides::default()),
        Some(Commands::Watch {
            debounce_ms,
            timeout_secs,
            command,
        }) => commands::watch::cmd_watch(
            &global,
            WatchOverrides {
                debounce_ms,
                timeout_secs,
                command,
            },
        ),
        Some(Commands::Build {
            command,
            timeout_secs,
        }) => {
            if !commands::build::cmd_build(&global, command, timeout_secs)? {
                std::process::exit(1);
            }
            Ok(())
        }
        Some(Commands::Config) => commands::config::cmd_config(&global),
    }
}
