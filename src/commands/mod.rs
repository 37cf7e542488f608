//! Subcommand implementations
//!
//! Each command loads the effective config, builds a reporter from the
//! global flags and hands off to the library.

pub mod build;
pub mod config;
pub mod watch;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use buildwatch::config::{self as bw_config, ColorMode, LoadedConfig, OutputConfig};
use buildwatch::report::{terminal, ReportFormat, TextStyle};
use buildwatch::{Level, Reporter};

use crate::cli::ColorWhen;

/// Flags every subcommand understands
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub config: Option<PathBuf>,
    pub json: bool,
    pub color: Option<ColorWhen>,
    pub verbose: u8,
}

/// Effective config for the working directory, honoring `--config`
pub fn load_config(global: &GlobalArgs) -> Result<LoadedConfig> {
    let cwd = std::env::current_dir().context("cannot determine working directory")?;
    let loaded = bw_config::load(global.config.as_deref(), &cwd)?;
    Ok(loaded)
}

pub fn make_reporter(global: &GlobalArgs, output: &OutputConfig) -> Arc<Reporter> {
    let verbose = global.verbose > 0;
    let format = if global.json {
        ReportFormat::Json { verbose }
    } else {
        let mode = global.color.map(ColorMode::from).unwrap_or(output.color);
        ReportFormat::Text(TextStyle {
            color: terminal::color_enabled(mode),
            unicode: output.unicode && terminal::unicode_supported(),
            verbose,
        })
    };
    Arc::new(Reporter::stdio(format))
}

pub fn report_warnings(reporter: &Reporter, loaded: &LoadedConfig) {
    for warning in &loaded.warnings {
        reporter.report(&warning.to_string(), Level::Warn);
    }
}
