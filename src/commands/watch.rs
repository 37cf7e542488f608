use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use buildwatch::config::CommandSpec;
use buildwatch::{BuildRunner, WatchUseCase};

use super::{load_config, make_reporter, report_warnings, GlobalArgs};

/// Command-line overrides for `watch`
#[derive(Debug, Clone, Default)]
pub struct WatchOverrides {
    pub debounce_ms: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub command: Option<String>,
}

/// Run the pipeline until Ctrl+C. Build failures do not affect the exit code.
pub fn cmd_watch(global: &GlobalArgs, overrides: WatchOverrides) -> Result<()> {
    let mut loaded = load_config(global)?;

    if let Some(ms) = overrides.debounce_ms {
        loaded.config.debounce.window_ms = ms;
    }
    if let Some(secs) = overrides.timeout_secs {
        loaded.config.build.timeout_secs = secs;
    }
    if let Some(command) = overrides.command {
        loaded.config.build.command = CommandSpec::Shell(command);
    }
    loaded.config.validate()?;

    let reporter = make_reporter(global, &loaded.config.output);
    report_warnings(&reporter, &loaded);

    let command = loaded.config.build_command(&loaded.base_dir)?;
    let roots = loaded.config.watch_roots(&loaded.base_dir);

    // Set up Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })
    .context("failed to install Ctrl+C handler")?;

    let use_case = WatchUseCase::new(
        roots,
        loaded.config.debounce_window(),
        Arc::new(BuildRunner::new(command)),
        reporter,
    );
    use_case.run(running)?;

    Ok(())
}
