use std::sync::Arc;

use anyhow::Result;
use buildwatch::config::CommandSpec;
use buildwatch::pipeline::{BuildCycle, PhaseCell};
use buildwatch::report::BuildTrigger;
use buildwatch::BuildRunner;

use super::{load_config, make_reporter, report_warnings, GlobalArgs};

/// Run the configured build once. Returns whether it succeeded.
pub fn cmd_build(
    global: &GlobalArgs,
    command: Option<String>,
    timeout_secs: Option<u64>,
) -> Result<bool> {
    let mut loaded = load_config(global)?;

    if let Some(command) = command {
        loaded.config.build.command = CommandSpec::Shell(command);
    }
    if let Some(secs) = timeout_secs {
        loaded.config.build.timeout_secs = secs;
    }
    loaded.config.validate()?;

    let reporter = make_reporter(global, &loaded.config.output);
    report_warnings(&reporter, &loaded);

    let runner = BuildRunner::new(loaded.config.build_command(&loaded.base_dir)?);
    let cycle = BuildCycle::new(Arc::new(runner), reporter, Arc::new(PhaseCell::default()));

    Ok(cycle
        .run(BuildTrigger::Initial)
        .map(|result| result.is_success())
        .unwrap_or(false))
}
