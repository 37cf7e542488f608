//! Configuration module
//!
//! Hierarchy (highest priority first):
//! 1. CLI flags
//! 2. Environment variables (BUILDWATCH_*)
//! 3. Project config (`buildwatch.toml`, or `--config <path>`)
//! 4. User config (`<config dir>/buildwatch/config.toml`)
//! 5. Built-in defaults

mod loader;
mod types;

pub use loader::{
    load, load_from, load_with_warnings, user_config_path, ConfigWarning,
    LoadedConfig, PROJECT_CONFIG_FILE,
};
pub use types::{
    BuildConfig, ColorMode, CommandSpec, Config, DebounceConfig, OutputConfig, RootConfig,
};
