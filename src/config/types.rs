//! Configuration type definitions

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::build::{BuildCommand, DEFAULT_TIMEOUT_SECS};
use crate::debounce::DEFAULT_WINDOW_MS;
use crate::domain::OnAccept;
use crate::error::{BuildwatchError, BuildwatchResult};
use crate::filter::ExtensionSet;
use crate::watch::WatchRoot;

/// Build command as written in the config file
///
/// Accepts both forms:
///   command = "npm run build"          # run through the shell
///   command = ["cargo", "build"]       # exec'd directly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandSpec {
    Shell(String),
    Argv(Vec<String>),
}

impl CommandSpec {
    fn is_blank(&self) -> bool {
        match self {
            CommandSpec::Shell(line) => line.trim().is_empty(),
            CommandSpec::Argv(argv) => argv.first().map(|p| p.trim().is_empty()).unwrap_or(true),
        }
    }
}

/// Build configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    #[serde(default = "default_command")]
    pub command: CommandSpec,

    /// Seconds before a running build is killed; 0 disables the limit
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Working directory for the build; relative to the config file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            timeout_secs: default_timeout_secs(),
            cwd: None,
        }
    }
}

/// Debounce configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebounceConfig {
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            window_ms: default_window_ms(),
        }
    }
}

/// Color output mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub color: ColorMode,

    #[serde(default = "default_true")]
    pub unicode: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: ColorMode::Auto,
            unicode: true,
        }
    }
}

/// One watched directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootConfig {
    pub path: PathBuf,

    #[serde(default)]
    pub extensions: Vec<String>,

    #[serde(default)]
    pub on_accept: OnAccept,

    #[serde(default = "default_true")]
    pub recursive: bool,
}

impl RootConfig {
    pub fn new(path: impl Into<PathBuf>, extensions: &[&str], on_accept: OnAccept) -> Self {
        Self {
            path: path.into(),
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
            on_accept,
            recursive: true,
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub debounce: DebounceConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default = "default_roots")]
    pub roots: Vec<RootConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            build: BuildConfig::default(),
            debounce: DebounceConfig::default(),
            output: OutputConfig::default(),
            roots: default_roots(),
        }
    }
}

fn default_command() -> CommandSpec {
    CommandSpec::Shell("npm run build".to_string())
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_window_ms() -> u64 {
    DEFAULT_WINDOW_MS
}

fn default_true() -> bool {
    true
}

fn default_roots() -> Vec<RootConfig> {
    vec![
        RootConfig::new("src", &["ts", "tsx", "js", "jsx", "css"], OnAccept::Build),
        RootConfig::new("templates", &["html"], OnAccept::LogOnly),
    ]
}

impl Config {
    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> BuildwatchResult<()> {
        if self.build.command.is_blank() {
            return Err(BuildwatchError::InvalidConfig(
                "build.command is empty".to_string(),
            ));
        }
        if self.debounce.window_ms == 0 {
            return Err(BuildwatchError::InvalidConfig(
                "debounce.window_ms must be greater than zero".to_string(),
            ));
        }
        if self.roots.is_empty() {
            return Err(BuildwatchError::InvalidConfig(
                "no [[roots]] configured".to_string(),
            ));
        }
        for root in &self.roots {
            if ExtensionSet::new(&root.extensions).is_empty() {
                return Err(BuildwatchError::InvalidConfig(format!(
                    "root '{}' has no extensions",
                    root.path.display()
                )));
            }
        }
        Ok(())
    }

    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce.window_ms)
    }

    /// `None` when the timeout is disabled
    pub fn build_timeout(&self) -> Option<Duration> {
        match self.build.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Build command with timeout and working directory resolved against `base_dir`
    pub fn build_command(&self, base_dir: &Path) -> BuildwatchResult<BuildCommand> {
        let command = match &self.build.command {
            CommandSpec::Shell(line) if !line.trim().is_empty() => BuildCommand::shell(line.clone()),
            CommandSpec::Argv(argv) => BuildCommand::from_argv(argv).ok_or_else(|| {
                BuildwatchError::InvalidConfig("build.command is empty".to_string())
            })?,
            CommandSpec::Shell(_) => {
                return Err(BuildwatchError::InvalidConfig(
                    "build.command is empty".to_string(),
                ))
            }
        };

        let cwd = match &self.build.cwd {
            Some(cwd) => base_dir.join(cwd),
            None => base_dir.to_path_buf(),
        };

        Ok(command.with_cwd(cwd).with_timeout(self.build_timeout()))
    }

    /// Watch roots in configured order, resolved against `base_dir`
    pub fn watch_roots(&self, base_dir: &Path) -> Vec<WatchRoot> {
        self.roots
            .iter()
            .map(|root| {
                WatchRoot::new(
                    base_dir.join(&root.path),
                    ExtensionSet::new(&root.extensions),
                    root.on_accept,
                )
                .with_label(root.path.display().to_string())
                .with_recursive(root.recursive)
            })
            .collect()
    }

    pub fn to_toml(&self) -> BuildwatchResult<String> {
        toml::to_string(self).map_err(|e| BuildwatchError::InvalidConfig(e.to_string()))
    }
}
