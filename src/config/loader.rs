//! Configuration loading

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{BuildwatchError, BuildwatchResult};

use super::types::{ColorMode, CommandSpec, Config};

/// Project config file name, looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = "buildwatch.toml";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown config key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        Ok(())
    }
}

/// Configuration plus where it came from
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    /// File the config was read from; `None` for built-in defaults
    pub source: Option<PathBuf>,
    /// Directory relative roots and `build.cwd` resolve against
    pub base_dir: PathBuf,
    pub warnings: Vec<ConfigWarning>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> BuildwatchResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| BuildwatchError::ConfigParse {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// `<config dir>/buildwatch/config.toml`
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("buildwatch").join("config.toml"))
}

/// Resolve configuration with the full hierarchy:
///
/// 1. `explicit` path (must exist)
/// 2. `buildwatch.toml` in `cwd`
/// 3. user config
/// 4. built-in defaults
///
/// Environment overrides (`BUILDWATCH_*`) are applied on top.
pub fn load(explicit: Option<&Path>, cwd: &Path) -> BuildwatchResult<LoadedConfig> {
    load_from(explicit, cwd, user_config_path(), |key| std::env::var(key).ok())
}

pub fn load_from(
    explicit: Option<&Path>,
    cwd: &Path,
    user_config: Option<PathBuf>,
    get_env: impl Fn(&str) -> Option<String>,
) -> BuildwatchResult<LoadedConfig> {
    let mut loaded = match explicit {
        Some(path) => {
            let path = cwd.join(path);
            if !path.is_file() {
                return Err(BuildwatchError::ConfigNotFound { path });
            }
            from_file(path, None)?
        }
        None => {
            let project = cwd.join(PROJECT_CONFIG_FILE);
            if project.is_file() {
                from_file(project, None)?
            } else {
                match user_config.filter(|p| p.is_file()) {
                    // Relative roots in a user config are relative to where we run
                    Some(user) => from_file(user, Some(cwd))?,
                    None => LoadedConfig {
                        config: Config::default(),
                        source: None,
                        base_dir: cwd.to_path_buf(),
                        warnings: Vec::new(),
                    },
                }
            }
        }
    };

    loaded.config = with_env_overrides_from(loaded.config, get_env)?;
    Ok(loaded)
}

fn from_file(path: PathBuf, base_dir: Option<&Path>) -> BuildwatchResult<LoadedConfig> {
    let (config, warnings) = load_with_warnings(&path)?;
    let base_dir = match base_dir {
        Some(dir) => dir.to_path_buf(),
        None => path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    Ok(LoadedConfig {
        config,
        source: Some(path),
        base_dir,
        warnings,
    })
}

/// Apply environment variable overrides (BUILDWATCH_* prefix)
fn with_env_overrides_from(
    mut config: Config,
    get_env: impl Fn(&str) -> Option<String>,
) -> BuildwatchResult<Config> {
    // BUILDWATCH_BUILD_COMMAND (shell line)
    if let Some(command) = get_env("BUILDWATCH_BUILD_COMMAND") {
        if !command.trim().is_empty() {
            config.build.command = CommandSpec::Shell(command);
        }
    }

    // BUILDWATCH_DEBOUNCE_MS
    if let Some(ms) = get_env("BUILDWATCH_DEBOUNCE_MS") {
        config.debounce.window_ms = parse_number("BUILDWATCH_DEBOUNCE_MS", &ms)?;
    }

    // BUILDWATCH_BUILD_TIMEOUT_SECS
    if let Some(secs) = get_env("BUILDWATCH_BUILD_TIMEOUT_SECS") {
        config.build.timeout_secs = parse_number("BUILDWATCH_BUILD_TIMEOUT_SECS", &secs)?;
    }

    // BUILDWATCH_COLOR
    if let Some(color) = get_env("BUILDWATCH_COLOR") {
        config.output.color = match color.to_lowercase().as_str() {
            "always" => ColorMode::Always,
            "never" => ColorMode::Never,
            _ => ColorMode::Auto,
        };
    }

    Ok(config)
}

fn parse_number(key: &str, raw: &str) -> BuildwatchResult<u64> {
    raw.trim().parse().map_err(|_| {
        BuildwatchError::InvalidConfig(format!("{} must be a whole number, got '{}'", key, raw))
    })
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "build",
        "command",
        "timeout_secs",
        "cwd",
        "debounce",
        "window_ms",
        "output",
        "color",
        "unicode",
        "roots",
        "path",
        "extensions",
        "on_accept",
        "recursive",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] =
                std::cmp::min(std::cmp::min(prev[j + 1] + 1, curr[j] + 1), prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
