//! Per-root reaction to accepted changes

use serde::{Deserialize, Serialize};

/// What a watch root does with a change that passed its filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OnAccept {
    /// Schedule a debounced rebuild
    #[default]
    Build,
    /// Report the change, never build
    LogOnly,
}

impl OnAccept {
    pub fn triggers_build(self) -> bool {
        matches!(self, OnAccept::Build)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OnAccept::Build => "build",
            OnAccept::LogOnly => "log-only",
        }
    }
}

impl std::fmt::Display for OnAccept {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_only_never_triggers_build() {
        assert!(OnAccept::Build.triggers_build());
        assert!(!OnAccept::LogOnly.triggers_build());
    }

    #[test]
    fn serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&OnAccept::LogOnly).unwrap(),
            "\"log-only\""
        );
    }
}
