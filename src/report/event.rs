//! Watch event types
//!
//! Every status line the pipeline prints starts life as a `WatchEvent`.
//! Text and NDJSON renderings are both derived from it.

use serde::Serialize;

use crate::domain::{BuildResult, ChangeKind, OnAccept};

/// Severity of a status line
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Success,
    Warn,
    Error,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Info => "info",
            Level::Success => "success",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }
}

/// Why a build is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildTrigger {
    /// Baseline build before any watch is opened
    Initial,
    /// A debounced burst of edits settled
    Change,
}

/// Events emitted during a watch session
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WatchEvent {
    /// Watches are open
    WatchStarted { watching: Vec<String>, window_ms: u64 },
    /// A root could not be watched and was skipped
    WatchFailed { root: String, message: String },
    /// The watch backend reported an error for a live root
    WatcherError { root: String, message: String },
    /// A change passed a root's filter
    FileChanged {
        root: String,
        path: String,
        kind: ChangeKind,
        on_accept: OnAccept,
    },
    BuildStarted {
        command: String,
        trigger: BuildTrigger,
    },
    BuildSucceeded {
        duration_ms: u64,
        #[serde(skip_serializing_if = "String::is_empty")]
        output: String,
    },
    BuildFailed {
        duration_ms: u64,
        exit_code: Option<i32>,
        diagnostic: String,
    },
    /// A debounced action panicked; only that trigger is lost
    ActionPanicked { message: String },
    /// Free-form status line
    Message { level: Level, message: String },
    ShutdownRequested,
    SubscriptionClosed { root: String },
    ReleaseFailed { root: String, message: String },
    /// Watch stopped
    Shutdown,
}

impl WatchEvent {
    /// Success/failure event for a finished build
    pub fn from_result(result: &BuildResult) -> Self {
        if result.is_success() {
            WatchEvent::BuildSucceeded {
                duration_ms: result.duration_ms(),
                output: result.output.clone(),
            }
        } else {
            WatchEvent::BuildFailed {
                duration_ms: result.duration_ms(),
                exit_code: result.exit_code,
                diagnostic: result.diagnostic.clone().unwrap_or_default(),
            }
        }
    }

    pub fn level(&self) -> Level {
        match self {
            WatchEvent::BuildSucceeded { .. } => Level::Success,
            WatchEvent::BuildFailed { .. } | WatchEvent::ActionPanicked { .. } => Level::Error,
            WatchEvent::WatchFailed { .. }
            | WatchEvent::WatcherError { .. }
            | WatchEvent::ReleaseFailed { .. } => Level::Warn,
            WatchEvent::Message { level, .. } => *level,
            _ => Level::Info,
        }
    }

    /// NDJSON line with `command`, `level` and `timestamp` fields added
    pub fn to_json(&self, timestamp: &str) -> String {
        let mut value =
            serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({"event": "error"}));
        if let Some(obj) = value.as_object_mut() {
            obj.insert("command".to_string(), serde_json::json!("watch"));
            obj.insert("level".to_string(), serde_json::json!(self.level().as_str()));
            obj.insert("timestamp".to_string(), serde_json::json!(timestamp));
        }
        serde_json::to_string(&value).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_to_json_file_changed() {
        let event = WatchEvent::FileChanged {
            root: "src".to_string(),
            path: "app/main.ts".to_string(),
            kind: ChangeKind::Modified,
            on_accept: OnAccept::Build,
        };
        let json = event.to_json("2026-01-01T00:00:00+00:00");
        assert!(json.contains("\"event\":\"file_changed\""));
        assert!(json.contains("\"path\":\"app/main.ts\""));
        assert!(json.contains("\"kind\":\"modified\""));
        assert!(json.contains("\"on_accept\":\"build\""));
        assert!(json.contains("\"command\":\"watch\""));
        assert!(json.contains("\"level\":\"info\""));
    }

    #[test]
    fn test_to_json_build_failed_escapes_diagnostic() {
        let event = WatchEvent::BuildFailed {
            duration_ms: 12,
            exit_code: Some(1),
            diagnostic: "Cannot find \"foo\"".to_string(),
        };
        let json = event.to_json("t");
        assert!(json.contains("\"event\":\"build_failed\""));
        assert!(json.contains("\"level\":\"error\""));
        assert!(json.contains("\\\"foo\\\""));
    }

    #[test]
    fn test_success_omits_empty_output() {
        let event = WatchEvent::BuildSucceeded {
            duration_ms: 5,
            output: String::new(),
        };
        assert!(!event.to_json("t").contains("output"));
    }

    #[test]
    fn test_from_result() {
        let ok = BuildResult::success(Duration::from_millis(40));
        assert!(matches!(
            WatchEvent::from_result(&ok),
            WatchEvent::BuildSucceeded { duration_ms: 40, .. }
        ));

        let failed = BuildResult::failure("boom", Duration::from_millis(3)).with_exit_code(Some(2));
        assert_eq!(
            WatchEvent::from_result(&failed),
            WatchEvent::BuildFailed {
                duration_ms: 3,
                exit_code: Some(2),
                diagnostic: "boom".to_string(),
            }
        );
    }

    #[test]
    fn test_levels() {
        assert_eq!(WatchEvent::Shutdown.level(), Level::Info);
        assert_eq!(
            WatchEvent::WatchFailed {
                root: "x".into(),
                message: "y".into()
            }
            .level(),
            Level::Warn
        );
        assert_eq!(
            WatchEvent::Message {
                level: Level::Error,
                message: "m".into()
            }
            .level(),
            Level::Error
        );
    }
}
