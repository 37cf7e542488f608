//! Outcome of one build invocation

use std::time::Duration;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildOutcome {
    Success,
    Failure,
}

/// Result of a single build cycle. Reported, then discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildResult {
    pub outcome: BuildOutcome,
    /// Why the build failed (captured error text, spawn error, timeout)
    pub diagnostic: Option<String>,
    /// Everything the command wrote, stdout then stderr
    pub output: String,
    pub exit_code: Option<i32>,
    pub duration: Duration,
}

impl BuildResult {
    pub fn success(duration: Duration) -> Self {
        Self {
            outcome: BuildOutcome::Success,
            diagnostic: None,
            output: String::new(),
            exit_code: Some(0),
            duration,
        }
    }

    pub fn failure(diagnostic: impl Into<String>, duration: Duration) -> Self {
        Self {
            outcome: BuildOutcome::Failure,
            diagnostic: Some(diagnostic.into()),
            output: String::new(),
            exit_code: None,
            duration,
        }
    }

    pub fn with_exit_code(mut self, code: Option<i32>) -> Self {
        self.exit_code = code;
        self
    }

    pub fn with_output(mut self, output: String) -> Self {
        self.output = output;
        self
    }

    pub fn is_success(&self) -> bool {
        self.outcome == BuildOutcome::Success
    }

    pub fn duration_ms(&self) -> u64 {
        u64::try_from(self.duration.as_millis()).unwrap_or(u64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_carries_diagnostic() {
        let result = BuildResult::failure("exit status: 2", Duration::from_millis(15))
            .with_exit_code(Some(2));

        assert!(!result.is_success());
        assert_eq!(result.diagnostic.as_deref(), Some("exit status: 2"));
        assert_eq!(result.exit_code, Some(2));
        assert_eq!(result.duration_ms(), 15);
    }

    #[test]
    fn success_has_no_diagnostic() {
        let result = BuildResult::success(Duration::ZERO);
        assert!(result.is_success());
        assert!(result.diagnostic.is_none());
    }
}
