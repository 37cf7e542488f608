//! Ports
//!
//! Seams between the pipeline and the outside world. The real adapters live
//! in `build` (process spawn) and `watch` (notify); tests substitute fakes.

use std::path::Path;

use super::build_result::BuildResult;

/// Anything that can run one build to completion.
///
/// Implementations must never panic or return early with an error: every
/// failure mode is folded into a failed `BuildResult`.
pub trait BuildExecutor: Send + Sync {
    fn run(&self) -> BuildResult;

    /// Human-readable description of what `run` executes
    fn describe(&self) -> String {
        "build".to_string()
    }

    /// Ask a build running on another thread to stop. `run` still returns
    /// its (failed) result.
    fn terminate(&self) {}
}

/// A live watch registration that can be torn down.
pub trait WatchHandle: Send {
    fn release(&mut self, root: &Path) -> Result<(), String>;
}
