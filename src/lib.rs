//! buildwatch - rebuild on save
//!
//! Watches one or more source roots, coalesces bursts of edits into a single
//! rebuild, runs an external build command and reports the outcome as
//! timestamped status lines.
//!
//! Data flow: notify event -> `watch` (router) -> `filter` -> `debounce` ->
//! `pipeline::BuildCycle` -> `build` -> `report`.

pub mod build;
pub mod config;
pub mod debounce;
pub mod domain;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod report;
pub mod watch;

// Re-exports for convenience
pub use build::{BuildCommand, BuildRunner};
pub use config::{Config, LoadedConfig};
pub use debounce::{DebounceHandle, Debouncer};
pub use domain::{BuildExecutor, BuildOutcome, BuildResult, ChangeKind, FileChangeEvent, OnAccept};
pub use error::{BuildwatchError, BuildwatchResult};
pub use filter::{accept, ExtensionSet};
pub use pipeline::{Phase, PipelineState, WatchUseCase};
pub use report::{Level, Reporter, WatchEvent, WatchEventSink};
pub use watch::{WatchManager, WatchRoot, WatchSubscription};
