//! Watch pipeline
//!
//! `WatchUseCase` runs the baseline build, opens the watches and hands back
//! a `PipelineState`. Accepted changes reach the debouncer through the watch
//! callbacks; each settled burst runs one `BuildCycle` on the dispatcher.
//!
//! ## Usage
//!
//! ```ignore
//! let use_case = WatchUseCase::new(roots, window, executor, sink);
//! let state = use_case.run(running)?;
//! assert_eq!(state.phase(), Phase::Stopped);
//! ```

mod cycle;
mod lifecycle;
mod phase;
mod use_case;


pub use cycle::BuildCycle;
pub use lifecycle::PipelineState;
pub use phase::{Phase, PhaseCell};
pub use use_case::WatchUseCase;
