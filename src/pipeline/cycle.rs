//! Run-and-report build cycle

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::debounce::panic_message;
use crate::domain::{BuildExecutor, BuildResult};
use crate::report::{BuildTrigger, WatchEvent, WatchEventSink};

use super::phase::{Phase, PhaseCell};

/// One build attempt: `BuildStarted`, run, then exactly one of
/// `BuildSucceeded` / `BuildFailed`.
pub struct BuildCycle {
    executor: Arc<dyn BuildExecutor>,
    sink: Arc<dyn WatchEventSink>,
    phase: Arc<PhaseCell>,
    builds: AtomicUsize,
}

impl BuildCycle {
    pub fn new(
        executor: Arc<dyn BuildExecutor>,
        sink: Arc<dyn WatchEventSink>,
        phase: Arc<PhaseCell>,
    ) -> Self {
        Self {
            executor,
            sink,
            phase,
            builds: AtomicUsize::new(0),
        }
    }

    /// Builds attempted so far
    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }

    /// Run one build and report it.
    ///
    /// `None` if shutdown has already begun. The baseline build runs in
    /// `Starting` and leaves the phase alone; later builds move
    /// `Watching -> Building -> Watching`.
    pub fn run(&self, trigger: BuildTrigger) -> Option<BuildResult> {
        let entered = match self.phase.get() {
            Phase::Starting => false,
            Phase::Watching => {
                if !self.phase.transition(Phase::Watching, Phase::Building) {
                    return None;
                }
                true
            }
            Phase::Building | Phase::ShuttingDown | Phase::Stopped => return None,
        };

        self.builds.fetch_add(1, Ordering::SeqCst);
        self.sink.on_event(&WatchEvent::BuildStarted {
            command: self.executor.describe(),
            trigger,
        });

        let started = Instant::now();
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.executor.run()))
            .unwrap_or_else(|payload| {
                BuildResult::failure(
                    format!("build runner panicked: {}", panic_message(payload.as_ref())),
                    started.elapsed(),
                )
            });

        self.sink.on_event(&WatchEvent::from_result(&result));

        if entered {
            // Shutdown may have moved us on mid-build; leave that phase alone.
            self.phase.transition(Phase::Building, Phase::Watching);
        }

        Some(result)
    }
}
