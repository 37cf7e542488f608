//! Watch use case
//!
//! Wires the pieces together: baseline build, debouncer, watches.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::debounce::{DebounceHandle, Debouncer};
use crate::domain::BuildExecutor;
use crate::error::BuildwatchResult;
use crate::report::{BuildTrigger, Level, WatchEvent, WatchEventSink};
use crate::watch::{RebuildTrigger, WatchManager, WatchRoot};

use super::cycle::BuildCycle;
use super::lifecycle::PipelineState;
use super::phase::{Phase, PhaseCell};

/// How often `run` checks the running flag
const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub struct WatchUseCase {
    roots: Vec<WatchRoot>,
    window: Duration,
    executor: Arc<dyn BuildExecutor>,
    sink: Arc<dyn WatchEventSink>,
}

impl WatchUseCase {
    pub fn new(
        roots: Vec<WatchRoot>,
        window: Duration,
        executor: Arc<dyn BuildExecutor>,
        sink: Arc<dyn WatchEventSink>,
    ) -> Self {
        Self {
            roots,
            window,
            executor,
            sink,
        }
    }

    /// Run the baseline build, then open the watches.
    ///
    /// Returns once the pipeline is `Watching`; the caller owns shutdown.
    /// Fails only if the debounce dispatcher cannot be started.
    pub fn start(&self) -> BuildwatchResult<Arc<PipelineState>> {
        let phase = Arc::new(PhaseCell::new(Phase::Starting));
        let cycle = Arc::new(BuildCycle::new(
            Arc::clone(&self.executor),
            Arc::clone(&self.sink),
            Arc::clone(&phase),
        ));

        cycle.run(BuildTrigger::Initial);

        let panic_sink = Arc::clone(&self.sink);
        let debouncer = Debouncer::with_panic_handler(self.window, move |message| {
            panic_sink.on_event(&WatchEvent::ActionPanicked { message });
        })?;

        let rebuild = rebuild_trigger(
            debouncer.handle(),
            cycle,
            Arc::clone(&phase),
            Arc::clone(&self.sink),
        );

        let subscriptions = WatchManager::new(Arc::clone(&self.sink)).start(&self.roots, rebuild);
        let state = PipelineState::new(
            subscriptions,
            debouncer,
            Arc::clone(&phase),
            Arc::clone(&self.sink),
        )
        .with_executor(Arc::clone(&self.executor));
        let state = Arc::new(state);

        let watching = state.watching();
        if watching.is_empty() {
            self.sink.on_event(&WatchEvent::Message {
                level: Level::Warn,
                message: "Nothing is being watched; press Ctrl+C to exit".to_string(),
            });
        }
        self.sink.on_event(&WatchEvent::WatchStarted {
            watching,
            window_ms: u64::try_from(self.window.as_millis()).unwrap_or(u64::MAX),
        });

        phase.transition(Phase::Starting, Phase::Watching);
        Ok(state)
    }

    /// Start, block until `running` goes false, then shut down.
    pub fn run(&self, running: Arc<AtomicBool>) -> BuildwatchResult<Arc<PipelineState>> {
        let state = self.start()?;

        while running.load(Ordering::SeqCst) && !state.is_stopped() {
            thread::sleep(POLL_INTERVAL);
        }

        state.shutdown();
        Ok(state)
    }
}

/// Callback the watches fire on an accepted change.
///
/// A refused trigger outside shutdown is reported as a warning.
pub(super) fn rebuild_trigger(
    handle: DebounceHandle,
    cycle: Arc<BuildCycle>,
    phase: Arc<PhaseCell>,
    sink: Arc<dyn WatchEventSink>,
) -> RebuildTrigger {
    Arc::new(move || {
        let cycle = Arc::clone(&cycle);
        let scheduled = handle.schedule(move || {
            cycle.run(BuildTrigger::Change);
        });
        if !scheduled && !phase.get().is_terminal() {
            sink.on_event(&WatchEvent::Message {
                level: Level::Warn,
                message: "Rebuild dropped: debouncer is not running".to_string(),
            });
        }
    })
}
