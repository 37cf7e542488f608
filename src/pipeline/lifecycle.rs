//! Lifecycle controller
//!
//! Owns everything a running pipeline holds: the watch subscriptions, the
//! debouncer and the phase. Shutdown releases them in that order.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::debounce::Debouncer;
use crate::domain::BuildExecutor;
use crate::error::BuildwatchError;
use crate::report::{WatchEvent, WatchEventSink};
use crate::watch::WatchSubscription;

use super::phase::{Phase, PhaseCell};

pub struct PipelineState {
    subscriptions: Mutex<Vec<WatchSubscription>>,
    debouncer: Debouncer,
    phase: Arc<PhaseCell>,
    shutdown_started: AtomicBool,
    sink: Arc<dyn WatchEventSink>,
    /// Stopped on shutdown if a build is running
    executor: Option<Arc<dyn BuildExecutor>>,
}

impl PipelineState {
    pub fn new(
        subscriptions: Vec<WatchSubscription>,
        debouncer: Debouncer,
        phase: Arc<PhaseCell>,
        sink: Arc<dyn WatchEventSink>,
    ) -> Self {
        Self {
            subscriptions: Mutex::new(subscriptions),
            debouncer,
            phase,
            shutdown_started: AtomicBool::new(false),
            sink,
            executor: None,
        }
    }

    pub fn with_executor(mut self, executor: Arc<dyn BuildExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase.get()
    }

    pub fn is_stopped(&self) -> bool {
        self.phase() == Phase::Stopped
    }

    pub fn active_subscriptions(&self) -> usize {
        self.lock_subscriptions()
            .iter()
            .filter(|s| s.is_active())
            .count()
    }

    /// Labels of the roots currently watched
    pub fn watching(&self) -> Vec<String> {
        self.lock_subscriptions()
            .iter()
            .filter(|s| s.is_active())
            .map(|s| s.label().to_string())
            .collect()
    }

    /// Close every subscription, stop the debouncer, reach `Stopped`.
    ///
    /// Returns `false` if another call already started the shutdown. A
    /// pending rebuild is dropped; a build already running is asked to
    /// terminate and waited for.
    pub fn shutdown(&self) -> bool {
        if self.shutdown_started.swap(true, Ordering::SeqCst) {
            return false;
        }

        self.phase.set(Phase::ShuttingDown);
        self.sink.on_event(&WatchEvent::ShutdownRequested);

        {
            let mut subscriptions = self.lock_subscriptions();
            for subscription in subscriptions.iter_mut() {
                let root = subscription.label().to_string();
                match subscription.close() {
                    Ok(true) => self.sink.on_event(&WatchEvent::SubscriptionClosed { root }),
                    Ok(false) => {}
                    Err(e) => self.sink.on_event(&WatchEvent::ReleaseFailed {
                        root,
                        message: release_message(e),
                    }),
                }
            }
        }

        if let Some(executor) = &self.executor {
            executor.terminate();
        }
        self.debouncer.shutdown();

        self.phase.set(Phase::Stopped);
        self.sink.on_event(&WatchEvent::Shutdown);
        true
    }

    fn lock_subscriptions(&self) -> MutexGuard<'_, Vec<WatchSubscription>> {
        self.subscriptions.lock().unwrap_or_else(|p| p.into_inner())
    }
}

fn release_message(err: BuildwatchError) -> String {
    match err {
        BuildwatchError::Release { message, .. } => message,
        other => other.to_string(),
    }
}
