//! Trailing-edge debouncer
//!
//! `schedule` posts a trigger onto a channel drained by a single dispatcher
//! thread. The dispatcher is the only owner of the pending timer, so there is
//! never more than one: a trigger that arrives while one is pending replaces
//! it and restarts the full window. The action runs on the dispatcher thread
//! once the window passes with no further triggers.
//!
//! Triggers that arrive while an action is running wait in the channel and
//! open a fresh window when the action returns.

use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Mutex;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Default quiet window in milliseconds
pub const DEFAULT_WINDOW_MS: u64 = 300;

type Action = Box<dyn FnOnce() + Send + 'static>;
type PanicHandler = Box<dyn Fn(String) + Send + 'static>;

enum Signal {
    Trigger(Action),
    Stop,
}

struct Pending {
    deadline: Instant,
    action: Action,
}

/// Pending-timer state. Lives on the dispatcher thread only.
#[derive(Default)]
struct DebounceState {
    pending: Option<Pending>,
}

impl DebounceState {
    /// Arm (or re-arm) the timer. Any previously pending action is dropped.
    fn arm(&mut self, action: Action, window: Duration) {
        self.pending = Some(Pending {
            deadline: Instant::now() + window,
            action,
        });
    }

    /// How long the dispatcher may block before the pending timer is due
    fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|p| p.deadline.saturating_duration_since(now))
    }

    fn take_due(&mut self, now: Instant) -> Option<Action> {
        match &self.pending {
            Some(p) if p.deadline <= now => self.pending.take().map(|p| p.action),
            _ => None,
        }
    }
}

/// Cloneable sender side of a [`Debouncer`].
///
/// Handed to watch callbacks so each one can post triggers without sharing
/// the debouncer itself.
#[derive(Clone)]
pub struct DebounceHandle {
    tx: Sender<Signal>,
}

impl DebounceHandle {
    /// Post a trigger. Returns `false` once the debouncer has shut down.
    pub fn schedule<F>(&self, action: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        self.tx.send(Signal::Trigger(Box::new(action))).is_ok()
    }
}

/// Coalesces bursts of triggers into one action per quiet window.
pub struct Debouncer {
    window: Duration,
    handle: DebounceHandle,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    /// Start a dispatcher with a fixed quiet window.
    ///
    /// Panics inside an action are swallowed; use
    /// [`Debouncer::with_panic_handler`] to observe them.
    pub fn new(window: Duration) -> io::Result<Self> {
        Self::with_panic_handler(window, |_| {})
    }

    /// Start a dispatcher that reports action panics to `on_panic`.
    ///
    /// Fails if the dispatcher thread cannot be spawned.
    pub fn with_panic_handler<H>(window: Duration, on_panic: H) -> io::Result<Self>
    where
        H: Fn(String) + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let on_panic: PanicHandler = Box::new(on_panic);
        let worker = thread::Builder::new()
            .name("buildwatch-debounce".to_string())
            .spawn(move || dispatch(rx, window, on_panic))?;

        Ok(Self {
            window,
            handle: DebounceHandle { tx },
            worker: Mutex::new(Some(worker)),
        })
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Fire `action` once no trigger has arrived for a full window.
    ///
    /// Replaces any action still waiting for its window to elapse.
    pub fn schedule<F>(&self, action: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        self.handle.schedule(action)
    }

    pub fn handle(&self) -> DebounceHandle {
        self.handle.clone()
    }

    /// Stop the dispatcher, dropping any action that has not fired yet.
    ///
    /// Waits for a running action to finish unless called from inside one.
    /// Safe to call more than once.
    pub fn shutdown(&self) {
        let _ = self.handle.tx.send(Signal::Stop);

        let worker = match self.worker.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };

        if let Some(worker) = worker {
            if worker.thread().id() != thread::current().id() {
                let _ = worker.join();
            }
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn dispatch(rx: Receiver<Signal>, window: Duration, on_panic: PanicHandler) {
    let mut state = DebounceState::default();

    loop {
        let signal = match state.remaining(Instant::now()) {
            None => match rx.recv() {
                Ok(signal) => Some(signal),
                Err(_) => return,
            },
            Some(wait) => match rx.recv_timeout(wait) {
                Ok(signal) => Some(signal),
                Err(RecvTimeoutError::Timeout) => None,
                Err(RecvTimeoutError::Disconnected) => return,
            },
        };

        match signal {
            Some(Signal::Trigger(action)) => state.arm(action, window),
            Some(Signal::Stop) => return,
            None => {
                if let Some(action) = state.take_due(Instant::now()) {
                    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(action)) {
                        on_panic(panic_message(payload.as_ref()));
                    }
                }
            }
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "debounced action panicked".to_string()
    }
}
