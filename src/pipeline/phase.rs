//! Pipeline phase

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// `Starting -> Watching <-> Building -> ShuttingDown -> Stopped`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Phase {
    /// Baseline build, no watches yet
    Starting = 0,
    Watching = 1,
    Building = 2,
    ShuttingDown = 3,
    Stopped = 4,
}

impl Phase {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Phase::Starting,
            1 => Phase::Watching,
            2 => Phase::Building,
            3 => Phase::ShuttingDown,
            _ => Phase::Stopped,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Starting => "starting",
            Phase::Watching => "watching",
            Phase::Building => "building",
            Phase::ShuttingDown => "shutting-down",
            Phase::Stopped => "stopped",
        }
    }

    /// Shutdown has begun or finished
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::ShuttingDown | Phase::Stopped)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phase shared between the dispatcher, the watch callbacks and shutdown
#[derive(Debug)]
pub struct PhaseCell(AtomicU8);

impl PhaseCell {
    pub fn new(phase: Phase) -> Self {
        Self(AtomicU8::new(phase as u8))
    }

    pub fn get(&self) -> Phase {
        Phase::from_u8(self.0.load(Ordering::SeqCst))
    }

    pub fn set(&self, phase: Phase) {
        self.0.store(phase as u8, Ordering::SeqCst);
    }

    /// Move `from -> to` only if the phase is still `from`
    pub fn transition(&self, from: Phase, to: Phase) -> bool {
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}

impl Default for PhaseCell {
    fn default() -> Self {
        Self::new(Phase::Starting)
    }
}
