//! Common test utilities for buildwatch scenario tests.
//!
//! - Fake build executors that record when they ran
//! - `wait_until` for polling asynchronous outcomes
//! - `edit` for touching watched files

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use buildwatch::{BuildExecutor, BuildResult};

/// Generous upper bound for filesystem notifications to arrive
pub const SETTLE: Duration = Duration::from_secs(5);

/// Poll `cond` until it holds or `timeout` passes
pub fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(20));
    }
    cond()
}

/// Write `contents` to `path`, creating parent directories
pub fn edit(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

/// Executor that records the start instant of every run
pub struct RecordingExecutor {
    starts: Mutex<Vec<Instant>>,
    succeed: bool,
    delay: Duration,
}

impl RecordingExecutor {
    pub fn succeeding() -> Self {
        Self {
            starts: Mutex::new(Vec::new()),
            succeed: true,
            delay: Duration::ZERO,
        }
    }

    pub fn failing() -> Self {
        Self {
            succeed: false,
            ..Self::succeeding()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::succeeding()
        }
    }

    pub fn runs(&self) -> usize {
        self.starts.lock().unwrap().len()
    }

    pub fn starts(&self) -> Vec<Instant> {
        self.starts.lock().unwrap().clone()
    }
}

impl BuildExecutor for RecordingExecutor {
    fn run(&self) -> BuildResult {
        self.starts.lock().unwrap().push(Instant::now());
        thread::sleep(self.delay);
        if self.succeed {
            BuildResult::success(self.delay)
        } else {
            BuildResult::failure("build exited with status 1", self.delay).with_exit_code(Some(1))
        }
    }

    fn describe(&self) -> String {
        "fake build".to_string()
    }
}

/// Counts calls without doing anything
#[derive(Default)]
pub struct CountingExecutor(pub AtomicUsize);

impl BuildExecutor for CountingExecutor {
    fn run(&self) -> BuildResult {
        self.0.fetch_add(1, Ordering::SeqCst);
        BuildResult::success(Duration::ZERO)
    }
}
