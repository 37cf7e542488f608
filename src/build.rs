//! Build runner
//!
//! Runs the configured build command to completion and folds every outcome
//! (clean exit, non-zero exit, spawn error, timeout) into a `BuildResult`.
//! Output is captured, never streamed.
//!
//! On unix each build runs in its own process group, so a timeout or a
//! shutdown takes down everything the command started, not just the shell.

use std::fmt;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::Mutex;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::domain::{BuildExecutor, BuildResult};

/// How often a running build is polled when a timeout is set
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// How long a timed-out build gets between SIGTERM and SIGKILL
const KILL_GRACE: Duration = Duration::from_millis(500);

/// Default timeout budget in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// External command to execute for one build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildCommand {
    program: String,
    args: Vec<String>,
    /// Original shell line, kept for display
    shell_line: Option<String>,
    cwd: Option<PathBuf>,
    timeout: Option<Duration>,
}

impl BuildCommand {
    /// Explicit program + arguments, no shell involved
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            shell_line: None,
            cwd: None,
            timeout: None,
        }
    }

    /// Run `line` through the platform shell (`sh -c` / `cmd /C`)
    pub fn shell(line: impl Into<String>) -> Self {
        let line = line.into();
        let (program, flag) = if cfg!(windows) {
            ("cmd", "/C")
        } else {
            ("sh", "-c")
        };
        Self {
            program: program.to_string(),
            args: vec![flag.to_string(), line.clone()],
            shell_line: Some(line),
            cwd: None,
            timeout: None,
        }
    }

    /// First element is the program. `None` for an empty vector.
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self::new(program.clone(), args.to_vec()))
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// `None` lets the build run for as long as it likes
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl fmt::Display for BuildCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(line) = &self.shell_line {
            return f.write_str(line);
        }
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Blocking build executor backed by `std::process`.
#[derive(Debug)]
pub struct BuildRunner {
    command: BuildCommand,
    /// Process group of the build currently running, if any
    running: Mutex<Option<u32>>,
}

impl BuildRunner {
    pub fn new(command: BuildCommand) -> Self {
        Self {
            command,
            running: Mutex::new(None),
        }
    }

    pub fn command(&self) -> &BuildCommand {
        &self.command
    }

    fn spawn(&self) -> io::Result<Child> {
        let mut cmd = Command::new(&self.command.program);
        cmd.args(&self.command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(cwd) = &self.command.cwd {
            cmd.current_dir(cwd);
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }
        cmd.spawn()
    }

    fn set_running(&self, pid: Option<u32>) {
        *self.running.lock().unwrap_or_else(|p| p.into_inner()) = pid;
    }
}

impl BuildExecutor for BuildRunner {
    fn run(&self) -> BuildResult {
        let started = Instant::now();

        let mut child = match self.spawn() {
            Ok(child) => child,
            Err(e) => {
                return BuildResult::failure(
                    format!("failed to start `{}`: {}", self.command, e),
                    started.elapsed(),
                );
            }
        };

        let stdout = child.stdout.take().map(capture);
        let stderr = child.stderr.take().map(capture);

        self.set_running(Some(child.id()));
        let waited = wait_with_budget(&mut child, self.command.timeout);
        self.set_running(None);

        match waited {
            Ok(Some(status)) => {
                let stdout = collect(stdout);
                let stderr = collect(stderr);
                finish(status, stdout, stderr, started.elapsed())
            }
            Ok(None) => {
                // A process that left the group may still hold the pipes
                // open; the capture threads finish on their own.
                let budget = self.command.timeout.unwrap_or_default();
                BuildResult::failure(
                    format!("timed out after {}s and was killed", budget.as_secs_f32()),
                    started.elapsed(),
                )
            }
            Err(e) => {
                kill_build(&mut child);
                BuildResult::failure(
                    format!("failed waiting for `{}`: {}", self.command, e),
                    started.elapsed(),
                )
            }
        }
    }

    fn describe(&self) -> String {
        self.command.to_string()
    }

    fn terminate(&self) {
        let running = self.running.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(pid) = *running {
            #[cfg(unix)]
            signal_group(pid, libc::SIGTERM);
            #[cfg(not(unix))]
            let _ = pid;
        }
    }
}

fn finish(status: ExitStatus, stdout: String, stderr: String, elapsed: Duration) -> BuildResult {
    let output = join_output(&stdout, &stderr);

    if status.success() {
        return BuildResult::success(elapsed)
            .with_exit_code(status.code())
            .with_output(output);
    }

    let captured = if stderr.trim().is_empty() {
        stdout.trim()
    } else {
        stderr.trim()
    };
    let diagnostic = if captured.is_empty() {
        format!("build {}", status)
    } else {
        format!("build {}\n{}", status, captured)
    };

    BuildResult::failure(diagnostic, elapsed)
        .with_exit_code(status.code())
        .with_output(output)
}

/// Wait for `child`, killing it if `budget` runs out.
///
/// `Ok(None)` means the budget was exceeded.
fn wait_with_budget(child: &mut Child, budget: Option<Duration>) -> io::Result<Option<ExitStatus>> {
    let Some(budget) = budget else {
        return child.wait().map(Some);
    };

    // A budget too large to represent is no budget at all
    let Some(deadline) = Instant::now().checked_add(budget) else {
        return child.wait().map(Some);
    };

    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            kill_build(child);
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Stop `child` and everything it started: SIGTERM to the process group,
/// a short grace period, then SIGKILL.
fn kill_build(child: &mut Child) {
    #[cfg(unix)]
    {
        let pgid = child.id();
        signal_group(pgid, libc::SIGTERM);
        let grace = Instant::now() + KILL_GRACE;
        while Instant::now() < grace {
            if matches!(child.try_wait(), Ok(Some(_))) {
                break;
            }
            thread::sleep(POLL_INTERVAL);
        }
        // Stragglers that outlived the shell
        signal_group(pgid, libc::SIGKILL);
    }
    let _ = child.kill();
    let _ = child.wait();
}

#[cfg(unix)]
fn signal_group(pgid: u32, signal: libc::c_int) {
    let Ok(pgid) = libc::pid_t::try_from(pgid) else {
        return;
    };
    // SAFETY: killpg only delivers a signal; a group that is already gone
    // yields ESRCH, which is ignored.
    unsafe {
        libc::killpg(pgid, signal);
    }
}

fn capture<R: Read + Send + 'static>(mut reader: R) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = reader.read_to_end(&mut buf);
        buf
    })
}

fn collect(handle: Option<JoinHandle<Vec<u8>>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}

fn join_output(stdout: &str, stderr: &str) -> String {
    match (stdout.trim_end(), stderr.trim_end()) {
        ("", "") => String::new(),
        (out, "") => out.to_string(),
        ("", err) => err.to_string(),
        (out, err) => format!("{}\n{}", out, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BuildOutcome;

    #[test]
    fn test_display_prefers_shell_line() {
        let cmd = BuildCommand::shell("npm run build");
        assert_eq!(cmd.to_string(), "npm run build");

        let cmd = BuildCommand::new("cargo", vec!["build".into(), "--release".into()]);
        assert_eq!(cmd.to_string(), "cargo build --release");
    }

    #[test]
    fn test_from_argv_rejects_empty() {
        assert!(BuildCommand::from_argv(&[]).is_none());
        let cmd = BuildCommand::from_argv(&["make".to_string()]).unwrap();
        assert_eq!(cmd.to_string(), "make");
    }

    #[test]
    fn test_missing_program_is_a_failure_not_a_panic() {
        let runner = BuildRunner::new(BuildCommand::new(
            "buildwatch-definitely-not-a-real-program",
            vec![],
        ));
        let result = runner.run();

        assert_eq!(result.outcome, BuildOutcome::Failure);
        let diagnostic = result.diagnostic.unwrap();
        assert!(diagnostic.contains("failed to start"), "{diagnostic}");
        assert_eq!(result.exit_code, None);
    }

    #[test]
    fn test_join_output() {
        assert_eq!(join_output("", ""), "");
        assert_eq!(join_output("built\n", ""), "built");
        assert_eq!(join_output("built\n", "warn\n"), "built\nwarn");
    }

    #[cfg(unix)]
    mod unix {
        use super::*;

        fn run(line: &str) -> BuildResult {
            BuildRunner::new(BuildCommand::shell(line)).run()
        }

        #[test]
        fn test_zero_exit_is_success() {
            let result = run("echo compiled");
            assert!(result.is_success());
            assert_eq!(result.exit_code, Some(0));
            assert_eq!(result.output, "compiled");
        }

        #[test]
        fn test_non_zero_exit_captures_stderr() {
            let result = run("echo 'src/a.ts(3,1): error TS1005' >&2; exit 2");

            assert!(!result.is_success());
            assert_eq!(result.exit_code, Some(2));
            let diagnostic = result.diagnostic.unwrap();
            assert!(diagnostic.contains("error TS1005"), "{diagnostic}");
        }

        #[test]
        fn test_falls_back_to_stdout_when_stderr_empty() {
            let result = run("echo 'lint failed'; exit 1");
            assert!(result.diagnostic.unwrap().contains("lint failed"));
        }

        #[test]
        fn test_always_failing_command_fails_every_time() {
            let runner = BuildRunner::new(BuildCommand::shell("exit 1"));
            for _ in 0..3 {
                let result = runner.run();
                assert_eq!(result.outcome, BuildOutcome::Failure);
            }
        }

        #[test]
        fn test_timeout_kills_build() {
            let runner = BuildRunner::new(
                BuildCommand::shell("exec sleep 5").with_timeout(Some(Duration::from_millis(200))),
            );
            let result = runner.run();

            assert!(!result.is_success());
            assert!(result.diagnostic.unwrap().contains("timed out"));
            assert!(result.duration < Duration::from_secs(3));
        }

        #[test]
        fn test_timeout_kills_processes_started_by_the_shell() {
            let dir = tempfile::tempdir().unwrap();
            let marker = dir.path().join("marker");

            let runner = BuildRunner::new(
                BuildCommand::shell("(sleep 1; touch marker); true")
                    .with_cwd(dir.path())
                    .with_timeout(Some(Duration::from_millis(200))),
            );
            let result = runner.run();
            assert!(result.diagnostic.unwrap().contains("timed out"));

            thread::sleep(Duration::from_millis(1500));
            assert!(!marker.exists(), "subshell outlived the timeout");
        }

        #[test]
        fn test_huge_timeout_waits_instead_of_panicking() {
            let runner = BuildRunner::new(
                BuildCommand::shell("echo done")
                    .with_timeout(Some(Duration::from_secs(u64::MAX))),
            );
            let result = runner.run();

            assert!(result.is_success());
            assert_eq!(result.output, "done");
        }

        #[test]
        fn test_terminate_stops_running_build() {
            use std::sync::Arc;

            let runner = Arc::new(BuildRunner::new(BuildCommand::shell("sleep 5; true")));
            let worker = {
                let runner = Arc::clone(&runner);
                thread::spawn(move || runner.run())
            };

            thread::sleep(Duration::from_millis(200));
            let started = Instant::now();
            runner.terminate();
            let result = worker.join().unwrap();

            assert!(!result.is_success());
            assert!(started.elapsed() < Duration::from_secs(3));
        }

        #[test]
        fn test_terminate_without_running_build_is_noop() {
            let runner = BuildRunner::new(BuildCommand::shell("true"));
            runner.terminate();
            assert!(runner.run().is_success());
        }

        #[test]
        fn test_runs_in_configured_directory() {
            let dir = tempfile::tempdir().unwrap();
            std::fs::write(dir.path().join("marker.txt"), "here").unwrap();

            let runner =
                BuildRunner::new(BuildCommand::shell("cat marker.txt").with_cwd(dir.path()));
            let result = runner.run();

            assert!(result.is_success());
            assert_eq!(result.output, "here");
        }

        #[test]
        fn test_large_output_does_not_deadlock() {
            let result = run("i=0; while [ $i -lt 20000 ]; do echo line $i; i=$((i+1)); done >&2; exit 1");
            assert!(!result.is_success());
            assert!(result.output.len() > 100_000);
        }
    }
}
