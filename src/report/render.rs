//! Text rendering for watch events

use super::event::{BuildTrigger, Level, WatchEvent};
use super::theme::{self, Icon};
use crate::domain::OnAccept;

/// Lines of captured build output shown under a status line
pub const OUTPUT_TAIL_LINES: usize = 20;

/// Options that change how events are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStyle {
    pub color: bool,
    pub unicode: bool,
    /// Show captured output of successful builds too
    pub verbose: bool,
}

fn level_icon(level: Level) -> Icon {
    match level {
        Level::Info => Icon::Info,
        Level::Success => Icon::Success,
        Level::Warn => Icon::Warning,
        Level::Error => Icon::Error,
    }
}

fn event_icon(event: &WatchEvent) -> Icon {
    match event {
        WatchEvent::WatchStarted { .. } | WatchEvent::Shutdown => Icon::Watch,
        WatchEvent::FileChanged { .. } | WatchEvent::SubscriptionClosed { .. } => Icon::Arrow,
        WatchEvent::BuildStarted { .. } | WatchEvent::ShutdownRequested => Icon::Progress,
        other => level_icon(other.level()),
    }
}

/// Render one event as `[HH:MM:SS] <icon> message`, plus indented output
/// lines where the event carries build output.
pub fn render_watch_event(timestamp: &str, event: &WatchEvent, style: TextStyle) -> String {
    let prefix = format!("[{}]", timestamp);
    let icon = event_icon(event).colored(style.color, style.unicode);

    match event {
        WatchEvent::WatchStarted {
            watching,
            window_ms,
        } => format!(
            "{} {} Watching: {} (debounce {}ms)\n",
            prefix,
            icon,
            watching.join(", "),
            window_ms
        ),
        WatchEvent::WatchFailed { root, message } => {
            format!("{} {} Skipping {}: {}\n", prefix, icon, root, message)
        }
        WatchEvent::WatcherError { root, message } => {
            format!("{} {} Watcher error in {}: {}\n", prefix, icon, root, message)
        }
        WatchEvent::FileChanged {
            path, on_accept, ..
        } => match on_accept {
            OnAccept::Build => format!("{} {} Changed: {}\n", prefix, icon, path),
            OnAccept::LogOnly => format!("{} {} Changed: {} (no rebuild)\n", prefix, icon, path),
        },
        WatchEvent::BuildStarted { command, trigger } => match trigger {
            BuildTrigger::Initial => format!("{} {} Building: {}\n", prefix, icon, command),
            BuildTrigger::Change => format!("{} {} Rebuilding...\n", prefix, icon),
        },
        WatchEvent::BuildSucceeded {
            duration_ms,
            output,
        } => {
            let mut line = format!(
                "{} {} Build succeeded in {}\n",
                prefix,
                icon,
                format_duration(*duration_ms)
            );
            if style.verbose {
                line.push_str(&indent_tail(output, style.color));
            }
            line
        }
        WatchEvent::BuildFailed {
            duration_ms,
            exit_code,
            diagnostic,
        } => {
            let status = match exit_code {
                Some(code) => format!(" (exit code {})", code),
                None => String::new(),
            };
            let mut line = format!(
                "{} {} Build failed after {}{}\n",
                prefix,
                icon,
                format_duration(*duration_ms),
                status
            );
            line.push_str(&indent_tail(diagnostic, style.color));
            line
        }
        WatchEvent::ActionPanicked { message } => {
            format!("{} {} Build cycle aborted: {}\n", prefix, icon, message)
        }
        WatchEvent::Message { message, .. } => format!("{} {} {}\n", prefix, icon, message),
        WatchEvent::ShutdownRequested => format!("{} {} Stopping...\n", prefix, icon),
        WatchEvent::SubscriptionClosed { root } => {
            format!("{} {} Closed watch: {}\n", prefix, icon, root)
        }
        WatchEvent::ReleaseFailed { root, message } => {
            format!("{} {} Failed to release {}: {}\n", prefix, icon, root, message)
        }
        WatchEvent::Shutdown => format!("{} {} Watch stopped.\n", prefix, icon),
    }
}

fn format_duration(ms: u64) -> String {
    if ms < 1_000 {
        format!("{}ms", ms)
    } else {
        format!("{:.1}s", ms as f64 / 1_000.0)
    }
}

/// Last `OUTPUT_TAIL_LINES` lines of `text`, indented four spaces
fn indent_tail(text: &str, color: bool) -> String {
    let lines: Vec<&str> = text.lines().collect();
    if lines.is_empty() {
        return String::new();
    }

    let skip = lines.len().saturating_sub(OUTPUT_TAIL_LINES);
    let mut out = String::new();
    if skip > 0 {
        let note = format!("... {} earlier lines omitted", skip);
        out.push_str(&format!("    {}\n", theme::dim(&note, color)));
    }
    for line in &lines[skip..] {
        out.push_str(&format!("    {}\n", theme::dim(line, color)));
    }
    out
}
