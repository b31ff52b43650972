//! Watch event types and debounce state.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Lifecycle events emitted by the Watch Coordinator, representable both as
/// a human-readable line and as one NDJSON record when `--json` is passed.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WatchEvent {
    /// The watcher has registered its path set and is blocking for changes.
    Watching { watching: Vec<String> },
    /// One or more files changed and a cycle is about to start.
    FileChanged { paths: Vec<String> },
    /// Discovery + parse + compile cycle started.
    Compiling,
    /// Compilation completed successfully.
    Compiled {
        requires_count: usize,
        modules_rebuilt: usize,
        modules_reused: usize,
        elapsed_ms: u128,
    },
    /// Compilation failed; the loop continues watching regardless.
    CompileError { message: String },
    /// The `--run` child process was (re)launched.
    Running { pid: u32 },
    /// The `--run` child process exited.
    ChildExited { code: Option<i32> },
    /// Ctrl-C was received; cleanup is in progress.
    Interrupted,
}

impl WatchEvent {
    pub fn to_json(&self) -> String {
        let mut value =
            serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({"event": "error"}));
        if let Some(obj) = value.as_object_mut() {
            obj.insert("command".to_string(), serde_json::json!("watch"));
        }
        serde_json::to_string(&value).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn human_readable(&self) -> String {
        match self {
            WatchEvent::Watching { watching } => format!("watching {} file(s)", watching.len()),
            WatchEvent::FileChanged { paths } => format!("changed: {}", paths.join(", ")),
            WatchEvent::Compiling => "compiling...".to_string(),
            WatchEvent::Compiled {
                requires_count,
                modules_rebuilt,
                modules_reused,
                elapsed_ms,
            } => format!(
                "compiled {requires_count} file(s), {modules_rebuilt} module(s) rebuilt, \
                 {modules_reused} reused ({elapsed_ms}ms)"
            ),
            WatchEvent::CompileError { message } => format!("error: {message}"),
            WatchEvent::Running { pid } => format!("running (pid {pid})"),
            WatchEvent::ChildExited { code } => match code {
                Some(code) => format!("child exited with code {code}"),
                None => "child exited".to_string(),
            },
            WatchEvent::Interrupted => "interrupted, shutting down".to_string(),
        }
    }
}

/// Debounce accumulator: collects changed paths until `debounce` has passed
/// since the most recent change, then hands the whole batch back at once.
#[derive(Debug)]
pub struct DebounceState {
    pending: HashSet<PathBuf>,
    last_change: Option<Instant>,
    debounce: Duration,
}

impl DebounceState {
    pub fn new(debounce: Duration) -> Self {
        Self {
            pending: HashSet::new(),
            last_change: None,
            debounce,
        }
    }

    pub fn record_change(&mut self, path: PathBuf) {
        self.pending.insert(path);
        self.last_change = Some(Instant::now());
    }

    pub fn record_changes(&mut self, paths: impl IntoIterator<Item = PathBuf>) {
        for path in paths {
            self.record_change(path);
        }
    }

    pub fn ready(&self) -> bool {
        match self.last_change {
            Some(last) => !self.pending.is_empty() && last.elapsed() >= self.debounce,
            None => false,
        }
    }

    pub fn take(&mut self) -> Vec<PathBuf> {
        self.last_change = None;
        self.pending.drain().collect()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}
