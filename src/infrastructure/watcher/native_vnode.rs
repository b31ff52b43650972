//! Per-file native backend: registers one watch per requested file instead
//! of watching its parent directory. If registering any single path fails
//! (exhausted descriptor table, path removed mid-registration), that one
//! path is dropped with a warning and the rest proceed — per §7, a
//! single-path registration failure is recoverable, not fatal.

use super::FileWatcher;
use crate::error::{LumenError, LumenResult};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

pub struct NativeVnodeWatcher {
    inner: RecommendedWatcher,
    rx: Receiver<notify::Result<Event>>,
    watched: HashSet<PathBuf>,
}

impl NativeVnodeWatcher {
    pub fn new() -> notify::Result<Self> {
        let (tx, rx) = mpsc::channel();
        let inner = RecommendedWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            notify::Config::default(),
        )?;
        Ok(Self {
            inner,
            rx,
            watched: HashSet::new(),
        })
    }
}

impl FileWatcher for NativeVnodeWatcher {
    fn watch(&mut self, paths: &HashSet<PathBuf>) -> LumenResult<()> {
        for stale in self.watched.difference(paths) {
            let _ = self.inner.unwatch(stale);
        }

        let mut registered = HashSet::new();
        let mut first_failure = None;
        for path in paths {
            if self.watched.contains(path) {
                registered.insert(path.clone());
                continue;
            }
            match self.inner.watch(path, RecursiveMode::NonRecursive) {
                Ok(()) => {
                    registered.insert(path.clone());
                }
                Err(err) => {
                    eprintln!("warning: failed to watch {}: {err}", path.display());
                    first_failure.get_or_insert_with(|| LumenError::WatcherRegistration {
                        path: path.clone(),
                        message: err.to_string(),
                    });
                }
            }
        }

        self.watched = registered;
        // Individual registration failures are swallowed above (recoverable
        // per §7); we still surface the first one to the caller so it can
        // log/count it without losing the remaining successfully-watched
        // paths.
        if let Some(err) = first_failure {
            if self.watched.is_empty() {
                return Err(err);
            }
        }
        Ok(())
    }

    fn wait_for_changes(&mut self, debounce: Duration, max_wait: Duration) -> LumenResult<HashSet<PathBuf>> {
        let mut changed = HashSet::new();
        match self.rx.recv_timeout(max_wait) {
            Ok(first) => absorb(first, &mut changed),
            Err(mpsc::RecvTimeoutError::Timeout) => return Ok(changed),
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                return Err(LumenError::WatcherConstruction(
                    "watcher event channel disconnected".to_string(),
                ))
            }
        }

        let deadline = Instant::now() + debounce;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            match self.rx.recv_timeout(remaining) {
                Ok(event) => absorb(event, &mut changed),
                Err(_) => break,
            }
        }
        Ok(changed)
    }
}

fn absorb(event: notify::Result<Event>, out: &mut HashSet<PathBuf>) {
    let Ok(event) = event else { return };
    for path in event.paths {
        out.insert(path);
    }
}
