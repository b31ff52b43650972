//! Directory-level native backend: watches each requested file's parent
//! directory (non-recursively) and filters incoming events down to the
//! requested file set. Cheap on OSes where per-file handles are a scarce
//! resource (inotify's per-process watch limit, Windows's
//! `ReadDirectoryChangesW`), at the cost of having to filter out sibling
//! noise.

use super::FileWatcher;
use crate::error::{LumenError, LumenResult};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

pub struct NativeDirWatcher {
    inner: RecommendedWatcher,
    rx: Receiver<notify::Result<Event>>,
    watched_dirs: HashSet<PathBuf>,
    watched_files: HashSet<PathBuf>,
}

impl NativeDirWatcher {
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
            watched_dirs: HashSet::new(),
            watched_files: HashSet::new(),
        })
    }
}

impl FileWatcher for NativeDirWatcher {
    fn watch(&mut self, paths: &HashSet<PathBuf>) -> LumenResult<()> {
        let mut wanted_dirs = HashSet::new();
        for path in paths {
            if let Some(parent) = path.parent() {
                wanted_dirs.insert(parent.to_path_buf());
            }
        }

        for stale in self.watched_dirs.difference(&wanted_dirs) {
            let _ = self.inner.unwatch(stale);
        }
        for fresh in wanted_dirs.difference(&self.watched_dirs) {
            if let Err(err) = self.inner.watch(fresh, RecursiveMode::NonRecursive) {
                return Err(LumenError::WatcherRegistration {
                    path: fresh.clone(),
                    message: err.to_string(),
                });
            }
        }

        self.watched_dirs = wanted_dirs;
        self.watched_files = paths.clone();
        Ok(())
    }

    fn wait_for_changes(&mut self, debounce: Duration, max_wait: Duration) -> LumenResult<HashSet<PathBuf>> {
        let mut changed = HashSet::new();
        match self.rx.recv_timeout(max_wait) {
            Ok(first) => absorb(first, &self.watched_files, &mut changed),
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
                Ok(event) => absorb(event, &self.watched_files, &mut changed),
                Err(mpsc::RecvTimeoutError::Timeout) => break,
                Err(mpsc::RecvTimeoutError::Disconnected) => break,
            }
        }
        Ok(changed)
    }
}

fn absorb(event: notify::Result<Event>, watched_files: &HashSet<PathBuf>, out: &mut HashSet<PathBuf>) {
    let Ok(event) = event else { return };
    for path in event.paths {
        if watched_files.contains(&path) {
            out.insert(path);
        }
    }
}
