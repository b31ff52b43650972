//! Polling fallback: a plain mtime ticker. Always available, platform
//! independent, and the backend exercised in CI (universal invariant 7).

use super::FileWatcher;
use crate::error::LumenResult;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::thread::sleep;
use std::time::{Duration, Instant, SystemTime};

pub struct PollingWatcher {
    poll_interval: Duration,
    watched: HashSet<PathBuf>,
    last_seen: HashMap<PathBuf, Option<SystemTime>>,
}

impl PollingWatcher {
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            poll_interval,
            watched: HashSet::new(),
            last_seen: HashMap::new(),
        }
    }

    fn mtime_of(path: &PathBuf) -> Option<SystemTime> {
        std::fs::metadata(path).ok()?.modified().ok()
    }
}

impl FileWatcher for PollingWatcher {
    fn watch(&mut self, paths: &HashSet<PathBuf>) -> LumenResult<()> {
        self.last_seen
            .retain(|path, _| paths.contains(path));
        for path in paths {
            self.last_seen
                .entry(path.clone())
                .or_insert_with(|| Self::mtime_of(path));
        }
        self.watched = paths.clone();
        Ok(())
    }

    fn wait_for_changes(&mut self, debounce: Duration, max_wait: Duration) -> LumenResult<HashSet<PathBuf>> {
        let mut changed = HashSet::new();
        let wait_deadline = Instant::now() + max_wait;
        loop {
            for path in &self.watched {
                let current = Self::mtime_of(path);
                let previous = self.last_seen.get(path).copied().flatten();
                if current != previous {
                    changed.insert(path.clone());
                    self.last_seen.insert(path.clone(), current);
                }
            }
            if !changed.is_empty() {
                break;
            }
            if Instant::now() >= wait_deadline {
                return Ok(changed);
            }
            sleep(self.poll_interval);
        }

        // Debounce: keep ticking (and absorbing further changes) until the
        // window has passed quietly.
        let deadline = Instant::now() + debounce;
        while Instant::now() < deadline {
            sleep(self.poll_interval.min(debounce));
            for path in &self.watched {
                let current = Self::mtime_of(path);
                let previous = self.last_seen.get(path).copied().flatten();
                if current != previous {
                    changed.insert(path.clone());
                    self.last_seen.insert(path.clone(), current);
                }
            }
        }
        Ok(changed)
    }
}
