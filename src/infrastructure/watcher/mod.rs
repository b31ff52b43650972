//! File Watcher (C1): native backends plus a polling fallback, behind one
//! trait object so the Watch Coordinator never has to know which is live.

mod native_dir;
mod native_vnode;
mod polling;

pub use native_dir::NativeDirWatcher;
pub use native_vnode::NativeVnodeWatcher;
pub use polling::PollingWatcher;

use crate::error::{LumenError, LumenResult};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

pub trait FileWatcher {
    /// Replace the set of watched paths. Individual registration failures
    /// are recoverable: that path is dropped with a warning rather than
    /// failing the whole call, per §7.
    fn watch(&mut self, paths: &HashSet<PathBuf>) -> LumenResult<()>;

    /// Wait up to `max_wait` for a first change; if none arrives, return an
    /// empty set so the caller can check its interrupt flag and call again
    /// (this is what makes Ctrl-C responsive without touching
    /// async-signal-unsafe state from inside a signal handler). Once a
    /// first change is seen, debounce locally for `debounce` before
    /// returning the accumulated batch.
    fn wait_for_changes(&mut self, debounce: Duration, max_wait: Duration) -> LumenResult<HashSet<PathBuf>>;
}

/// Construct the watcher backend for this run. `--poll` always wins over
/// platform preference; absent that, the native backend most appropriate
/// for this OS's filesystem event facility is used (directory-level
/// watching almost everywhere; per-file descriptors on the BSD/kqueue
/// family, where they're cheap and immune to the rename-then-recreate
/// gotchas directory watches have).
pub fn create(force_poll: bool, poll_interval: Duration) -> LumenResult<Box<dyn FileWatcher>> {
    if force_poll {
        return Ok(Box::new(PollingWatcher::new(poll_interval)));
    }
    if cfg!(any(
        target_os = "macos",
        target_os = "freebsd",
        target_os = "netbsd",
        target_os = "openbsd"
    )) {
        NativeVnodeWatcher::new()
            .map(|w| Box::new(w) as Box<dyn FileWatcher>)
            .map_err(|e| LumenError::WatcherConstruction(e.to_string()))
    } else {
        NativeDirWatcher::new()
            .map(|w| Box::new(w) as Box<dyn FileWatcher>)
            .map_err(|e| LumenError::WatcherConstruction(e.to_string()))
    }
}
