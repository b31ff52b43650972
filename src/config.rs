//! Configuration for `lumenc watch`.
//!
//! Inputs are layered explicit CLI flag > environment variable > built-in
//! default, the same order the teacher's `Config` applies across its
//! project/user/default file hierarchy — `lumenc` just has no config file,
//! since the spec names none. `BuildFlags` resolves the three environment
//! variables the core honors (`PARALLEL_PARSE`, `CACHE_DIR`, `WORKERS`);
//! everything else (debounce, poll backend, run-args, target) is CLI-only
//! and lives on `cli::Commands::Watch` directly.

use std::path::PathBuf;

/// Settings sourced from environment variables rather than CLI flags,
/// because the CLI surface (spec §6.2) doesn't expose equivalents for them.
#[derive(Debug, Clone)]
pub struct BuildFlags {
    /// `PARALLEL_PARSE=0` disables the worker pool; unset or any other
    /// value enables it.
    pub parallel_parse: bool,
    /// `WORKERS` worker-pool size; falls back to the available parallelism.
    pub workers: usize,
}

impl BuildFlags {
    pub fn from_env() -> Self {
        let parallel_parse = std::env::var("PARALLEL_PARSE")
            .map(|v| v != "0")
            .unwrap_or(true);
        let workers = std::env::var("WORKERS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(1)
            });
        Self {
            parallel_parse,
            workers,
        }
    }

    /// The effective worker count to pass to the Parallel Parser: 1 (i.e.
    /// the sequential path) if parallel parsing is disabled, `workers`
    /// otherwise.
    pub fn effective_worker_count(&self) -> usize {
        if self.parallel_parse {
            self.workers
        } else {
            1
        }
    }
}

/// Everything `main` needs to build a `WatchCoordinator`, combining CLI
/// flags with the environment-resolved `BuildFlags`.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    pub cache_dir: PathBuf,
    pub build: BuildFlags,
}

impl WatchConfig {
    /// `CACHE_DIR` overrides the cache root; otherwise falls back to the
    /// platform's conventional per-user cache directory, under `lumenc/`.
    pub fn resolve() -> Self {
        let cache_dir = std::env::var("CACHE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::cache_dir()
                    .unwrap_or_else(std::env::temp_dir)
                    .join("lumenc")
            });
        Self {
            cache_dir,
            build: BuildFlags::from_env(),
        }
    }
}
