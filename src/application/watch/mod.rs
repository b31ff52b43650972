//! Watch orchestration
//!
//! This module implements continuous, incremental compilation driven by
//! filesystem events. It wires together every component C2-C10:
//!
//! - `fingerprint_store` - C2, the in-memory fingerprint record
//! - `parse_cache` - C4, clone-on-read parsed-AST cache
//! - `parallel_parser` - C5, the worker pool plus its sequential fallback
//! - `discover` - C3, the require-graph walk
//! - `cache` - C9, the on-disk side of the incremental cache
//! - `event` - the `WatchEvent` lifecycle enum and debounce accumulator
//! - `coordinator` - C10, the main loop that owns all of the above
//!
//! C1 (the File Watcher backends) lives in `infrastructure::watcher`; this
//! module only depends on its `FileWatcher` trait.

mod cache;
mod coordinator;
mod discover;
mod event;
mod fingerprint_store;
mod parallel_parser;
mod parse_cache;


pub use coordinator::{CoordinatorOptions, CycleOutcome, CycleReport, WatchCoordinator};
pub use event::{DebounceState, WatchEvent};
pub use fingerprint_store::FingerprintStore;
pub use parallel_parser::{ParallelParserConfig, ParallelParserStats, ParseJob, ParseResults};
pub use parse_cache::ParseCache;

pub use cache::{cache_file_path, changed_files, load as load_cache, save as save_cache};
pub use discover::{discover, DiscoveryOutcome};
