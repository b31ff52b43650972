//! Error types for lumenc.
//!
//! Follows the same split the rest of the crate uses: a single
//! `thiserror`-derived enum for the library surface, with `anyhow` taking
//! over at the CLI boundary in `main.rs`.

use std::path::PathBuf;
use thiserror::Error;

pub type LumenResult<T> = Result<T, LumenError>;

#[derive(Error, Debug)]
pub enum LumenError {
    /// A parse error reported by the parser collaborator. Recoverable: the
    /// coordinator reports it and keeps watching.
    #[error("syntax error in {file}: {message}")]
    Syntax { file: PathBuf, message: String },

    /// A semantic error reported by the compiler collaborator. Recoverable.
    #[error("semantic error in {file}: {message}")]
    Semantic { file: PathBuf, message: String },

    /// Reading a source file failed. Recoverable.
    #[error("failed to read {path}: {source}")]
    SourceIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A `require` string did not resolve to any file. Recoverable: the
    /// requesting file is skipped for this cycle.
    #[error("could not resolve '{import}' required from {from}")]
    ResolveNotFound { import: String, from: PathBuf },

    /// Registering a single path with the native watcher failed while other
    /// paths succeeded. Recoverable: that file is dropped from the watch set
    /// with a warning.
    #[error("failed to watch {path}: {message}")]
    WatcherRegistration { path: PathBuf, message: String },

    /// No watcher backend could be constructed at all. Fatal.
    #[error("failed to construct a file watcher: {0}")]
    WatcherConstruction(String),

    /// The on-disk incremental cache failed to load or save. Recoverable:
    /// treated as a full cache miss.
    #[error("incremental cache error: {0}")]
    Cache(String),

    /// The loaded cache's version/target/flags/prelude do not match the
    /// current build. Recoverable: the cache is discarded and rebuilt.
    #[error(
        "cache mismatch: expected compiler_version={expected_version} target={expected_target}, \
         found compiler_version={found_version} target={found_target}"
    )]
    CacheMismatch {
        expected_version: String,
        expected_target: String,
        found_version: String,
        found_target: String,
    },

    /// Launching the `--run` child process failed. Recoverable: reported,
    /// loop continues without a running child.
    #[error("failed to launch child process {command}: {source}")]
    ChildLaunch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LumenError {
    /// Whether the Watch Coordinator should keep running after this error,
    /// per the recoverable/fatal taxonomy.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, LumenError::WatcherConstruction(_))
    }
}
