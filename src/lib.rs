//! lumenc - the incremental compilation core for the Lumen ahead-of-time
//! compiler's watch mode.
//!
//! On every source change, lumenc re-discovers the reachable file set,
//! re-parses only what changed, classifies whether each change is
//! structural or body-only, and decides per codegen module whether its
//! cached object artefact can be reused — then drives the compile/run
//! cycle loop that `watch` exposes at the CLI boundary.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use application::{CoordinatorOptions, CycleOutcome, CycleReport, WatchCoordinator};
pub use config::{BuildFlags, WatchConfig};
pub use error::{LumenError, LumenResult};
