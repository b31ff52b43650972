//! Application Layer
//!
//! Orchestration that sits between the pure domain layer and the concrete
//! infrastructure adapters. This crate has exactly one use case: watch mode.
//!
//! - Depends on the Domain layer (entities, services, ports).
//! - Does NOT contain business rules (those live in `domain::services`).
//! - Coordinates the File Watcher, Parse Cache, Parallel Parser, Require
//!   Graph Discoverer, and Incremental Cache into one build-cycle loop.

pub mod watch;

pub use watch::{
    CoordinatorOptions, CycleOutcome, CycleReport, ParallelParserConfig, WatchCoordinator,
    WatchEvent,
};
