//! Domain Layer
//!
//! The pure core of lumenc: fingerprints, signatures, the require graph, and
//! the services that reason about them, none of it touching the filesystem
//! or a thread.
//!
//! ## Structure
//!
//! - `entities/` - data shapes (`FileFingerprint`, `ParsedUnit`, `RequireEdge`,
//!   signatures, `ModuleFileMap`, `IncrementalCacheRecord`)
//! - `value_objects/` - immutable value types (`ContentHash`)
//! - `services/` - `SignatureExtractor`, `ChangeClassifier`, `ModuleSkipPlanner`
//! - `ports/` - `Compiler`, `SourceParser`, `PathResolver` traits
//!
//! ## Design Principles
//!
//! 1. **No I/O** - this layer never touches the file system or network directly
//! 2. **Pure Functions** - services are stateless and testable
//! 3. **Ports & Adapters** - all I/O goes through trait-defined ports

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
