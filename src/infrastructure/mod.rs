//! Infrastructure Layer
//!
//! Concrete implementations of domain ports; this is the only layer that
//! touches the file system or spawns OS threads.
//!
//! ## Structure
//!
//! - `watcher/` - the three File Watcher backends (C1) behind one trait
//! - `toylang/` - a minimal concrete `Compiler`/`SourceParser`/`PathResolver`
//!   for a toy `.lum` language, used to drive this crate's own tests

pub mod toylang;
pub mod watcher;

pub use toylang::{ToyCompiler, ToyParser, ToyPathResolver};
pub use watcher::{create as create_watcher, FileWatcher};
