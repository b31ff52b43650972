//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer; the
//! infrastructure layer and, in tests, the toy `.lum` implementation,
//! provide concrete adapters.

mod compiler;
mod path_resolver;
mod source_parser;

pub use compiler::{CompileError, CompileOutcome, CompileSettings, Compiler, TargetDescriptor};
pub use path_resolver::{PathResolver, ResolveError};
pub use source_parser::{ParseError, SourceParser, SymbolInterner};
