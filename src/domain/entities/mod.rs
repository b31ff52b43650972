//! Domain Entities
//!
//! The data shapes the incremental core reasons about: fingerprints, parsed
//! units, the require graph, signatures, the module-file map, and the
//! on-disk cache record.

pub mod ast;
pub mod cache_record;
pub mod fingerprint;
pub mod module_map;
pub mod parsed_unit;
pub mod require_edge;
pub mod signature;

pub use ast::{Arg, AstNode, Literal, MacroCond};
pub use cache_record::{AllocationHints, IncrementalCacheRecord};
pub use fingerprint::FileFingerprint;
pub use module_map::ModuleFileMap;
pub use parsed_unit::ParsedUnit;
pub use require_edge::RequireEdge;
pub use signature::{DeclKind, FileTopLevelSignature, MethodSig, TypeDeclarationSig};
