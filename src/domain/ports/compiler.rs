//! The `Compiler` collaborator contract (§6.1).
//!
//! The real parse → collect → infer → codegen → optimize → object → link
//! pipeline lives outside this crate. The Watch Coordinator only ever needs
//! to ask it to build a set of sources into an output artifact and to learn
//! which files actually participated, so that the require graph used for
//! the next cycle's dependency analysis stays in sync with what the
//! collaborator itself observed.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct TargetDescriptor {
    pub architecture: String,
}

#[derive(Debug, Clone)]
pub struct CompileSettings {
    pub incremental: bool,
    pub target: TargetDescriptor,
    pub flags: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CompileOutcome {
    /// Every source file that contributed to this compilation, in the order
    /// the collaborator visited them.
    pub requires: Vec<PathBuf>,
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("syntax error in {file}: {message}")]
    Syntax { file: PathBuf, message: String },
    #[error("semantic error in {file}: {message}")]
    Semantic { file: PathBuf, message: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub trait Compiler {
    fn compile(
        &self,
        sources: &[PathBuf],
        output_path: &Path,
        settings: &CompileSettings,
    ) -> Result<CompileOutcome, CompileError>;
}
