//! The `PathResolver` collaborator contract (§6.1).

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("could not resolve '{import}' relative to {relative_to:?}")]
    NotFound {
        import: String,
        relative_to: Option<PathBuf>,
    },
}

pub trait PathResolver {
    /// Resolve a `require` string to zero or more candidate source files.
    /// More than one candidate can occur for directory-style requires
    /// (`require "./foo"` matching `foo.lum` and `foo/**/*.lum`).
    fn find(&self, import: &str, relative_to: Option<&Path>) -> Result<Vec<PathBuf>, ResolveError>;
}
