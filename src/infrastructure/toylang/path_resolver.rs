//! A directory-relative path resolver for the toy `.lum` language.
//!
//! `require "./foo"` resolves to `./foo.lum` next to the requiring file, or
//! (if `foo` names a directory) to every `.lum` file inside it in sorted
//! order. Everything else is resolved relative to a fixed source root
//! instead of the requiring file.

use crate::domain::ports::{PathResolver, ResolveError};
use std::path::{Path, PathBuf};

pub struct ToyPathResolver {
    pub source_root: PathBuf,
}

impl ToyPathResolver {
    pub fn new(source_root: PathBuf) -> Self {
        Self { source_root }
    }

    fn candidate_base(&self, import: &str, relative_to: Option<&Path>) -> PathBuf {
        if let Some(stripped) = import.strip_prefix("./").or_else(|| import.strip_prefix("../")) {
            let base = relative_to
                .and_then(Path::parent)
                .map(Path::to_path_buf)
                .unwrap_or_else(|| self.source_root.clone());
            if import.starts_with("../") {
                base.join("..").join(stripped)
            } else {
                base.join(stripped)
            }
        } else {
            self.source_root.join(import)
        }
    }
}

impl PathResolver for ToyPathResolver {
    fn find(&self, import: &str, relative_to: Option<&Path>) -> Result<Vec<PathBuf>, ResolveError> {
        let base = self.candidate_base(import, relative_to);

        let as_file = {
            let mut p = base.clone();
            if p.extension().is_none() {
                p.set_extension("lum");
            }
            p
        };
        if as_file.is_file() {
            return Ok(vec![as_file]);
        }

        if base.is_dir() {
            let mut files: Vec<PathBuf> = std::fs::read_dir(&base)
                .map_err(|_| ResolveError::NotFound {
                    import: import.to_string(),
                    relative_to: relative_to.map(Path::to_path_buf),
                })?
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("lum"))
                .collect();
            files.sort();
            if !files.is_empty() {
                return Ok(files);
            }
        }

        Err(ResolveError::NotFound {
            import: import.to_string(),
            relative_to: relative_to.map(Path::to_path_buf),
        })
    }
}
