//! A trivial `Compiler` implementation for the toy `.lum` language.
//!
//! It doesn't codegen anything real: it concatenates a one-line summary of
//! each source file into the output path and reports back the exact list
//! of sources it was given, in order, as `requires` — good enough for this
//! crate's tests to observe that the Watch Coordinator drove the expected
//! sources through a compile.
//!
//! A source file containing the literal marker `SYNTAX_ERROR` anywhere
//! fails with `CompileError::Syntax`, which lets tests exercise the
//! recoverable-error path without a real type checker.

use crate::domain::ports::{CompileError, CompileOutcome, CompileSettings, Compiler};
use std::path::{Path, PathBuf};

pub struct ToyCompiler;

impl Compiler for ToyCompiler {
    fn compile(
        &self,
        sources: &[PathBuf],
        output_path: &Path,
        _settings: &CompileSettings,
    ) -> Result<CompileOutcome, CompileError> {
        let mut summary = String::new();
        for source in sources {
            let content = std::fs::read_to_string(source)?;
            if content.contains("SYNTAX_ERROR") {
                return Err(CompileError::Syntax {
                    file: source.clone(),
                    message: "encountered SYNTAX_ERROR marker".to_string(),
                });
            }
            summary.push_str(&format!("// {}\n", source.display()));
        }
        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(output_path, summary)?;
        Ok(CompileOutcome {
            requires: sources.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::TargetDescriptor;
    use tempfile::tempdir;

    fn settings() -> CompileSettings {
        CompileSettings {
            incremental: true,
            target: TargetDescriptor {
                architecture: "x86_64".to_string(),
            },
            flags: vec![],
        }
    }

    #[test]
    fn compiles_sources_in_order() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.lum");
        let b = dir.path().join("b.lum");
        std::fs::write(&a, "class A\nend\n").unwrap();
        std::fs::write(&b, "class B\nend\n").unwrap();
        let output = dir.path().join("out.obj");

        let compiler = ToyCompiler;
        let outcome = compiler
            .compile(&[a.clone(), b.clone()], &output, &settings())
            .unwrap();
        assert_eq!(outcome.requires, vec![a, b]);
        assert!(output.exists());
    }

    #[test]
    fn syntax_error_marker_fails_compile() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.lum");
        std::fs::write(&a, "SYNTAX_ERROR\n").unwrap();
        let output = dir.path().join("out.obj");

        let compiler = ToyCompiler;
        let result = compiler.compile(&[a], &output, &settings());
        assert!(matches!(result, Err(CompileError::Syntax { .. })));
    }
}
