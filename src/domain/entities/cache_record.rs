//! On-disk shape of the Incremental Cache (C9).

use crate::domain::entities::fingerprint::FileFingerprint;
use crate::domain::entities::module_map::ModuleFileMap;
use crate::domain::entities::signature::FileTopLevelSignature;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Sizing hints so the next cold start can pre-allocate the structures the
/// parser/compiler collaborators build, instead of growing them from zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AllocationHints {
    pub string_pool_capacity: usize,
    pub type_count: usize,
    pub def_count: usize,
    pub module_count: usize,
}

/// The full persisted cache record. Loading one whose `compiler_version`,
/// `codegen_target`, `flags`, or `prelude_identity` disagree with the
/// current build is a cache miss, not a partial hit (universal invariant 9).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncrementalCacheRecord {
    pub compiler_version: String,
    pub codegen_target: String,
    /// Sorted, for stable on-disk field ordering.
    pub flags: Vec<String>,
    pub prelude_identity: String,
    pub file_fingerprints: BTreeMap<PathBuf, FileFingerprint>,
    pub module_file_map: Option<ModuleFileMap>,
    pub file_signatures: Option<BTreeMap<PathBuf, FileTopLevelSignature>>,
    pub allocation_hints: Option<AllocationHints>,
    pub file_dependencies: Option<BTreeMap<PathBuf, BTreeSet<PathBuf>>>,
}

impl IncrementalCacheRecord {
    pub fn new(
        compiler_version: String,
        codegen_target: String,
        mut flags: Vec<String>,
        prelude_identity: String,
    ) -> Self {
        flags.sort();
        Self {
            compiler_version,
            codegen_target,
            flags,
            prelude_identity,
            file_fingerprints: BTreeMap::new(),
            module_file_map: None,
            file_signatures: None,
            allocation_hints: None,
            file_dependencies: None,
        }
    }

    /// Whether this record was produced by the same build identity as the
    /// one currently running.
    pub fn matches_identity(
        &self,
        compiler_version: &str,
        codegen_target: &str,
        flags: &[String],
        prelude_identity: &str,
    ) -> bool {
        let mut sorted_flags = flags.to_vec();
        sorted_flags.sort();
        self.compiler_version == compiler_version
            && self.codegen_target == codegen_target
            && self.flags == sorted_flags
            && self.prelude_identity == prelude_identity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_identity_is_order_independent_over_flags() {
        let record = IncrementalCacheRecord::new(
            "0.1.0".into(),
            "x86_64-linux".into(),
            vec!["b".into(), "a".into()],
            "prelude-v1".into(),
        );
        assert!(record.matches_identity(
            "0.1.0",
            "x86_64-linux",
            &["a".into(), "b".into()],
            "prelude-v1"
        ));
    }

    #[test]
    fn mismatched_version_fails_identity() {
        let record =
            IncrementalCacheRecord::new("0.1.0".into(), "x86_64-linux".into(), vec![], "p".into());
        assert!(!record.matches_identity("0.2.0", "x86_64-linux", &[], "p"));
    }
}
