//! Change Classifier (C7): partitions changed files into body-only and
//! structural changes.
//!
//! A file with no prior signature (new file) is always structural. A file
//! whose signature is unchanged (per `FileTopLevelSignature`'s `PartialEq`,
//! which itself always treats `has_macro_calls` files as changed) is
//! body-only.

use crate::domain::entities::signature::FileTopLevelSignature;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationResult {
    pub body_only: BTreeSet<PathBuf>,
    pub structural: BTreeSet<PathBuf>,
}

pub fn classify(
    changed_paths: &[PathBuf],
    old_signatures: Option<&BTreeMap<PathBuf, FileTopLevelSignature>>,
    new_signatures: &BTreeMap<PathBuf, FileTopLevelSignature>,
) -> ClassificationResult {
    let mut result = ClassificationResult::default();
    for path in changed_paths {
        let is_structural = match (old_signatures.and_then(|m| m.get(path)), new_signatures.get(path)) {
            (Some(old), Some(new)) => old != new,
            _ => true,
        };
        if is_structural {
            result.structural.insert(path.clone());
        } else {
            result.body_only.insert(path.clone());
        }
    }
    result
}

/// Every module that transitively contains a structurally changed file must
/// be rebuilt; this is the bridge into `ModuleSkipPlanner` (C8).
pub fn structurally_affected<'a>(
    classification: &'a ClassificationResult,
    modules_containing: impl Fn(&Path) -> Vec<&'a str>,
) -> BTreeSet<&'a str> {
    let mut affected = BTreeSet::new();
    for path in &classification.structural {
        for module in modules_containing(path) {
            affected.insert(module);
        }
    }
    affected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sig(macro_calls: bool) -> FileTopLevelSignature {
        let mut s = FileTopLevelSignature::empty();
        s.has_macro_calls = macro_calls;
        s
    }

    #[test]
    fn new_file_without_old_signature_is_structural() {
        let path = PathBuf::from("a.lum");
        let mut new_sigs = BTreeMap::new();
        new_sigs.insert(path.clone(), sig(false));
        let result = classify(&[path.clone()], None, &new_sigs);
        assert!(result.structural.contains(&path));
    }

    #[test]
    fn identical_signature_is_body_only() {
        let path = PathBuf::from("a.lum");
        let mut old_sigs = BTreeMap::new();
        old_sigs.insert(path.clone(), sig(false));
        let mut new_sigs = BTreeMap::new();
        new_sigs.insert(path.clone(), sig(false));
        let result = classify(&[path.clone()], Some(&old_sigs), &new_sigs);
        assert!(result.body_only.contains(&path));
    }

    #[test]
    fn macro_call_signature_is_always_structural() {
        let path = PathBuf::from("a.lum");
        let mut old_sigs = BTreeMap::new();
        old_sigs.insert(path.clone(), sig(true));
        let mut new_sigs = BTreeMap::new();
        new_sigs.insert(path.clone(), sig(true));
        let result = classify(&[path.clone()], Some(&old_sigs), &new_sigs);
        assert!(result.structural.contains(&path));
    }
}
