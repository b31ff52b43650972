//! Incremental Cache (C9): the on-disk side of the cache, one JSON file per
//! cache root.
//!
//! `load` returns `Ok(None)` (a clean miss, not an error) whenever the file
//! is absent, unreadable, malformed, or its build identity
//! (`compiler_version`/`codegen_target`/`flags`/`prelude_identity`) doesn't
//! match the current run — universal invariant 9. Every other I/O failure
//! on save is reported but does not stop the watch loop (§7: recoverable).

use crate::domain::entities::fingerprint::FileFingerprint;
use crate::domain::entities::IncrementalCacheRecord;
use crate::error::{LumenError, LumenResult};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const CACHE_FILE_NAME: &str = "lumenc-cache.json";

pub fn cache_file_path(cache_dir: &Path) -> PathBuf {
    cache_dir.join(CACHE_FILE_NAME)
}

/// Load a cache record, verifying it matches the current build identity.
/// A mismatch or any I/O/parse failure is a miss, returned as `Ok(None)`.
pub fn load(
    cache_dir: &Path,
    compiler_version: &str,
    codegen_target: &str,
    flags: &[String],
    prelude_identity: &str,
) -> Option<IncrementalCacheRecord> {
    let path = cache_file_path(cache_dir);
    let content = std::fs::read_to_string(path).ok()?;
    let record: IncrementalCacheRecord = serde_json::from_str(&content).ok()?;
    if record.matches_identity(compiler_version, codegen_target, flags, prelude_identity) {
        Some(record)
    } else {
        None
    }
}

pub fn save(cache_dir: &Path, record: &IncrementalCacheRecord) -> LumenResult<()> {
    std::fs::create_dir_all(cache_dir)?;
    let path = cache_file_path(cache_dir);
    let content = serde_json::to_string_pretty(record)?;
    std::fs::write(&path, content)?;
    Ok(())
}

/// Compute which of `candidate_paths` changed since `previous`, by the
/// mtime/size fast path, falling back to a rehash when either differs. A
/// path present in `previous` but absent from `candidate_paths` is reported
/// as changed too (it was removed). Returns the fresh fingerprints alongside
/// the changed-path set so callers can fold the result straight back into a
/// `FingerprintStore`.
pub fn changed_files(
    candidate_paths: &[PathBuf],
    previous: Option<&BTreeMap<PathBuf, FileFingerprint>>,
) -> LumenResult<(BTreeMap<PathBuf, FileFingerprint>, Vec<PathBuf>)> {
    let mut fresh = BTreeMap::new();
    let mut changed = Vec::new();
    for path in candidate_paths {
        let fingerprint = FileFingerprint::compute(path).map_err(|source| LumenError::SourceIo {
            path: path.clone(),
            source,
        })?;
        let is_changed = match previous.and_then(|m| m.get(path)) {
            Some(old) if old.fast_path_unchanged(&fingerprint) => false,
            Some(old) => old != &fingerprint,
            None => true,
        };
        if is_changed {
            changed.push(path.clone());
        }
        fresh.insert(path.clone(), fingerprint);
    }

    if let Some(previous) = previous {
        let candidates: std::collections::HashSet<&PathBuf> = candidate_paths.iter().collect();
        for removed in previous.keys().filter(|p| !candidates.contains(p)) {
            changed.push(removed.clone());
        }
    }

    Ok((fresh, changed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record() -> IncrementalCacheRecord {
        IncrementalCacheRecord::new(
            "0.1.0".into(),
            "x86_64-linux".into(),
            vec!["release".into()],
            "prelude-v1".into(),
        )
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let record = record();
        save(dir.path(), &record).unwrap();
        let loaded = load(
            dir.path(),
            "0.1.0",
            "x86_64-linux",
            &["release".into()],
            "prelude-v1",
        );
        assert!(loaded.is_some());
    }

    #[test]
    fn load_rejects_version_mismatch() {
        let dir = tempdir().unwrap();
        save(dir.path(), &record()).unwrap();
        let loaded = load(
            dir.path(),
            "0.2.0",
            "x86_64-linux",
            &["release".into()],
            "prelude-v1",
        );
        assert!(loaded.is_none());
    }

    #[test]
    fn load_missing_file_is_none_not_error() {
        let dir = tempdir().unwrap();
        let loaded = load(dir.path(), "0.1.0", "x86_64-linux", &[], "p");
        assert!(loaded.is_none());
    }

    #[test]
    fn changed_files_detects_new_and_modified() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.lum");
        std::fs::write(&a, b"one").unwrap();
        let (fresh1, changed1) = changed_files(&[a.clone()], None).unwrap();
        assert_eq!(changed1, vec![a.clone()]);

        std::fs::write(&a, b"two").unwrap();
        let (_fresh2, changed2) = changed_files(&[a.clone()], Some(&fresh1)).unwrap();
        assert_eq!(changed2, vec![a]);
    }

    #[test]
    fn changed_files_empty_when_untouched() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.lum");
        std::fs::write(&a, b"stable").unwrap();
        let (fresh, _) = changed_files(&[a.clone()], None).unwrap();
        let (_, changed) = changed_files(&[a], Some(&fresh)).unwrap();
        assert!(changed.is_empty());
    }

    #[test]
    fn changed_files_reports_removed_paths() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.lum");
        let b = dir.path().join("b.lum");
        std::fs::write(&a, b"one").unwrap();
        std::fs::write(&b, b"two").unwrap();
        let (fresh, _) = changed_files(&[a.clone(), b.clone()], None).unwrap();

        // b is no longer in the candidate set (e.g. deleted or no longer
        // reachable from discovery); it must still surface as changed.
        let (next, changed) = changed_files(&[a.clone()], Some(&fresh)).unwrap();
        assert!(!changed.contains(&a));
        assert!(changed.contains(&b));
        assert!(!next.contains_key(&b));
    }
}
