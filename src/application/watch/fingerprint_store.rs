//! Fingerprint Store (C2): the Watch Coordinator's exclusive, in-memory
//! record of the last fingerprint computed for every file it has seen.

use crate::domain::entities::FileFingerprint;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
pub struct FingerprintStore {
    entries: BTreeMap<PathBuf, FileFingerprint>,
}

impl FingerprintStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(entries: BTreeMap<PathBuf, FileFingerprint>) -> Self {
        Self { entries }
    }

    pub fn get(&self, path: &Path) -> Option<&FileFingerprint> {
        self.entries.get(path)
    }

    /// Recompute `path`'s fingerprint, comparing against any previous entry.
    /// Returns `true` if the file is new or its content hash changed.
    pub fn refresh(&mut self, path: &Path) -> std::io::Result<bool> {
        let fresh = FileFingerprint::compute(path)?;
        let changed = match self.entries.get(path) {
            Some(previous) => previous != &fresh,
            None => true,
        };
        self.entries.insert(path.to_path_buf(), fresh);
        Ok(changed)
    }

    pub fn remove(&mut self, path: &Path) {
        self.entries.remove(path);
    }

    pub fn snapshot(&self) -> BTreeMap<PathBuf, FileFingerprint> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn refresh_reports_true_for_new_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.lum");
        std::fs::write(&path, b"one").unwrap();
        let mut store = FingerprintStore::new();
        assert!(store.refresh(&path).unwrap());
    }

    #[test]
    fn refresh_reports_false_when_content_unchanged() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.lum");
        std::fs::write(&path, b"one").unwrap();
        let mut store = FingerprintStore::new();
        store.refresh(&path).unwrap();
        assert!(!store.refresh(&path).unwrap());
    }

    #[test]
    fn refresh_reports_true_when_content_changes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.lum");
        std::fs::write(&path, b"one").unwrap();
        let mut store = FingerprintStore::new();
        store.refresh(&path).unwrap();
        std::fs::write(&path, b"two").unwrap();
        assert!(store.refresh(&path).unwrap());
    }
}
