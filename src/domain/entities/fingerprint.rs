//! File Fingerprint — the cheap-then-authoritative change signal (C2).

use crate::domain::value_objects::ContentHash;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A point-in-time fingerprint of one source file.
///
/// `mtime`/`size` are the fast path; `hash` is authoritative. Two
/// fingerprints with equal `hash` are considered equal content regardless of
/// `mtime`, matching universal invariant 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileFingerprint {
    pub path: PathBuf,
    /// Seconds since `UNIX_EPOCH`, truncated; coarse on purpose, it is only
    /// ever used to short-circuit a hash recompute.
    pub mtime: u64,
    pub size: u64,
    pub hash: ContentHash,
}

impl PartialEq for FileFingerprint {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path && self.hash == other.hash
    }
}

impl FileFingerprint {
    /// Read `path` from disk and compute its fingerprint. Authoritative:
    /// always hashes the content, never trusts `mtime`/`size` alone.
    pub fn compute(path: &Path) -> std::io::Result<Self> {
        let content = fs::read(path)?;
        let metadata = fs::metadata(path)?;
        let mtime = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(SystemTime::UNIX_EPOCH).ok())
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let hash = ContentHash::from_bytes(&content);
        Ok(Self {
            path: path.to_path_buf(),
            mtime,
            size: metadata.len(),
            hash,
        })
    }

    /// Fast path: `true` if `mtime` and `size` both match `other`'s. A
    /// `false` result does not by itself prove the content changed — it only
    /// means a rehash is required to find out.
    pub fn fast_path_unchanged(&self, other: &Self) -> bool {
        self.mtime == other.mtime && self.size == other.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn compute_reads_content_and_size() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.lum");
        std::fs::write(&path, b"hello").unwrap();
        let fp = FileFingerprint::compute(&path).unwrap();
        assert_eq!(fp.size, 5);
        assert_eq!(fp.path, path);
    }

    #[test]
    fn equality_is_hash_based_not_mtime_based() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.lum");
        std::fs::write(&path, b"same").unwrap();
        let fp1 = FileFingerprint::compute(&path).unwrap();
        let mut fp2 = fp1.clone();
        fp2.mtime += 1000;
        assert_eq!(fp1, fp2);
    }

    #[test]
    fn different_content_different_fingerprint() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.lum");
        std::fs::write(&path, b"one").unwrap();
        let fp1 = FileFingerprint::compute(&path).unwrap();
        std::fs::write(&path, b"two").unwrap();
        let fp2 = FileFingerprint::compute(&path).unwrap();
        assert_ne!(fp1, fp2);
    }
}
