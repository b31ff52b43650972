//! Parse Cache (C4): a memory-resident cache of parsed units keyed by path
//! and keyed secondarily on content hash, so a stale hit is detected rather
//! than silently returned.
//!
//! Every read clones the stored AST out (`get` never hands back a reference
//! into the cache) so that a caller mutating its own copy — e.g. Signature
//! Extractor building scratch state while walking it — can never corrupt the
//! cached original. This is universal invariant 2.

use crate::domain::entities::ParsedUnit;
use crate::domain::value_objects::ContentHash;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
pub struct ParseCache {
    entries: HashMap<PathBuf, ParsedUnit>,
    hits: u64,
    misses: u64,
}

impl ParseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a clone of the cached AST if present and its hash matches
    /// `content_hash`; otherwise records a miss and returns `None`.
    pub fn get(&mut self, path: &Path, content_hash: &ContentHash) -> Option<Vec<crate::domain::entities::AstNode>> {
        match self.entries.get(path) {
            Some(unit) if &unit.content_hash == content_hash => {
                self.hits += 1;
                Some(unit.ast.clone())
            }
            _ => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn store(&mut self, path: PathBuf, unit: ParsedUnit) {
        self.entries.insert(path, unit);
    }

    pub fn remove(&mut self, path: &Path) {
        self.entries.remove(path);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn reset_stats(&mut self) {
        self.hits = 0;
        self.misses = 0;
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
