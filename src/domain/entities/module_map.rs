//! Module-File Map (C8 support): which files contribute to which codegen
//! module.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleFileMap(BTreeMap<String, BTreeSet<PathBuf>>);

impl ModuleFileMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, module: impl Into<String>, file: PathBuf) {
        self.0.entry(module.into()).or_default().insert(file);
    }

    pub fn contributors(&self, module: &str) -> Option<&BTreeSet<PathBuf>> {
        self.0.get(module)
    }

    pub fn modules(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn modules_containing<'a>(&'a self, file: &'a Path) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |(_, files)| files.contains(file))
            .map(|(name, _)| name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
