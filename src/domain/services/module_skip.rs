//! Module-Skip Logic (C8): decide whether a codegen module can reuse its
//! cached artifact this cycle.

use crate::domain::entities::ModuleFileMap;
use std::collections::BTreeSet;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RebuildReason {
    /// The module isn't in the map at all (first time seeing it).
    NoMapping,
    /// At least one of its contributing files changed (body-only or
    /// structural — either invalidates this module's own cached IR/object).
    ChangedContributor(PathBuf),
    /// Its cached object artifact is missing or empty.
    MissingArtifact,
    /// The current build's flags differ from the ones the cache was built
    /// under (handled one level up, surfaced here for module decisions).
    FlagsDiffer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleDecision {
    Reuse,
    Rebuild(RebuildReason),
}

pub fn plan_module(
    module: &str,
    module_file_map: &ModuleFileMap,
    changed: &BTreeSet<PathBuf>,
    artifact_exists_nonempty: bool,
    flags_match: bool,
) -> ModuleDecision {
    if !flags_match {
        return ModuleDecision::Rebuild(RebuildReason::FlagsDiffer);
    }
    let Some(contributors) = module_file_map.contributors(module) else {
        return ModuleDecision::Rebuild(RebuildReason::NoMapping);
    };
    if !artifact_exists_nonempty {
        return ModuleDecision::Rebuild(RebuildReason::MissingArtifact);
    }
    for path in changed {
        if contributors.contains(path) {
            return ModuleDecision::Rebuild(RebuildReason::ChangedContributor(path.clone()));
        }
    }
    ModuleDecision::Reuse
}

pub fn plan_all_modules(
    module_file_map: &ModuleFileMap,
    changed: &BTreeSet<PathBuf>,
    artifact_exists_nonempty: impl Fn(&str) -> bool,
    flags_match: bool,
) -> Vec<(String, ModuleDecision)> {
    module_file_map
        .modules()
        .map(|module| {
            let decision = plan_module(
                module,
                module_file_map,
                changed,
                artifact_exists_nonempty(module),
                flags_match,
            );
            (module.clone(), decision)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmapped_module_rebuilds() {
        let map = ModuleFileMap::new();
        let decision = plan_module("core", &map, &BTreeSet::new(), true, true);
        assert_eq!(decision, ModuleDecision::Rebuild(RebuildReason::NoMapping));
    }

    #[test]
    fn missing_artifact_rebuilds() {
        let mut map = ModuleFileMap::new();
        map.insert("core", PathBuf::from("a.lum"));
        let decision = plan_module("core", &map, &BTreeSet::new(), false, true);
        assert_eq!(
            decision,
            ModuleDecision::Rebuild(RebuildReason::MissingArtifact)
        );
    }

    #[test]
    fn unaffected_module_reuses() {
        let mut map = ModuleFileMap::new();
        map.insert("core", PathBuf::from("a.lum"));
        let mut changed = BTreeSet::new();
        changed.insert(PathBuf::from("other.lum"));
        let decision = plan_module("core", &map, &changed, true, true);
        assert_eq!(decision, ModuleDecision::Reuse);
    }

    #[test]
    fn changed_contributor_rebuilds() {
        let mut map = ModuleFileMap::new();
        map.insert("core", PathBuf::from("a.lum"));
        let mut changed = BTreeSet::new();
        changed.insert(PathBuf::from("a.lum"));
        let decision = plan_module("core", &map, &changed, true, true);
        assert_eq!(
            decision,
            ModuleDecision::Rebuild(RebuildReason::ChangedContributor(PathBuf::from("a.lum")))
        );
    }

    #[test]
    fn mismatched_flags_always_rebuild() {
        let map = ModuleFileMap::new();
        let decision = plan_module("core", &map, &BTreeSet::new(), true, false);
        assert_eq!(decision, ModuleDecision::Rebuild(RebuildReason::FlagsDiffer));
    }
}
