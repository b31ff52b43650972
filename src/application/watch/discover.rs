//! Require-Graph Discoverer (C3).
//!
//! Starting from the prelude and an entry file, statically walks every
//! `require` reachable from them, producing a deterministic, duplicate-free
//! discovery order in topological order (post-order DFS: a file is recorded
//! only after all of its own transitive requires have been processed, so
//! providers precede their consumers). Parsing performed here is throwaway —
//! used only to find further `require`s — and is never written into the
//! Parse Cache; a parse error during discovery is swallowed and that
//! branch is simply not explored further (§4.3's best-effort rule).
//!
//! `MacroIf` conditions that evaluate to a definite boolean only descend
//! into the taken branch; anything undecidable is explored on both sides,
//! erring toward over-discovery rather than missing a real dependency.

use crate::domain::entities::{AstNode, RequireEdge};
use crate::domain::ports::{PathResolver, SourceParser, SymbolInterner};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub struct DiscoveryOutcome {
    /// Files in topological (post-order) order — a file's own requires
    /// always precede it — including the prelude and entry file.
    pub ordered_files: Vec<PathBuf>,
    /// Every `require` edge walked, in discovery order. A requester may
    /// appear more than once (one edge per distinct import it resolved),
    /// but a requiree is only ever visited for its own requires once.
    pub edges: Vec<RequireEdge>,
}

pub fn discover<P, R>(
    parser: &P,
    resolver: &R,
    prelude: Option<&Path>,
    entry: &Path,
    active_flags: &HashSet<String>,
) -> DiscoveryOutcome
where
    P: SourceParser,
    R: PathResolver,
{
    let mut visited = HashSet::new();
    let mut ordered = Vec::new();
    let mut edges = Vec::new();

    if let Some(prelude) = prelude {
        visit(parser, resolver, prelude, active_flags, &mut visited, &mut ordered, &mut edges);
    }
    visit(parser, resolver, entry, active_flags, &mut visited, &mut ordered, &mut edges);

    DiscoveryOutcome {
        ordered_files: ordered,
        edges,
    }
}

#[allow(clippy::too_many_arguments)]
fn visit<P, R>(
    parser: &P,
    resolver: &R,
    path: &Path,
    active_flags: &HashSet<String>,
    visited: &mut HashSet<PathBuf>,
    ordered: &mut Vec<PathBuf>,
    edges: &mut Vec<RequireEdge>,
) where
    P: SourceParser,
    R: PathResolver,
{
    let canonical = path.to_path_buf();
    if !visited.insert(canonical.clone()) {
        return;
    }

    let Ok(content) = std::fs::read_to_string(path) else {
        ordered.push(canonical);
        return;
    };
    let interner = SymbolInterner::new();
    let filename = path.to_string_lossy().into_owned();
    let Ok(ast) = parser.parse(&content, &interner, &filename, false) else {
        ordered.push(canonical);
        return;
    };

    for import in collect_requires(&ast, active_flags) {
        let Ok(candidates) = resolver.find(&import, Some(path)) else {
            continue;
        };
        for candidate in candidates {
            edges.push(RequireEdge::new(canonical.clone(), candidate.clone()));
            visit(parser, resolver, &candidate, active_flags, visited, ordered, edges);
        }
    }

    ordered.push(canonical);
}

/// Walk an AST collecting every `require` string reachable under
/// statically-decidable control flow.
fn collect_requires(ast: &[AstNode], active_flags: &HashSet<String>) -> Vec<String> {
    let mut requires = Vec::new();
    walk(ast, active_flags, &mut requires);
    requires
}

fn walk(nodes: &[AstNode], active_flags: &HashSet<String>, out: &mut Vec<String>) {
    for node in nodes {
        match node {
            AstNode::Require(path) => out.push(path.clone()),
            AstNode::Expressions(children) => walk(children, active_flags, out),
            AstNode::MacroIf {
                cond,
                then_branch,
                else_branch,
            } => match cond.evaluate(active_flags) {
                Some(true) => walk(then_branch, active_flags, out),
                Some(false) => walk(else_branch, active_flags, out),
                None => {
                    walk(then_branch, active_flags, out);
                    walk(else_branch, active_flags, out);
                }
            },
            // MacroFor bodies are not explored for requires: the spec scopes
            // discovery to statically-decidable control flow, and a
            // compile-time iteration count isn't something this core
            // evaluates (the external parser/macro-expander already would
            // have, by the time this crate would see generated requires).
            AstNode::MacroFor { .. } => {}
            AstNode::ClassDef { body, .. }
            | AstNode::ModuleDef { body, .. }
            | AstNode::EnumDef { body, .. }
            | AstNode::LibDef { body, .. } => walk(body, active_flags, out),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::ResolveError;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use tempfile::tempdir;

    struct LineParser;
    impl SourceParser for LineParser {
        fn parse(
            &self,
            content: &str,
            _interner: &SymbolInterner,
            _filename: &str,
            _wants_docs: bool,
        ) -> Result<Vec<AstNode>, crate::domain::ports::ParseError> {
            let nodes = content
                .lines()
                .filter_map(|line| line.strip_prefix("require "))
                .map(|target| AstNode::Require(target.trim().to_string()))
                .collect();
            Ok(nodes)
        }
    }

    struct MapResolver(RefCell<HashMap<String, PathBuf>>);
    impl PathResolver for MapResolver {
        fn find(&self, import: &str, _relative_to: Option<&Path>) -> Result<Vec<PathBuf>, ResolveError> {
            self.0
                .borrow()
                .get(import)
                .cloned()
                .map(|p| vec![p])
                .ok_or_else(|| ResolveError::NotFound {
                    import: import.to_string(),
                    relative_to: None,
                })
        }
    }

    #[test]
    fn discovers_transitive_requires_once_each() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.lum");
        let b = dir.path().join("b.lum");
        let c = dir.path().join("c.lum");
        std::fs::write(&a, "require b\nrequire c\n").unwrap();
        std::fs::write(&b, "require c\n").unwrap();
        std::fs::write(&c, "").unwrap();

        let parser = LineParser;
        let mut map = HashMap::new();
        map.insert("b".to_string(), b.clone());
        map.insert("c".to_string(), c.clone());
        let resolver = MapResolver(RefCell::new(map));

        let outcome = discover(&parser, &resolver, None, &a, &HashSet::new());
        assert_eq!(
            outcome.ordered_files,
            vec![c.clone(), b.clone(), a.clone()],
            "topological order: providers before consumers"
        );
        assert_eq!(
            outcome.edges,
            vec![
                RequireEdge::new(a.clone(), b.clone()),
                RequireEdge::new(b, c.clone()),
                RequireEdge::new(a, c),
            ]
        );
    }

    #[test]
    fn discovery_is_deterministic_across_runs() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.lum");
        let b = dir.path().join("b.lum");
        std::fs::write(&a, "require b\n").unwrap();
        std::fs::write(&b, "").unwrap();
        let parser = LineParser;
        let mut map = HashMap::new();
        map.insert("b".to_string(), b.clone());
        let resolver = MapResolver(RefCell::new(map));

        let first = discover(&parser, &resolver, None, &a, &HashSet::new()).ordered_files;
        let second = discover(&parser, &resolver, None, &a, &HashSet::new()).ordered_files;
        assert_eq!(first, second);
    }
}
