//! The cached output of parsing one source file (C4's value type).

use crate::domain::entities::ast::AstNode;
use crate::domain::value_objects::ContentHash;

/// An immutable parse result plus the content hash it was parsed from.
///
/// Parse Cache hands out clones of `ast` on every read (universal invariant
/// 2: extraction over a clone must never mutate the cached original).
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedUnit {
    pub ast: Vec<AstNode>,
    pub content_hash: ContentHash,
}

impl ParsedUnit {
    pub fn new(ast: Vec<AstNode>, content_hash: ContentHash) -> Self {
        Self { ast, content_hash }
    }
}
