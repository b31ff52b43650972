//! The `SourceParser` collaborator contract (§6.1).
//!
//! Each parallel-parser worker owns one `SymbolInterner`: it is deliberately
//! not `Send`/`Sync` so that the type system enforces the one-interner-per-
//! thread rule from §5 rather than relying on discipline alone.

use crate::domain::entities::AstNode;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("syntax error in {file}: {message}")]
    Syntax { file: PathBuf, message: String },
}

/// A thread-confined interning table. Wrapped in `Rc<RefCell<_>>` so it is
/// cheaply shareable within one worker but cannot cross a thread boundary.
#[derive(Debug, Default)]
pub struct SymbolInterner {
    inner: Rc<RefCell<InternerState>>,
}

#[derive(Debug, Default)]
struct InternerState {
    ids: HashMap<String, u32>,
    names: Vec<String>,
}

impl SymbolInterner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&self, name: &str) -> u32 {
        let mut state = self.inner.borrow_mut();
        if let Some(id) = state.ids.get(name) {
            return *id;
        }
        let id = state.names.len() as u32;
        state.names.push(name.to_string());
        state.ids.insert(name.to_string(), id);
        id
    }

    pub fn resolve(&self, id: u32) -> Option<String> {
        self.inner.borrow().names.get(id as usize).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub trait SourceParser {
    fn parse(
        &self,
        content: &str,
        interner: &SymbolInterner,
        filename: &str,
        wants_docs: bool,
    ) -> Result<Vec<AstNode>, ParseError>;
}
