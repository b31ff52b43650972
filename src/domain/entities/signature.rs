//! Top-level signature shapes produced by the Signature Extractor (C6) and
//! compared by the Change Classifier (C7).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeclKind {
    Class,
    Module,
    Enum,
    Lib,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDeclarationSig {
    pub qualified_name: String,
    pub kind: DeclKind,
    pub parent: Option<String>,
    pub generic_params: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSig {
    pub qualified_name: String,
    pub arg_names: Vec<String>,
    /// Parallel to `arg_names`; empty string means "no restriction".
    pub arg_type_restrictions: Vec<String>,
    /// Empty string means "no restriction".
    pub return_restriction: String,
    pub is_abstract: bool,
}

/// The structural footprint of one file's top level: everything an importer
/// could observe without reading method bodies.
///
/// `has_macro_calls` forces this signature to compare unequal to *any* other
/// signature, including a structurally identical one (and even to itself on
/// a later comparison) — a file containing unresolved top-level macro
/// machinery is never considered a body-only change, by construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileTopLevelSignature {
    pub type_decls: Vec<TypeDeclarationSig>,
    pub method_sigs: Vec<MethodSig>,
    pub mixins: Vec<String>,
    pub constants: Vec<String>,
    pub has_macro_calls: bool,
}

impl FileTopLevelSignature {
    pub fn empty() -> Self {
        Self {
            type_decls: Vec::new(),
            method_sigs: Vec::new(),
            mixins: Vec::new(),
            constants: Vec::new(),
            has_macro_calls: false,
        }
    }
}

impl PartialEq for FileTopLevelSignature {
    fn eq(&self, other: &Self) -> bool {
        if self.has_macro_calls || other.has_macro_calls {
            return false;
        }
        self.type_decls == other.type_decls
            && self.method_sigs == other.method_sigs
            && self.mixins == other.mixins
            && self.constants == other.constants
    }
}
