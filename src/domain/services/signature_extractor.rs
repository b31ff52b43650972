//! Signature Extractor (C6).
//!
//! Walks a parsed file's top level and records everything an importer could
//! observe without reading a method body: type declarations, method
//! signatures, mixins, and constants. Method and macro-for bodies are never
//! descended into for their *contents*; a `MacroIf`'s branches are descended
//! into because either one might be the one that executes.

use crate::domain::entities::{
    AstNode, DeclKind, FileTopLevelSignature, MethodSig, TypeDeclarationSig,
};

pub fn extract(ast: &[AstNode]) -> FileTopLevelSignature {
    let mut sig = FileTopLevelSignature::empty();
    let mut scope: Vec<String> = Vec::new();
    walk(ast, &mut scope, &mut sig);
    sig
}

fn qualify(scope: &[String], name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{}::{}", scope.join("::"), name)
    }
}

fn walk(nodes: &[AstNode], scope: &mut Vec<String>, sig: &mut FileTopLevelSignature) {
    for node in nodes {
        match node {
            AstNode::Require(_) => {}
            AstNode::Include(target) => sig.mixins.push(format!("include {target}")),
            AstNode::Extend(target) => sig.mixins.push(format!("extend {target}")),
            AstNode::ClassDef {
                name,
                parent,
                generic_params,
                body,
            } => {
                sig.type_decls.push(TypeDeclarationSig {
                    qualified_name: qualify(scope, name),
                    kind: DeclKind::Class,
                    parent: parent.clone(),
                    generic_params: generic_params.clone(),
                });
                scope.push(name.clone());
                walk(body, scope, sig);
                scope.pop();
            }
            AstNode::ModuleDef { name, body } => {
                sig.type_decls.push(TypeDeclarationSig {
                    qualified_name: qualify(scope, name),
                    kind: DeclKind::Module,
                    parent: None,
                    generic_params: Vec::new(),
                });
                scope.push(name.clone());
                walk(body, scope, sig);
                scope.pop();
            }
            AstNode::EnumDef { name, body } => {
                sig.type_decls.push(TypeDeclarationSig {
                    qualified_name: qualify(scope, name),
                    kind: DeclKind::Enum,
                    parent: None,
                    generic_params: Vec::new(),
                });
                scope.push(name.clone());
                walk(body, scope, sig);
                scope.pop();
            }
            AstNode::LibDef { name, body } => {
                sig.type_decls.push(TypeDeclarationSig {
                    qualified_name: qualify(scope, name),
                    kind: DeclKind::Lib,
                    parent: None,
                    generic_params: Vec::new(),
                });
                scope.push(name.clone());
                walk(body, scope, sig);
                scope.pop();
            }
            AstNode::Def {
                name,
                args,
                return_restriction,
                is_abstract,
                ..
            } => {
                sig.method_sigs.push(MethodSig {
                    qualified_name: qualify(scope, name),
                    arg_names: args.iter().map(|a| a.external_name.clone()).collect(),
                    arg_type_restrictions: args
                        .iter()
                        .map(|a| a.type_restriction.clone().unwrap_or_default())
                        .collect(),
                    return_restriction: return_restriction.clone().unwrap_or_default(),
                    is_abstract: *is_abstract,
                });
            }
            AstNode::Assign { path, .. } => {
                sig.constants.push(qualify(scope, path));
            }
            AstNode::Call { .. } | AstNode::MacroExpression(_) => {
                sig.has_macro_calls = true;
            }
            AstNode::MacroIf {
                then_branch,
                else_branch,
                ..
            } => {
                sig.has_macro_calls = true;
                walk(then_branch, scope, sig);
                walk(else_branch, scope, sig);
            }
            AstNode::MacroFor { body, .. } => {
                sig.has_macro_calls = true;
                walk(body, scope, sig);
            }
            AstNode::Expressions(children) => walk(children, scope, sig),
            AstNode::Literal(_) | AstNode::Ident(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Arg, MacroCond};

    #[test]
    fn extracts_nested_class_and_method() {
        let ast = vec![AstNode::ClassDef {
            name: "Foo".into(),
            parent: None,
            generic_params: vec![],
            body: vec![AstNode::Def {
                name: "bar".into(),
                args: vec![Arg {
                    external_name: "x".into(),
                    type_restriction: Some("Int32".into()),
                }],
                return_restriction: Some("Bool".into()),
                is_abstract: false,
                body: vec![AstNode::Call {
                    name: "ignored_in_body".into(),
                    args: vec![],
                }],
            }],
        }];
        let sig = extract(&ast);
        assert_eq!(sig.type_decls.len(), 1);
        assert_eq!(sig.type_decls[0].qualified_name, "Foo");
        assert_eq!(sig.method_sigs.len(), 1);
        assert_eq!(sig.method_sigs[0].qualified_name, "Foo::bar");
        assert_eq!(sig.method_sigs[0].arg_names, vec!["x".to_string()]);
        assert!(!sig.has_macro_calls, "call inside method body must not count");
    }

    #[test]
    fn top_level_call_sets_has_macro_calls() {
        let ast = vec![AstNode::Call {
            name: "some_macro".into(),
            args: vec![],
        }];
        let sig = extract(&ast);
        assert!(sig.has_macro_calls);
    }

    #[test]
    fn macro_if_descends_into_both_branches() {
        let ast = vec![AstNode::MacroIf {
            cond: MacroCond::Flag("release".into()),
            then_branch: vec![AstNode::ClassDef {
                name: "OnlyInThen".into(),
                parent: None,
                generic_params: vec![],
                body: vec![],
            }],
            else_branch: vec![AstNode::ClassDef {
                name: "OnlyInElse".into(),
                parent: None,
                generic_params: vec![],
                body: vec![],
            }],
        }];
        let sig = extract(&ast);
        assert_eq!(sig.type_decls.len(), 2);
        assert!(sig.has_macro_calls);
    }

    #[test]
    fn extraction_does_not_mutate_its_input() {
        let ast = vec![AstNode::ClassDef {
            name: "Foo".into(),
            parent: None,
            generic_params: vec![],
            body: vec![],
        }];
        let before = ast.clone();
        let _ = extract(&ast);
        assert_eq!(ast, before);
    }
}
