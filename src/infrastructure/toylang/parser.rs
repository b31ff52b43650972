//! Recursive-descent parser for the toy `.lum` language.
//!
//! Grammar (informal):
//! ```text
//! program      := statement*
//! statement    := require | include | extend | class | module | enum | lib
//!               | def | assign | macro_if | macro_for | macro_expr | call
//! require      := "require" STRING
//! class        := "class" CONST ("<" CONST)? ("(" CONST ("," CONST)* ")")? statement* "end"
//! def          := "abstract"? "def" ident "(" args? ")" (":" type)? statement* "end"
//! assign       := CONST "=" expr
//! macro_if     := "{%" "if" cond "%}" statement* ("{%" "else" "%}" statement*)? "{%" "end" "%}"
//! macro_for    := "{%" "for" ident "in" ident "%}" statement* "{%" "end" "%}"
//! macro_expr   := "{{" ... "}}"
//! call         := ident "(" expr* ")"
//! ```

use super::tokenizer::{tokenize, Token};
use crate::domain::entities::{Arg, AstNode, Literal, MacroCond};
use crate::domain::ports::{ParseError, SourceParser, SymbolInterner};

pub struct ToyParser;

impl SourceParser for ToyParser {
    fn parse(
        &self,
        content: &str,
        interner: &SymbolInterner,
        filename: &str,
        _wants_docs: bool,
    ) -> Result<Vec<AstNode>, ParseError> {
        let tokens = tokenize(content);
        let mut cursor = Cursor {
            tokens,
            pos: 0,
            filename,
            interner,
        };
        cursor.parse_block(&[])
    }
}

struct Cursor<'a> {
    tokens: Vec<Token>,
    pos: usize,
    filename: &'a str,
    interner: &'a SymbolInterner,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens.get(self.pos).cloned().unwrap_or(Token::Eof);
        self.pos += 1;
        tok
    }

    fn skip_newlines(&mut self) {
        while matches!(self.peek(), Token::Newline) {
            self.pos += 1;
        }
    }

    fn fail(&self, message: impl Into<String>) -> ParseError {
        ParseError::Syntax {
            file: self.filename.into(),
            message: message.into(),
        }
    }

    fn is_keyword(&self, name: &str) -> bool {
        matches!(self.peek(), Token::Ident(ident) if ident == name)
    }

    /// Parse statements until EOF or one of `stop_words` is the next
    /// keyword (used to detect `end`/`else` closing an enclosing block).
    fn parse_block(&mut self, stop_words: &[&str]) -> Result<Vec<AstNode>, ParseError> {
        let mut nodes = Vec::new();
        loop {
            self.skip_newlines();
            if matches!(self.peek(), Token::Eof) {
                break;
            }
            if stop_words.iter().any(|w| self.is_keyword(w)) {
                break;
            }
            if matches!(self.peek(), Token::MacroStmtOpen) {
                if self.peek_stop_in_macro_stmt(stop_words) {
                    break;
                }
            }
            nodes.push(self.parse_statement()?);
        }
        Ok(nodes)
    }

    fn peek_stop_in_macro_stmt(&self, stop_words: &[&str]) -> bool {
        if let Some(Token::Ident(word)) = self.tokens.get(self.pos + 1) {
            stop_words.contains(&word.as_str())
        } else {
            false
        }
    }

    fn parse_statement(&mut self) -> Result<AstNode, ParseError> {
        match self.peek().clone() {
            Token::Ident(name) if name == "require" => {
                self.advance();
                let path = self.expect_string()?;
                Ok(AstNode::Require(path))
            }
            Token::Ident(name) if name == "include" => {
                self.advance();
                let target = self.expect_const()?;
                Ok(AstNode::Include(target))
            }
            Token::Ident(name) if name == "extend" => {
                self.advance();
                let target = self.expect_const()?;
                Ok(AstNode::Extend(target))
            }
            Token::Ident(name) if name == "class" => self.parse_type_def("class"),
            Token::Ident(name) if name == "module" => self.parse_type_def("module"),
            Token::Ident(name) if name == "enum" => self.parse_type_def("enum"),
            Token::Ident(name) if name == "lib" => self.parse_type_def("lib"),
            Token::Ident(name) if name == "def" => self.parse_def(false),
            Token::Ident(name) if name == "abstract" => {
                self.advance();
                self.parse_def(true)
            }
            Token::MacroStmtOpen => self.parse_macro_stmt(),
            Token::MacroOpen => self.parse_macro_expr(),
            Token::Const(name) => self.parse_const_led(name),
            Token::Ident(name) => self.parse_ident_led(name),
            other => Err(self.fail(format!("unexpected token {other:?}"))),
        }
    }

    fn parse_type_def(&mut self, kind: &str) -> Result<AstNode, ParseError> {
        self.advance(); // keyword
        let name = self.expect_const()?;
        self.interner.intern(&name);

        let parent = if kind == "class" && matches!(self.peek(), Token::Symbol('<')) {
            self.advance();
            Some(self.expect_const()?)
        } else {
            None
        };

        let mut generic_params = Vec::new();
        if matches!(self.peek(), Token::Symbol('(')) {
            self.advance();
            while !matches!(self.peek(), Token::Symbol(')')) {
                generic_params.push(self.expect_const()?);
                if matches!(self.peek(), Token::Symbol(',')) {
                    self.advance();
                }
            }
            self.advance(); // )
        }

        let body = self.parse_block(&["end"])?;
        self.expect_keyword("end")?;

        Ok(match kind {
            "class" => AstNode::ClassDef {
                name,
                parent,
                generic_params,
                body,
            },
            "module" => AstNode::ModuleDef { name, body },
            "enum" => AstNode::EnumDef { name, body },
            "lib" => AstNode::LibDef { name, body },
            _ => unreachable!(),
        })
    }

    fn parse_def(&mut self, is_abstract: bool) -> Result<AstNode, ParseError> {
        self.advance(); // "def"
        let name = match self.advance() {
            Token::Ident(name) => name,
            other => return Err(self.fail(format!("expected method name, got {other:?}"))),
        };

        let mut args = Vec::new();
        if matches!(self.peek(), Token::Symbol('(')) {
            self.advance();
            while !matches!(self.peek(), Token::Symbol(')')) {
                let external_name = match self.advance() {
                    Token::Ident(name) => name,
                    other => return Err(self.fail(format!("expected arg name, got {other:?}"))),
                };
                let type_restriction = if matches!(self.peek(), Token::Symbol(':')) {
                    self.advance();
                    Some(self.expect_const()?)
                } else {
                    None
                };
                args.push(Arg {
                    external_name,
                    type_restriction,
                });
                if matches!(self.peek(), Token::Symbol(',')) {
                    self.advance();
                }
            }
            self.advance(); // )
        }

        let return_restriction = if matches!(self.peek(), Token::Symbol(':')) {
            self.advance();
            Some(self.expect_const()?)
        } else {
            None
        };

        let body = if is_abstract {
            Vec::new()
        } else {
            let body = self.parse_block(&["end"])?;
            self.expect_keyword("end")?;
            body
        };

        Ok(AstNode::Def {
            name,
            args,
            return_restriction,
            is_abstract,
            body,
        })
    }

    fn parse_macro_stmt(&mut self) -> Result<AstNode, ParseError> {
        self.advance(); // {%
        match self.advance() {
            Token::Ident(word) if word == "if" => {
                let cond = self.parse_macro_cond()?;
                self.expect_symbol('%')?;
                self.expect_symbol('}')?;
                let then_branch = self.parse_block(&["else", "end"])?;
                let (then_branch, else_branch) = self.finish_if(then_branch)?;
                Ok(AstNode::MacroIf {
                    cond,
                    then_branch,
                    else_branch,
                })
            }
            Token::Ident(word) if word == "for" => {
                let var = match self.advance() {
                    Token::Ident(name) => name,
                    other => return Err(self.fail(format!("expected loop var, got {other:?}"))),
                };
                self.expect_keyword("in")?;
                let iterable = match self.advance() {
                    Token::Ident(name) => name,
                    Token::Const(name) => name,
                    other => return Err(self.fail(format!("expected iterable, got {other:?}"))),
                };
                self.expect_symbol('%')?;
                self.expect_symbol('}')?;
                let body = self.parse_block(&["end"])?;
                self.expect_macro_end()?;
                Ok(AstNode::MacroFor { var, iterable, body })
            }
            other => Err(self.fail(format!("unsupported macro statement {other:?}"))),
        }
    }

    /// Handles the `{% if %} then {% else %} else {% end %}` shape. Because
    /// `parse_block` already stopped at the `else`/`end` keyword inside the
    /// `{% %}` delimiters, this drains the delimiter tokens and, if an
    /// `else` was found, parses the else branch too.
    fn finish_if(
        &mut self,
        then_branch: Vec<AstNode>,
    ) -> Result<(Vec<AstNode>, Vec<AstNode>), ParseError> {
        // At this point we're sitting right before the closing `{%`.
        self.expect_macro_stmt_open_for(&["else", "end"])?;
        if self.is_keyword("else") {
            self.advance();
            self.expect_symbol('%')?;
            self.expect_symbol('}')?;
            let else_branch = self.parse_block(&["end"])?;
            self.expect_macro_end()?;
            Ok((then_branch, else_branch))
        } else {
            self.expect_keyword("end")?;
            self.expect_symbol('%')?;
            self.expect_symbol('}')?;
            Ok((then_branch, Vec::new()))
        }
    }

    fn expect_macro_stmt_open_for(&mut self, expected: &[&str]) -> Result<(), ParseError> {
        if !matches!(self.peek(), Token::MacroStmtOpen) {
            return Err(self.fail("expected {% closing a block"));
        }
        self.advance();
        let _ = expected;
        Ok(())
    }

    fn expect_macro_end(&mut self) -> Result<(), ParseError> {
        if !matches!(self.peek(), Token::MacroStmtOpen) {
            return Err(self.fail("expected {% end %}"));
        }
        self.advance();
        self.expect_keyword("end")?;
        self.expect_symbol('%')?;
        self.expect_symbol('}')?;
        Ok(())
    }

    fn parse_macro_cond(&mut self) -> Result<MacroCond, ParseError> {
        self.parse_macro_or()
    }

    fn parse_macro_or(&mut self) -> Result<MacroCond, ParseError> {
        let mut lhs = self.parse_macro_and()?;
        while matches!(self.peek(), Token::Symbol('|')) {
            self.advance();
            if matches!(self.peek(), Token::Symbol('|')) {
                self.advance();
            }
            let rhs = self.parse_macro_and()?;
            lhs = MacroCond::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_macro_and(&mut self) -> Result<MacroCond, ParseError> {
        let mut lhs = self.parse_macro_unary()?;
        while matches!(self.peek(), Token::Symbol('&')) {
            self.advance();
            if matches!(self.peek(), Token::Symbol('&')) {
                self.advance();
            }
            let rhs = self.parse_macro_unary()?;
            lhs = MacroCond::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_macro_unary(&mut self) -> Result<MacroCond, ParseError> {
        if matches!(self.peek(), Token::Symbol('!')) {
            self.advance();
            let inner = self.parse_macro_unary()?;
            return Ok(MacroCond::Not(Box::new(inner)));
        }
        self.parse_macro_atom()
    }

    fn parse_macro_atom(&mut self) -> Result<MacroCond, ParseError> {
        match self.advance() {
            Token::Ident(name) if name == "true" => Ok(MacroCond::Bool(true)),
            Token::Ident(name) if name == "false" => Ok(MacroCond::Bool(false)),
            Token::Ident(name) if name.starts_with("flag?") || name.starts_with("flag") => {
                // tokenizer keeps `flag?` as one ident (':' and '?' allowed
                // mid-ident); the flag name itself follows as `(:name)`.
                if matches!(self.peek(), Token::Symbol('(')) {
                    self.advance();
                    let flag_name = match self.advance() {
                        Token::Ident(n) => n.trim_start_matches(':').to_string(),
                        other => return Err(self.fail(format!("expected flag name, got {other:?}"))),
                    };
                    if matches!(self.peek(), Token::Symbol(')')) {
                        self.advance();
                    }
                    Ok(MacroCond::Flag(flag_name))
                } else {
                    Ok(MacroCond::Unknown)
                }
            }
            Token::Symbol('(') => {
                let inner = self.parse_macro_or()?;
                if matches!(self.peek(), Token::Symbol(')')) {
                    self.advance();
                }
                Ok(inner)
            }
            _ => Ok(MacroCond::Unknown),
        }
    }

    fn parse_macro_expr(&mut self) -> Result<AstNode, ParseError> {
        self.advance(); // {{
        let mut depth = 1;
        let mut parts = Vec::new();
        loop {
            match self.advance() {
                Token::MacroClose => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                Token::MacroOpen => depth += 1,
                Token::Eof => return Err(self.fail("unterminated macro expression")),
                other => parts.push(format!("{other:?}")),
            }
        }
        Ok(AstNode::MacroExpression(parts.join(" ")))
    }

    fn parse_const_led(&mut self, name: String) -> Result<AstNode, ParseError> {
        self.advance();
        if matches!(self.peek(), Token::Symbol('=')) {
            self.advance();
            let value = self.parse_expr()?;
            return Ok(AstNode::Assign {
                path: name,
                value: Box::new(value),
            });
        }
        Ok(AstNode::Ident(name))
    }

    fn parse_ident_led(&mut self, name: String) -> Result<AstNode, ParseError> {
        self.advance();
        if matches!(self.peek(), Token::Symbol('(')) {
            self.advance();
            let mut args = Vec::new();
            while !matches!(self.peek(), Token::Symbol(')')) {
                args.push(self.parse_expr()?);
                if matches!(self.peek(), Token::Symbol(',')) {
                    self.advance();
                }
            }
            self.advance(); // )
            return Ok(AstNode::Call { name, args });
        }
        Ok(AstNode::Ident(name))
    }

    fn parse_expr(&mut self) -> Result<AstNode, ParseError> {
        match self.advance() {
            Token::Str(s) => Ok(AstNode::Literal(Literal::Str(s))),
            Token::Int(n) => Ok(AstNode::Literal(Literal::Int(n))),
            Token::Ident(name) if name == "true" => Ok(AstNode::Literal(Literal::Bool(true))),
            Token::Ident(name) if name == "false" => Ok(AstNode::Literal(Literal::Bool(false))),
            Token::Ident(name) if name == "nil" => Ok(AstNode::Literal(Literal::Nil)),
            Token::Ident(name) => Ok(AstNode::Ident(name)),
            Token::Const(name) => Ok(AstNode::Ident(name)),
            other => Err(self.fail(format!("unexpected expression token {other:?}"))),
        }
    }

    fn expect_string(&mut self) -> Result<String, ParseError> {
        match self.advance() {
            Token::Str(s) => Ok(s),
            other => Err(self.fail(format!("expected string literal, got {other:?}"))),
        }
    }

    fn expect_const(&mut self) -> Result<String, ParseError> {
        match self.advance() {
            Token::Const(s) => Ok(s),
            other => Err(self.fail(format!("expected constant name, got {other:?}"))),
        }
    }

    fn expect_keyword(&mut self, word: &str) -> Result<(), ParseError> {
        match self.advance() {
            Token::Ident(ident) if ident == word => Ok(()),
            other => Err(self.fail(format!("expected keyword '{word}', got {other:?}"))),
        }
    }

    fn expect_symbol(&mut self, sym: char) -> Result<(), ParseError> {
        match self.advance() {
            Token::Symbol(c) if c == sym => Ok(()),
            other => Err(self.fail(format!("expected '{sym}', got {other:?}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> Vec<AstNode> {
        let parser = ToyParser;
        let interner = SymbolInterner::new();
        parser.parse(src, &interner, "test.lum", false).unwrap()
    }

    #[test]
    fn parses_require() {
        let ast = parse("require \"./foo\"\n");
        assert_eq!(ast, vec![AstNode::Require("./foo".into())]);
    }

    #[test]
    fn parses_class_with_method() {
        let ast = parse(
            "class Foo\n  def bar(x : Int32) : Bool\n    x\n  end\nend\n",
        );
        match &ast[0] {
            AstNode::ClassDef { name, body, .. } => {
                assert_eq!(name, "Foo");
                assert_eq!(body.len(), 1);
                match &body[0] {
                    AstNode::Def {
                        name,
                        args,
                        return_restriction,
                        ..
                    } => {
                        assert_eq!(name, "bar");
                        assert_eq!(args[0].external_name, "x");
                        assert_eq!(args[0].type_restriction, Some("Int32".to_string()));
                        assert_eq!(return_restriction, &Some("Bool".to_string()));
                    }
                    other => panic!("expected Def, got {other:?}"),
                }
            }
            other => panic!("expected ClassDef, got {other:?}"),
        }
    }

    #[test]
    fn parses_include_and_extend() {
        let ast = parse("class Foo\n  include Comparable\n  extend ClassMethods\nend\n");
        if let AstNode::ClassDef { body, .. } = &ast[0] {
            assert_eq!(body[0], AstNode::Include("Comparable".into()));
            assert_eq!(body[1], AstNode::Extend("ClassMethods".into()));
        } else {
            panic!("expected ClassDef");
        }
    }

    #[test]
    fn parses_macro_if_with_flag() {
        let ast = parse("{% if flag?(:release) %}\nclass Fast\nend\n{% else %}\nclass Slow\nend\n{% end %}\n");
        match &ast[0] {
            AstNode::MacroIf {
                cond,
                then_branch,
                else_branch,
            } => {
                assert_eq!(*cond, MacroCond::Flag("release".into()));
                assert_eq!(then_branch.len(), 1);
                assert_eq!(else_branch.len(), 1);
            }
            other => panic!("expected MacroIf, got {other:?}"),
        }
    }

    #[test]
    fn parses_constant_assignment() {
        let ast = parse("VERSION = \"1.0\"\n");
        assert_eq!(
            ast[0],
            AstNode::Assign {
                path: "VERSION".into(),
                value: Box::new(AstNode::Literal(Literal::Str("1.0".into())))
            }
        );
    }
}
