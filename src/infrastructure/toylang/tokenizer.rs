//! A small tokenizer for the toy `.lum` language used to exercise this
//! crate end to end. Not a serious lexer: no escape sequences inside
//! strings, no numeric suffixes, no heredocs — just enough surface to drive
//! require discovery, signature extraction, and change classification.

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Ident(String),
    Const(String),
    Str(String),
    Int(i64),
    Symbol(char),
    MacroOpen,  // {{
    MacroClose, // }}
    MacroStmtOpen,  // {%
    MacroStmtClose, // %}
    Newline,
    Eof,
}

pub fn tokenize(source: &str) -> Vec<Token> {
    let chars: Vec<char> = source.chars().collect();
    let mut i = 0;
    let mut tokens = Vec::new();

    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' | '\t' | '\r' => i += 1,
            '\n' => {
                tokens.push(Token::Newline);
                i += 1;
            }
            '#' => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            '"' => {
                i += 1;
                let start = i;
                while i < chars.len() && chars[i] != '"' {
                    i += 1;
                }
                let s: String = chars[start..i].iter().collect();
                tokens.push(Token::Str(s));
                i += 1; // closing quote
            }
            '{' if chars.get(i + 1) == Some(&'{') => {
                tokens.push(Token::MacroOpen);
                i += 2;
            }
            '}' if chars.get(i + 1) == Some(&'}') => {
                tokens.push(Token::MacroClose);
                i += 2;
            }
            '{' if chars.get(i + 1) == Some(&'%') => {
                tokens.push(Token::MacroStmtOpen);
                i += 2;
            }
            '%' if chars.get(i + 1) == Some(&'}') => {
                tokens.push(Token::MacroStmtClose);
                i += 2;
            }
            c if c.is_ascii_digit() => {
                let start = i;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
                let s: String = chars[start..i].iter().collect();
                tokens.push(Token::Int(s.parse().unwrap_or(0)));
            }
            c if c.is_alphabetic() || c == '_' || c == ':' => {
                let start = i;
                while i < chars.len()
                    && (chars[i].is_alphanumeric() || chars[i] == '_' || chars[i] == ':' || chars[i] == '?')
                {
                    i += 1;
                }
                let s: String = chars[start..i].iter().collect();
                if s.chars().next().map(|c| c.is_uppercase()).unwrap_or(false) {
                    tokens.push(Token::Const(s));
                } else {
                    tokens.push(Token::Ident(s));
                }
            }
            other => {
                tokens.push(Token::Symbol(other));
                i += 1;
            }
        }
    }
    tokens.push(Token::Eof);
    tokens
}
