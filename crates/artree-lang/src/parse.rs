//! Tokenizer and prefix parser.
//!
//! A snippet is exactly one top-level expression in operator-first form.
//! The parser is a small recursive descent over three token kinds: `(`,
//! `)`, and atoms. Atoms that look numeric are classified as integer or
//! real literals at parse time; everything else is a symbol.

use crate::ast::Expr;
use crate::error::{LangError, LangResult};

/// Maximum nesting depth accepted by the parser.
///
/// Snippets nested deeper than this are rejected up front so evaluation
/// recursion stays bounded.
pub const MAX_DEPTH: usize = 256;

/// Check whether a piece of text looks like a snippet at all.
///
/// A message classifies as code when its trimmed text starts with `(`.
/// This is deliberately permissive; a classified snippet that fails to
/// parse still consumes its accumulation slot.
pub fn is_code(text: &str) -> bool {
    text.trim_start().starts_with('(')
}

/// Parse one snippet into exactly one top-level expression.
pub fn parse(src: &str) -> LangResult<Expr> {
    let mut parser = Parser {
        tokens: lex(src),
        pos: 0,
        src_len: src.len(),
    };
    let expr = parser.expr(0)?;
    if let Some((at, _)) = parser.peek() {
        return Err(LangError::parse(at, "unexpected trailing input"));
    }
    Ok(expr)
}

#[derive(Debug, Clone, Copy)]
enum Tok<'a> {
    Open,
    Close,
    Atom(&'a str),
}

/// Split the source into parens and atom runs. Atom classification
/// happens later, so lexing itself cannot fail.
fn lex(src: &str) -> Vec<(usize, Tok<'_>)> {
    let mut tokens = Vec::new();
    let mut chars = src.char_indices().peekable();
    while let Some(&(at, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        match c {
            '(' => {
                tokens.push((at, Tok::Open));
                chars.next();
            }
            ')' => {
                tokens.push((at, Tok::Close));
                chars.next();
            }
            _ => {
                let start = at;
                let mut end = src.len();
                while let Some(&(i, c2)) = chars.peek() {
                    if c2.is_whitespace() || c2 == '(' || c2 == ')' {
                        end = i;
                        break;
                    }
                    chars.next();
                }
                tokens.push((start, Tok::Atom(&src[start..end])));
            }
        }
    }
    tokens
}

struct Parser<'a> {
    tokens: Vec<(usize, Tok<'a>)>,
    pos: usize,
    src_len: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<(usize, Tok<'a>)> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<(usize, Tok<'a>)> {
        let tok = self.peek();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn expr(&mut self, depth: usize) -> LangResult<Expr> {
        if depth > MAX_DEPTH {
            let at = self.peek().map(|(at, _)| at).unwrap_or(self.src_len);
            return Err(LangError::parse(at, "expression nested too deeply"));
        }
        match self.next() {
            None => Err(LangError::parse(self.src_len, "unexpected end of input")),
            Some((at, Tok::Close)) => Err(LangError::parse(at, "unexpected )")),
            Some((at, Tok::Atom(text))) => atom_expr(text, at),
            Some((at, Tok::Open)) => {
                if let Some((_, Tok::Close)) = self.peek() {
                    return Err(LangError::parse(at, "missing operator in application"));
                }
                let target = self.expr(depth + 1)?;
                let mut args = Vec::new();
                loop {
                    match self.peek() {
                        None => return Err(LangError::parse(self.src_len, "unclosed (")),
                        Some((_, Tok::Close)) => {
                            self.next();
                            break;
                        }
                        Some(_) => args.push(self.expr(depth + 1)?),
                    }
                }
                Ok(Expr::Call {
                    target: Box::new(target),
                    args,
                })
            }
        }
    }
}

/// Classify an atom as an integer literal, real literal, or symbol.
fn atom_expr(text: &str, at: usize) -> LangResult<Expr> {
    if !looks_numeric(text) {
        return Ok(Expr::Symbol(text.to_string()));
    }
    if let Ok(v) = text.parse::<i64>() {
        return Ok(Expr::Int(v));
    }
    if let Ok(v) = text.parse::<f64>() {
        return Ok(Expr::Real(v));
    }
    Err(LangError::parse(at, format!("invalid number literal: {}", text)))
}

/// An atom is numeric when it starts with a digit, or with a sign or dot
/// immediately followed by a digit (so `-` and `+` stay symbols).
fn looks_numeric(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('-') | Some('+') => matches!(chars.next(), Some(c) if c.is_ascii_digit() || c == '.'),
        Some('.') => matches!(chars.next(), Some(c) if c.is_ascii_digit()),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integer_literal() {
        assert_eq!(parse("42").unwrap(), Expr::Int(42));
        assert_eq!(parse("-7").unwrap(), Expr::Int(-7));
    }

    #[test]
    fn test_parse_real_literal() {
        assert_eq!(parse("0.5").unwrap(), Expr::Real(0.5));
        assert_eq!(parse("-2.25").unwrap(), Expr::Real(-2.25));
        assert_eq!(parse("1e3").unwrap(), Expr::Real(1000.0));
    }

    #[test]
    fn test_literal_tag_is_preserved() {
        // `3` and `3.0` are different literals even though they compare equal
        // as reals.
        assert_eq!(parse("3").unwrap(), Expr::Int(3));
        assert_eq!(parse("3.0").unwrap(), Expr::Real(3.0));
    }

    #[test]
    fn test_parse_symbols() {
        assert_eq!(parse("i").unwrap(), Expr::Symbol("i".to_string()));
        assert_eq!(parse("+").unwrap(), Expr::Symbol("+".to_string()));
        assert_eq!(parse("%").unwrap(), Expr::Symbol("%".to_string()));
    }

    #[test]
    fn test_parse_call() {
        let expr = parse("(+ i 1)").unwrap();
        assert_eq!(
            expr,
            Expr::Call {
                target: Box::new(Expr::Symbol("+".to_string())),
                args: vec![Expr::Symbol("i".to_string()), Expr::Int(1)],
            }
        );
    }

    #[test]
    fn test_parse_nested_call() {
        let expr = parse("(& (* i j) 255)").unwrap();
        match expr {
            Expr::Call { target, args } => {
                assert_eq!(*target, Expr::Symbol("&".to_string()));
                assert_eq!(args.len(), 2);
                assert!(matches!(args[0], Expr::Call { .. }));
                assert_eq!(args[1], Expr::Int(255));
            }
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_unclosed_paren_is_parse_error() {
        assert!(matches!(parse("(+ 1 2"), Err(LangError::Parse { .. })));
    }

    #[test]
    fn test_unexpected_close_is_parse_error() {
        assert!(matches!(parse(")"), Err(LangError::Parse { .. })));
    }

    #[test]
    fn test_trailing_input_is_parse_error() {
        assert!(matches!(parse("(+ 1 2) 3"), Err(LangError::Parse { .. })));
    }

    #[test]
    fn test_empty_application_is_parse_error() {
        assert!(matches!(parse("()"), Err(LangError::Parse { .. })));
    }

    #[test]
    fn test_empty_input_is_parse_error() {
        assert!(matches!(parse(""), Err(LangError::Parse { .. })));
        assert!(matches!(parse("   "), Err(LangError::Parse { .. })));
    }

    #[test]
    fn test_invalid_number_is_parse_error() {
        assert!(matches!(parse("12abc"), Err(LangError::Parse { .. })));
    }

    #[test]
    fn test_depth_cap() {
        let mut deep = String::new();
        for _ in 0..(MAX_DEPTH + 8) {
            deep.push_str("(+ 1 ");
        }
        deep.push('1');
        for _ in 0..(MAX_DEPTH + 8) {
            deep.push(')');
        }
        assert!(matches!(parse(&deep), Err(LangError::Parse { .. })));
    }

    #[test]
    fn test_is_code() {
        assert!(is_code("(+ 1 2)"));
        assert!(is_code("   ( sin i )"));
        assert!(!is_code("hello bot"));
        assert!(!is_code("paint me something"));
        assert!(!is_code(""));
    }
}
