use crate::{
    parser::{error::{kind, Error}, Parse, Parser},
    tokenizer::{Token, TokenKind},
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Writes a string the way it would be written as a single-quoted string literal.
pub fn fmt_str(f: &mut impl fmt::Write, value: &str) -> fmt::Result {
    f.write_char('\'')?;
    for c in value.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\'' => f.write_str("\\'")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('\'')
}

/// Resolves the escape sequences in the body of a string literal. Unknown escape sequences are
/// kept as written, backslash included.
fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('0') => out.push('\0'),
            Some(c @ ('\\' | '\'' | '"')) => out.push(c),
            Some(other) => {
                out.push('\\');
                out.push(other);
            },
            None => out.push('\\'),
        }
    }

    out
}

/// An integer literal, written in decimal, hexadecimal (`0x`), octal (`0o`) or binary (`0b`).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitInt {
    /// The value of the integer literal.
    pub value: i64,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl LitInt {
    /// Parses the integer literal `9223372036854775808` (in any radix) following a minus sign.
    /// Only its negation, [`i64::MIN`], fits in 64 bits, so the sign becomes part of the
    /// literal. Fails if the literal is an operand of `**`, which binds tighter than the sign.
    pub(crate) fn parse_negated_min(input: &mut Parser, minus: Range<usize>) -> Result<Self, Error> {
        let token = input.next_token()?;
        let magnitude = int_digits(&token)
            .and_then(|(radix, digits)| u64::from_str_radix(&digits, radix).ok());
        if magnitude == Some(1 << 63) && input.peek_kind() != Some(TokenKind::Pow) {
            Ok(Self { value: i64::MIN, span: minus.start..token.span.end })
        } else {
            Err(input.error(kind::NonFatal))
        }
    }
}

impl std::fmt::Display for LitInt {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// A floating-point literal, such as `3.14`, `1.` or `2e-3`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitFloat {
    /// The value of the floating-point literal.
    pub value: f64,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl std::fmt::Display for LitFloat {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self.value)
    }
}

/// A string literal, quoted with either single or double quotes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitStr {
    /// The contents of the string literal, with escape sequences resolved.
    pub value: String,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl std::fmt::Display for LitStr {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        fmt_str(f, &self.value)
    }
}

/// A boolean literal, either `True` or `False`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitBool {
    /// The value of the boolean literal.
    pub value: bool,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl std::fmt::Display for LitBool {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(if self.value { "True" } else { "False" })
    }
}

/// A symbol / identifier literal. Symbols are used to represent variables, parameters, function
/// names and attribute names.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitSym {
    /// The name of the symbol.
    pub name: String,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl Parse for LitSym {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let token = input.next_token()?;
        match token.kind {
            TokenKind::Name => Ok(Self {
                name: token.lexeme.to_owned(),
                span: token.span,
            }),
            TokenKind::And | TokenKind::Or | TokenKind::Not | TokenKind::In | TokenKind::Is
                | TokenKind::Lambda | TokenKind::Def | TokenKind::Return
                | TokenKind::True | TokenKind::False => Err(Error::new(vec![token.span], kind::ExpectedName {
                    keyword: token.lexeme.to_owned(),
                })),
            _ => Err(Error::new(vec![token.span], kind::UnexpectedToken {
                expected: &[TokenKind::Name],
                found: token.kind,
            })),
        }
    }
}

impl std::fmt::Display for LitSym {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Represents a literal value in the language.
///
/// A literal is any value that is written directly into the source code. Names count as literals
/// here; whether they refer to a variable, a function or a module is decided by whoever consumes
/// the tree.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Literal {
    /// An integer literal, such as `42` or `0xff`.
    Int(LitInt),

    /// A floating-point literal, such as `3.14`.
    Float(LitFloat),

    /// A string literal, such as `'abc'`.
    Str(LitStr),

    /// A boolean literal, either `True` or `False`.
    Bool(LitBool),

    /// A symbol / identifier literal, such as `x` or `pt`.
    Symbol(LitSym),
}

impl Literal {
    /// Returns the span of the literal.
    pub fn span(&self) -> Range<usize> {
        match self {
            Literal::Int(int) => int.span.clone(),
            Literal::Float(float) => float.span.clone(),
            Literal::Str(string) => string.span.clone(),
            Literal::Bool(boolean) => boolean.span.clone(),
            Literal::Symbol(name) => name.span.clone(),
        }
    }
}

/// Returns the radix and digits of an integer token, without the radix prefix or `_` separators.
fn int_digits(token: &Token) -> Option<(u32, String)> {
    let (radix, digits) = match token.kind {
        TokenKind::Int => (10, token.lexeme),
        TokenKind::Hex => (16, &token.lexeme[2..]),
        TokenKind::Oct => (8, &token.lexeme[2..]),
        TokenKind::Bin => (2, &token.lexeme[2..]),
        _ => return None,
    };
    Some((radix, digits.replace('_', "")))
}

impl Parse for Literal {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let token = input.next_token()?;
        let invalid = || Error::new_fatal(vec![token.span.clone()], kind::InvalidNumber {
            lexeme: token.lexeme.to_owned(),
        });

        if let Some((radix, digits)) = int_digits(&token) {
            let value = i64::from_str_radix(&digits, radix).map_err(|_| invalid())?;
            return Ok(Literal::Int(LitInt { value, span: token.span }));
        }

        match token.kind {
            TokenKind::Float => {
                let value = token.lexeme.replace('_', "").parse::<f64>().map_err(|_| invalid())?;
                Ok(Literal::Float(LitFloat { value, span: token.span }))
            },
            TokenKind::Str => {
                // the tokenizer guarantees the lexeme is wrapped in matching quotes
                let body = &token.lexeme[1..token.lexeme.len() - 1];
                Ok(Literal::Str(LitStr { value: unescape(body), span: token.span }))
            },
            TokenKind::True | TokenKind::False => Ok(Literal::Bool(LitBool {
                value: token.kind == TokenKind::True,
                span: token.span,
            })),
            TokenKind::Name => Ok(Literal::Symbol(LitSym {
                name: token.lexeme.to_owned(),
                span: token.span,
            })),
            _ => Err(Error::new(vec![token.span], kind::UnexpectedToken {
                expected: &[
                    TokenKind::Int,
                    TokenKind::Float,
                    TokenKind::Str,
                    TokenKind::True,
                    TokenKind::False,
                    TokenKind::Name,
                ],
                found: token.kind,
            })),
        }
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Literal::Int(int) => int.fmt(f),
            Literal::Float(float) => float.fmt(f),
            Literal::Str(string) => string.fmt(f),
            Literal::Bool(boolean) => boolean.fmt(f),
            Literal::Symbol(name) => name.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn unescape_known_and_unknown() {
        assert_eq!(unescape(r"a\tb\\c\'d"), "a\tb\\c'd");
        assert_eq!(unescape(r"\d"), "\\d");
    }

    #[test]
    fn quoted_string_round_trips_quotes() {
        let mut out = String::new();
        fmt_str(&mut out, "it's").unwrap();
        assert_eq!(out, r"'it\'s'");
    }

    #[test]
    fn keyword_is_not_a_name() {
        let mut parser = Parser::new("lambda");
        let err = parser.try_parse::<LitSym>().unwrap_err();
        assert_eq!(err.to_string(), "expected a name");
    }
}
