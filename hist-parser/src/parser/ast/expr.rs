use crate::{
    parser::{
        ast::{
            attribute::Attribute,
            binary::Binary,
            bool_op::BoolOp,
            braces::{self, Dict, Set},
            call::Call,
            compare::Compare,
            lambda::Lambda,
            literal::{Literal, LitSym},
            paren::Paren,
            unary::Unary,
        },
        error::{kind, Error},
        token::Dot,
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
    try_parse_catch_fatal,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The token kinds that can begin an expression, reported when none of them is found.
const EXPR_START: &[TokenKind] = &[
    TokenKind::Int,
    TokenKind::Float,
    TokenKind::Str,
    TokenKind::Name,
    TokenKind::OpenParen,
    TokenKind::OpenBrace,
];

/// Represents any kind of expression in the language.
///
/// An expression is any valid piece of code that produces a value: the body of a cut, the
/// quantity plotted along an axis, or the value returned from a function.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expr {
    /// A literal value, including names.
    Literal(Literal),

    /// A parenthesized expression, such as `(1 + 2)`.
    Paren(Paren),

    /// A set display, such as `{1, 2, 3}`.
    Set(Set),

    /// A dict display, such as `{}` or `{'a': 1}`.
    Dict(Dict),

    /// Attribute access, such as `numpy.sqrt`.
    Attribute(Attribute),

    /// A function call, such as `sqrt(x)`.
    Call(Call),

    /// A unary operation, such as `-x` or `not x`.
    Unary(Unary),

    /// A binary operation, such as `1 + 2`.
    Binary(Binary),

    /// A comparison or chain of comparisons, such as `x > 5` or `0 <= x < 10`.
    Compare(Compare),

    /// A chain of `and` or `or` operations.
    BoolOp(BoolOp),

    /// An anonymous function, such as `lambda x: x + 1`.
    Lambda(Lambda),
}

impl Expr {
    /// Returns the span of the expression.
    pub fn span(&self) -> Range<usize> {
        match self {
            Expr::Literal(literal) => literal.span(),
            Expr::Paren(paren) => paren.span(),
            Expr::Set(set) => set.span(),
            Expr::Dict(dict) => dict.span(),
            Expr::Attribute(attribute) => attribute.span(),
            Expr::Call(call) => call.span(),
            Expr::Unary(unary) => unary.span(),
            Expr::Binary(binary) => binary.span(),
            Expr::Compare(compare) => compare.span(),
            Expr::BoolOp(bool_op) => bool_op.span(),
            Expr::Lambda(lambda) => lambda.span(),
        }
    }

    /// Parses an atom: a literal, a parenthesized expression, or a set / dict display.
    fn parse_atom(input: &mut Parser) -> Result<Self, Error> {
        let _ = try_parse_catch_fatal!(input.try_parse::<Literal>().map(Expr::Literal));
        let _ = try_parse_catch_fatal!(input.try_parse::<Paren>().map(Expr::Paren));
        let _ = try_parse_catch_fatal!(input.try_parse_with_fn(braces::parse_braces));

        // none of the alternatives matched; report the token that could not start an expression
        let token = input.clone().next_token()?;
        Err(Error::new(vec![token.span], kind::UnexpectedToken {
            expected: EXPR_START,
            found: token.kind,
        }))
    }

    /// Parses a primary expression: an atom followed by any number of attribute accesses and
    /// calls, such as `numpy.sqrt(x)`.
    pub fn parse_primary(input: &mut Parser) -> Result<Self, Error> {
        let mut primary = Self::parse_atom(input)?;

        loop {
            match input.peek_kind() {
                Some(TokenKind::Dot) => {
                    input.try_parse::<Dot>()?;
                    let attr = input.try_parse::<LitSym>().map_err(Error::into_fatal)?;
                    let span = primary.span().start..attr.span.end;
                    primary = Expr::Attribute(Attribute {
                        value: Box::new(primary),
                        attr,
                        span,
                    });
                },
                Some(TokenKind::OpenParen) => {
                    primary = Expr::Call(Call::parse_args(input, primary)?);
                },
                _ => break Ok(primary),
            }
        }
    }
}

impl Parse for Expr {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        input.nested(|input| {
            if input.peek_kind() == Some(TokenKind::Lambda) {
                return input.try_parse::<Lambda>().map(Expr::Lambda);
            }

            BoolOp::parse_or_lower(input)
        })
    }
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(literal) => literal.fmt(f),
            Expr::Paren(paren) => paren.fmt(f),
            Expr::Set(set) => set.fmt(f),
            Expr::Dict(dict) => dict.fmt(f),
            Expr::Attribute(attribute) => attribute.fmt(f),
            Expr::Call(call) => call.fmt(f),
            Expr::Unary(unary) => unary.fmt(f),
            Expr::Binary(binary) => binary.fmt(f),
            Expr::Compare(compare) => compare.fmt(f),
            Expr::BoolOp(bool_op) => bool_op.fmt(f),
            Expr::Lambda(lambda) => lambda.fmt(f),
        }
    }
}
