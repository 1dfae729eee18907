use crate::parser::{
    ast::expr::Expr,
    error::{kind, Error},
    token::{CloseParen, OpenParen},
    Parse,
    Parser,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parses the closing parenthesis matching the opening parenthesis at `open_span`. A missing
/// parenthesis is always a fatal error.
pub(crate) fn close_paren(input: &mut Parser, open_span: Range<usize>) -> Result<CloseParen, Error> {
    match input.try_parse::<CloseParen>() {
        Ok(close) => Ok(close),
        Err(_) if input.is_eof() => Err(Error::new_fatal(
            vec![open_span],
            kind::UnclosedParenthesis { opening: true },
        )),
        Err(err) => Err(err.into_fatal()),
    }
}

/// A parenthesized expression. A [`Paren`] can only contain a single expression.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Paren {
    /// The inner expression.
    pub expr: Box<Expr>,

    /// The region of the source code that this [`Paren`] was parsed from.
    pub span: Range<usize>,
}

impl Paren {
    /// Returns the span of the parenthesized expression.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

impl Parse for Paren {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let open_paren = input.try_parse::<OpenParen>()?;

        if let Ok(close_paren) = input.try_parse::<CloseParen>() {
            return Err(Error::new_fatal(
                vec![open_paren.span.start..close_paren.span.end],
                kind::EmptyParenthesis,
            ));
        }

        let expr = input.try_parse::<Expr>().map_err(Error::into_fatal)?;
        let close_paren = close_paren(input, open_paren.span.clone())?;
        Ok(Self {
            expr: Box::new(expr),
            span: open_paren.span.start..close_paren.span.end,
        })
    }
}

impl std::fmt::Display for Paren {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "(")?;
        self.expr.fmt(f)?;
        write!(f, ")")
    }
}
