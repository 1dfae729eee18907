use crate::parser::{
    ast::{expr::Expr, paren::close_paren},
    error::Error,
    token::{CloseParen, Comma, OpenParen},
    Parser,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A function call, such as `sqrt(x)` or `numpy.sqrt(x)`.
///
/// The callee can be any primary expression; resolving it to a function is left to whoever
/// consumes the tree.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Call {
    /// The expression being called.
    pub callee: Box<Expr>,

    /// The positional arguments passed to the function.
    pub args: Vec<Expr>,

    /// The region of the source code that this function call was parsed from.
    pub span: Range<usize>,
}

impl Call {
    /// Returns the span of the function call.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Parses the parenthesized argument list following `callee`. A trailing comma is allowed.
    pub fn parse_args(input: &mut Parser, callee: Expr) -> Result<Self, Error> {
        let open_paren = input.try_parse::<OpenParen>()?;
        let mut args = Vec::new();

        loop {
            if input.clone().try_parse::<CloseParen>().is_ok() {
                break;
            }

            args.push(input.try_parse::<Expr>().map_err(Error::into_fatal)?);

            if input.try_parse::<Comma>().is_err() {
                break;
            }
        }

        let close_paren = close_paren(input, open_paren.span)?;
        let span = callee.span().start..close_paren.span.end;
        Ok(Self {
            callee: Box::new(callee),
            args,
            span,
        })
    }
}

impl std::fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.callee.fmt(f)?;
        write!(f, "(")?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            arg.fmt(f)?;
        }
        write!(f, ")")
    }
}
