use crate::parser::{
    ast::{binary::Binary, compare::Compare, expr::Expr, literal::{LitInt, Literal}},
    error::Error,
    token::{op::{UnaryOp, UnaryOpKind}, Not},
    Parser,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A unary expression, such as `-x` or `not x`. Unary expressions can include nested
/// expressions.
///
/// Unary expressions do not directly implement [`Parse`]. The arithmetic prefix operators are
/// parsed by [`Unary::parse_or_lower`], and `not`, which binds more loosely than any comparison,
/// by [`Unary::parse_not_or_lower`].
///
/// [`Parse`]: crate::parser::Parse
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Unary {
    /// The operand of the unary expression.
    pub operand: Box<Expr>,

    /// The operator of the unary expression.
    pub op: UnaryOp,

    /// The region of the source code that this unary expression was parsed from.
    pub span: Range<usize>,
}

impl Unary {
    /// Returns the span of the unary expression.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Parses an arithmetic unary expression (`-x`, `+x`, `~x`), or lower precedence
    /// expressions.
    ///
    /// The operand includes any exponentiation that follows it, so `-2 ** 2` is `-(2 ** 2)`.
    pub fn parse_or_lower(input: &mut Parser) -> Result<Expr, Error> {
        let Ok(op) = input.try_parse::<UnaryOp>() else {
            return Expr::parse_primary(input);
        };

        if op.kind == UnaryOpKind::Neg {
            let min = input.try_parse_with_fn(|input| LitInt::parse_negated_min(input, op.span.clone()));
            if let Ok(min) = min {
                return Ok(Expr::Literal(Literal::Int(min)));
            }
        }

        let operand = input.nested(|input| {
            let lhs = Unary::parse_or_lower(input).map_err(Error::into_fatal)?;
            Binary::parse_expr(input, lhs, op.precedence())
        })?;
        let span = op.span.start..operand.span().end;
        Ok(Expr::Unary(Self {
            operand: Box::new(operand),
            op,
            span,
        }))
    }

    /// Parses a logical negation (`not x`), or lower precedence expressions.
    pub fn parse_not_or_lower(input: &mut Parser) -> Result<Expr, Error> {
        let Ok(not) = input.try_parse::<Not>() else {
            return Compare::parse_or_lower(input);
        };

        let operand = input.nested(Unary::parse_not_or_lower).map_err(Error::into_fatal)?;
        let span = not.span.start..operand.span().end;
        Ok(Expr::Unary(Self {
            operand: Box::new(operand),
            op: UnaryOp {
                kind: UnaryOpKind::Not,
                span: not.span,
            },
            span,
        }))
    }
}

impl std::fmt::Display for Unary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.op.fmt(f)?;
        self.operand.fmt(f)
    }
}
