use crate::parser::{
    ast::{expr::Expr, unary::Unary},
    error::{kind::NonFatal, Error},
    token::op::BinOp,
    Associativity,
    Precedence,
    Parser,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A binary expression, such as `1 + 2`. Binary expressions can include nested expressions.
///
/// Only arithmetic and bitwise operators form binary expressions. Comparisons and logical
/// operators have their own nodes ([`Compare`] and [`BoolOp`]), since they can be chained.
///
/// [`Compare`]: crate::parser::ast::compare::Compare
/// [`BoolOp`]: crate::parser::ast::bool_op::BoolOp
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Binary {
    /// The left-hand side of the binary expression.
    pub lhs: Box<Expr>,

    /// The operator of the binary expression.
    pub op: BinOp,

    /// The right-hand side of the binary expression.
    pub rhs: Box<Expr>,

    /// The region of the source code that this binary expression was parsed from.
    pub span: Range<usize>,
}

impl Binary {
    /// Returns the span of the binary expression.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// After parsing the left-hand-side, the operator, and the right-hand-side of a potential
    /// binary expression, parse ahead to see if the right-hand-side is incomplete.
    ///
    /// If we are parsing the expression `1 + 2 * 3`, we will first parse the left-hand-side `1`,
    /// then the operator `+`, then the right-hand-side `2`. However, before we build the
    /// corresponding AST node, we should check if the operator after `2` has higher precedence
    /// than `+` (if it exists).
    ///
    /// If it does, we should parse the expression starting with `2` first, so that we get `2 * 3`
    /// as the right-hand-side to the `1 +` node. This works by calling into [`Self::parse_expr`]
    /// again, but with `rhs` (`2` in this case) as the `lhs` argument.
    ///
    /// If it does not (such as in the expression `3 * 2 + 1`), we build the AST node `3 * 2`
    /// first. Then, [`Self::parse_expr`] will pick up the `+ 1` part of the expression, and
    /// build the AST node `3 * 2 + 1`.
    fn complete_rhs(input: &mut Parser, lhs: Expr, op: BinOp, mut rhs: Expr) -> Result<Expr, Error> {
        let precedence = op.precedence();

        loop {
            // clone the input stream to emulate peeking
            let mut input_ahead = input.clone();
            let Ok(next_op) = input_ahead.try_parse::<BinOp>() else {
                break;
            };

            let binds_tighter = next_op.precedence() > precedence
                || (next_op.precedence() == precedence && next_op.associativity() == Associativity::Right);
            if binds_tighter {
                // parse the expression starting with `rhs` first
                rhs = input.nested(|input| Self::parse_expr(input, rhs, next_op.precedence()))?;
            } else {
                // lower precedence, or equal precedence and left-associativity, as in
                // `1 * 2 + 3` or `1 * 2 * 3`; let `lhs op rhs` become a node and pick up this
                // operator on the next iteration of the outside loop
                break;
            }
        }

        let span = lhs.span().start..rhs.span().end;
        Ok(Expr::Binary(Binary {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
            span,
        }))
    }

    /// After parsing the left-hand-side of a potential binary expression, parse ahead to see if
    /// there is a binary operator of at least the given precedence and a right-hand-side.
    ///
    /// Each operator in the chain nests the expression built so far one level deeper.
    pub fn parse_expr(input: &mut Parser, mut lhs: Expr, precedence: Precedence) -> Result<Expr, Error> {
        input.scoped(|input| {
            loop {
                let op = input.try_parse_then::<BinOp, _>(|op, input| {
                    if op.precedence() >= precedence {
                        Ok(())
                    } else {
                        Err(input.error(NonFatal))
                    }
                });
                let Ok(op) = op else {
                    break;
                };

                input.deepen()?;
                let rhs = Unary::parse_or_lower(input).map_err(Error::into_fatal)?;
                lhs = Self::complete_rhs(input, lhs, op, rhs)?;
            }

            Ok(lhs)
        })
    }

    /// Parses a binary expression made of arithmetic and bitwise operators, or lower precedence
    /// expressions.
    pub fn parse_or_lower(input: &mut Parser) -> Result<Expr, Error> {
        let lhs = Unary::parse_or_lower(input)?;
        Self::parse_expr(input, lhs, Precedence::BitOr)
    }
}

impl std::fmt::Display for Binary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.lhs.fmt(f)?;
        self.op.fmt(f)?;
        self.rhs.fmt(f)
    }
}
