use crate::parser::{
    ast::{expr::Expr, unary::Unary},
    error::Error,
    token::{op::BoolOpKind, And, Or},
    Parser,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A chain of logical operations with the same operator, such as `a and b and c`.
///
/// Mixed chains nest by precedence: `a or b and c` is an `or` whose second value is the `and`
/// chain `b and c`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoolOp {
    /// The logical operator.
    pub op: BoolOpKind,

    /// The operands, at least two.
    pub values: Vec<Expr>,

    /// The region of the source code that this expression was parsed from.
    pub span: Range<usize>,
}

impl BoolOp {
    /// Returns the span of the logical expression.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Parses one level of logical operators. The operands of an `or` chain are `and` chains, and
    /// the operands of an `and` chain are `not` expressions.
    fn parse_level(input: &mut Parser, op: BoolOpKind) -> Result<Expr, Error> {
        let operand = |input: &mut Parser| match op {
            BoolOpKind::Or => Self::parse_level(input, BoolOpKind::And),
            BoolOpKind::And => Unary::parse_not_or_lower(input),
        };
        let keyword = |input: &mut Parser| match op {
            BoolOpKind::Or => input.try_parse::<Or>().is_ok(),
            BoolOpKind::And => input.try_parse::<And>().is_ok(),
        };

        let mut values = vec![operand(input)?];
        while keyword(input) {
            values.push(operand(input).map_err(Error::into_fatal)?);
        }

        if values.len() == 1 {
            return Ok(values.remove(0));
        }

        let span = values[0].span().start..values[values.len() - 1].span().end;
        Ok(Expr::BoolOp(Self { op, values, span }))
    }

    /// Parses a logical expression, or lower precedence expressions.
    pub fn parse_or_lower(input: &mut Parser) -> Result<Expr, Error> {
        Self::parse_level(input, BoolOpKind::Or)
    }
}

impl std::fmt::Display for BoolOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut iter = self.values.iter();
        if let Some(first) = iter.next() {
            first.fmt(f)?;
        }
        for value in iter {
            write!(f, " {} ", self.op.symbol())?;
            value.fmt(f)?;
        }
        Ok(())
    }
}
