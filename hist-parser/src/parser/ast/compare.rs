use crate::parser::{
    ast::{binary::Binary, expr::Expr},
    error::Error,
    token::op::CmpOp,
    Parser,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A comparison, such as `x > 5`, or a chain of comparisons, such as `0 <= x < 10`.
///
/// A chain `a op1 b op2 c` holds `a` in `left`, `[op1, op2]` in `ops`, and `[b, c]` in
/// `comparators`; there is always one comparator per operator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Compare {
    /// The leftmost operand.
    pub left: Box<Expr>,

    /// The comparison operators, in source order.
    pub ops: Vec<CmpOp>,

    /// The operands to the right of each operator.
    pub comparators: Vec<Expr>,

    /// The region of the source code that this comparison was parsed from.
    pub span: Range<usize>,
}

impl Compare {
    /// Returns the span of the comparison.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Parses a comparison chain, or lower precedence expressions if there is no comparison
    /// operator.
    pub fn parse_or_lower(input: &mut Parser) -> Result<Expr, Error> {
        let left = Binary::parse_or_lower(input)?;
        let mut ops = Vec::new();
        let mut comparators = Vec::new();

        while let Ok(op) = input.try_parse::<CmpOp>() {
            ops.push(op);
            comparators.push(Binary::parse_or_lower(input).map_err(Error::into_fatal)?);
        }

        let Some(last) = comparators.last() else {
            return Ok(left);
        };

        let span = left.span().start..last.span().end;
        Ok(Expr::Compare(Self {
            left: Box::new(left),
            ops,
            comparators,
            span,
        }))
    }
}

impl std::fmt::Display for Compare {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.left.fmt(f)?;
        for (op, comparator) in self.ops.iter().zip(&self.comparators) {
            op.fmt(f)?;
            comparator.fmt(f)?;
        }
        Ok(())
    }
}
