//! Construction of canonical expression nodes from already-translated operands.
//!
//! Each constructor folds constant operands, flattens operator chains, or orients comparisons so
//! that equivalent spellings of an expression produce equal trees.

pub mod fold;

use crate::expr::{BinOp, Comparison, Expr, UnaryOp};
use fold::{fold_binary, fold_unary, FoldError};

/// A comparison that does not relate exactly one unknown expression to one constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationError {
    /// Both sides are constants.
    BothConstant,

    /// Neither side is a constant.
    NeitherConstant,

    /// A membership test with the constant on the left, such as `1 in x`.
    ConstantLeftMembership,
}

/// A chained comparison that does not form an interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalError {
    /// The pair of operators is not one of `<=`/`<`, `<`/`<=`, `>`/`>=`, `>=`/`>`.
    InvalidOps,

    /// The middle expression is a constant.
    ConstantMiddle,

    /// One of the edges is not a constant.
    NonConstantBound,
}

/// Applies a unary operator. A constant operand is folded, and applying the same operator twice
/// cancels out.
pub fn unary(op: UnaryOp, arg: Expr) -> Result<Expr, FoldError> {
    match arg {
        Expr::Const(value) => fold_unary(op, &value).map(Expr::Const),
        Expr::UnaryOp { op: inner, arg } if inner == op => Ok(*arg),
        arg => Ok(Expr::UnaryOp { op, arg: Box::new(arg) }),
    }
}

/// Applies a binary operator. Two constant operands are folded; otherwise the operands are
/// collected into one [`Expr::BinOp`], flattening operands that use the same operator.
///
/// An n-ary `BinOp` applies its operator left to right, so a left operand using the same
/// operator is flattened, and a right operand only when the operator is associative. `**` groups
/// to the right and is never flattened.
pub fn binop(op: BinOp, lhs: Expr, rhs: Expr) -> Result<Expr, FoldError> {
    if let (Expr::Const(a), Expr::Const(b)) = (&lhs, &rhs) {
        return fold_binary(op, a, b).map(Expr::Const);
    }

    let mut args = Vec::new();
    match lhs {
        Expr::BinOp { op: inner, args: inner_args } if inner == op && op != BinOp::Pow => {
            args.extend(inner_args)
        },
        lhs => args.push(lhs),
    }
    match rhs {
        Expr::BinOp { op: inner, args: inner_args } if inner == op && op.is_associative() => {
            args.extend(inner_args)
        },
        rhs => args.push(rhs),
    }

    Ok(Expr::BinOp { op, args })
}

/// Builds a [`Expr::Relation`] from a comparison of two operands, exactly one of which must be a
/// constant. A constant on the left is moved to the right by mirroring the operator, so `5 < x`
/// becomes `x > 5`.
pub fn relation(cmp: Comparison, left: Expr, right: Expr) -> Result<Expr, RelationError> {
    match (left, right) {
        (Expr::Const(_), Expr::Const(_)) => Err(RelationError::BothConstant),
        (Expr::Const(constant), arg) => {
            let cmp = cmp.mirror().ok_or(RelationError::ConstantLeftMembership)?;
            Ok(Expr::Relation { cmp, arg: Box::new(arg), constant })
        },
        (arg, Expr::Const(constant)) => Ok(Expr::Relation { cmp, arg: Box::new(arg), constant }),
        _ => Err(RelationError::NeitherConstant),
    }
}

/// Builds a [`Expr::Interval`] from the chained comparison `a op1 x op2 b`.
pub fn interval(
    (op1, op2): (Comparison, Comparison),
    a: Expr,
    x: Expr,
    b: Expr,
) -> Result<Expr, IntervalError> {
    let (low, high, low_closed) = match (op1, op2) {
        (Comparison::LtEq, Comparison::Lt) => (a, b, true),
        (Comparison::Lt, Comparison::LtEq) => (a, b, false),
        (Comparison::Gt, Comparison::GtEq) => (b, a, true),
        (Comparison::GtEq, Comparison::Gt) => (b, a, false),
        _ => return Err(IntervalError::InvalidOps),
    };

    if x.is_const() {
        return Err(IntervalError::ConstantMiddle);
    }
    match (low, high) {
        (Expr::Const(low), Expr::Const(high)) => Ok(Expr::Interval {
            arg: Box::new(x),
            low,
            high,
            low_closed,
        }),
        _ => Err(IntervalError::NonConstantBound),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::expr::Value;
    use super::*;

    fn x() -> Expr {
        Expr::name("x")
    }

    fn int(i: i64) -> Expr {
        Expr::Const(Value::Int(i))
    }

    #[test]
    fn unary_cancels() {
        let neg = unary(UnaryOp::Neg, x()).unwrap();
        assert_eq!(unary(UnaryOp::Neg, neg.clone()).unwrap(), x());
        assert_eq!(
            unary(UnaryOp::Invert, neg.clone()).unwrap(),
            Expr::UnaryOp { op: UnaryOp::Invert, arg: Box::new(neg) }
        );
        assert_eq!(unary(UnaryOp::Neg, int(5)).unwrap(), int(-5));
    }

    #[test]
    fn associative_flattening() {
        let (a, b, c) = (Expr::name("a"), Expr::name("b"), Expr::name("c"));
        let left = binop(BinOp::Add, binop(BinOp::Add, a.clone(), b.clone()).unwrap(), c.clone());
        let right = binop(BinOp::Add, a.clone(), binop(BinOp::Add, b.clone(), c.clone()).unwrap());
        let expected = Expr::BinOp { op: BinOp::Add, args: vec![a, b, c] };
        assert_eq!(left.unwrap(), expected);
        assert_eq!(right.unwrap(), expected);
    }

    #[test]
    fn non_associative_right_operand_kept() {
        let (a, b, c) = (Expr::name("a"), Expr::name("b"), Expr::name("c"));
        let inner = binop(BinOp::Sub, b.clone(), c.clone()).unwrap();
        let expr = binop(BinOp::Sub, a.clone(), inner.clone()).unwrap();
        assert_eq!(expr, Expr::BinOp { op: BinOp::Sub, args: vec![a.clone(), inner] });

        let expr = binop(BinOp::Sub, binop(BinOp::Sub, a.clone(), b.clone()).unwrap(), c.clone());
        assert_eq!(expr.unwrap(), Expr::BinOp { op: BinOp::Sub, args: vec![a, b, c] });
    }

    #[test]
    fn power_never_flattened() {
        let (a, b, c) = (Expr::name("a"), Expr::name("b"), Expr::name("c"));
        let inner = binop(BinOp::Pow, a.clone(), b.clone()).unwrap();
        let expr = binop(BinOp::Pow, inner.clone(), c.clone()).unwrap();
        assert_eq!(expr, Expr::BinOp { op: BinOp::Pow, args: vec![inner, c.clone()] });
        assert_eq!(expr.to_string(), "(a ** b) ** c");

        let inner = binop(BinOp::Pow, b, c).unwrap();
        let expr = binop(BinOp::Pow, a.clone(), inner.clone()).unwrap();
        assert_eq!(expr, Expr::BinOp { op: BinOp::Pow, args: vec![a, inner] });
        assert_eq!(expr.to_string(), "a ** (b ** c)");
    }

    #[test]
    fn different_operators_not_flattened() {
        let sum = binop(BinOp::Add, x(), int(1)).unwrap();
        let expr = binop(BinOp::Mul, sum.clone(), int(2)).unwrap();
        assert_eq!(expr, Expr::BinOp { op: BinOp::Mul, args: vec![sum, int(2)] });
    }

    #[test]
    fn constants_fold() {
        assert_eq!(binop(BinOp::Add, int(2), int(3)), Ok(int(5)));
        assert_eq!(binop(BinOp::FloorDiv, int(1), int(0)), Err(FoldError::DivisionByZero));
    }

    #[test]
    fn relation_orientation() {
        let left = relation(Comparison::Lt, int(5), x()).unwrap();
        let right = relation(Comparison::Gt, x(), int(5)).unwrap();
        assert_eq!(left, right);
        assert_eq!(right.to_string(), "x > 5");

        assert_eq!(relation(Comparison::Eq, int(1), int(2)), Err(RelationError::BothConstant));
        assert_eq!(relation(Comparison::Eq, x(), x()), Err(RelationError::NeitherConstant));
        assert_eq!(
            relation(Comparison::In, int(1), x()),
            Err(RelationError::ConstantLeftMembership)
        );
    }

    #[test]
    fn intervals() {
        let closed = interval((Comparison::LtEq, Comparison::Lt), int(0), x(), int(10)).unwrap();
        assert_eq!(closed, Expr::Interval {
            arg: Box::new(x()),
            low: Value::Int(0),
            high: Value::Int(10),
            low_closed: true,
        });

        let flipped = interval((Comparison::Gt, Comparison::GtEq), int(10), x(), int(0)).unwrap();
        assert_eq!(flipped, closed);

        let open = interval((Comparison::GtEq, Comparison::Gt), int(10), x(), int(0)).unwrap();
        assert_eq!(open.to_string(), "0 < x <= 10");

        assert_eq!(
            interval((Comparison::Lt, Comparison::Lt), int(0), x(), int(10)),
            Err(IntervalError::InvalidOps)
        );
        assert_eq!(
            interval((Comparison::LtEq, Comparison::Lt), int(0), int(5), int(10)),
            Err(IntervalError::ConstantMiddle)
        );
        assert_eq!(
            interval((Comparison::LtEq, Comparison::Lt), Expr::name("a"), x(), int(10)),
            Err(IntervalError::NonConstantBound)
        );
    }
}
