//! The canonical symbolic expression tree produced by translation.

pub mod iter;
pub mod value;

use iter::ExprIter;
use std::{fmt, slice};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use value::Value;

/// A unary arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UnaryOp {
    /// Negation, `-x`.
    Neg,

    /// Bitwise inversion, `~x`.
    Invert,
}

impl UnaryOp {
    /// Returns the symbol of the operator.
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Invert => "~",
        }
    }
}

/// A binary arithmetic or bitwise operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
    BitOr,
    BitAnd,
    BitXor,
}

impl BinOp {
    /// Returns the symbol of the operator.
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::FloorDiv => "//",
            BinOp::Mod => "%",
            BinOp::Pow => "**",
            BinOp::BitOr => "|",
            BinOp::BitAnd => "&",
            BinOp::BitXor => "^",
        }
    }

    /// Returns true if `a op (b op c)` is the same as `(a op b) op c`.
    pub fn is_associative(&self) -> bool {
        matches!(self, BinOp::Add | BinOp::Mul | BinOp::BitOr | BinOp::BitAnd | BinOp::BitXor)
    }
}

/// A comparison operator used in a [`Expr::Relation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Comparison {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    In,
    NotIn,
}

impl Comparison {
    /// Returns the symbol of the operator.
    pub fn symbol(&self) -> &'static str {
        match self {
            Comparison::Eq => "==",
            Comparison::NotEq => "!=",
            Comparison::Lt => "<",
            Comparison::LtEq => "<=",
            Comparison::Gt => ">",
            Comparison::GtEq => ">=",
            Comparison::In => "in",
            Comparison::NotIn => "not in",
        }
    }

    /// Returns the operator that gives the same result with its operands swapped, so that
    /// `a op b` is `b op.mirror() a`.
    ///
    /// Membership has no mirror; `None` is returned for `in` and `not in`.
    pub fn mirror(&self) -> Option<Self> {
        match self {
            Comparison::Eq => Some(Comparison::Eq),
            Comparison::NotEq => Some(Comparison::NotEq),
            Comparison::Lt => Some(Comparison::Gt),
            Comparison::LtEq => Some(Comparison::GtEq),
            Comparison::Gt => Some(Comparison::Lt),
            Comparison::GtEq => Some(Comparison::LtEq),
            Comparison::In | Comparison::NotIn => None,
        }
    }

    /// Returns the operator that gives the opposite result on the same operands.
    pub fn inverse(&self) -> Self {
        match self {
            Comparison::Eq => Comparison::NotEq,
            Comparison::NotEq => Comparison::Eq,
            Comparison::Lt => Comparison::GtEq,
            Comparison::LtEq => Comparison::Gt,
            Comparison::Gt => Comparison::LtEq,
            Comparison::GtEq => Comparison::Lt,
            Comparison::In => Comparison::NotIn,
            Comparison::NotIn => Comparison::In,
        }
    }
}

/// A canonical symbolic expression.
///
/// Equality and hashing are structural, so two expressions compare equal exactly when they were
/// written in ways that canonicalize to the same tree (`5 < x` and `x > 5`, `(a + b) + c` and
/// `a + (b + c)`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expr {
    /// A constant value.
    Const(Value),

    /// A reference to a free variable.
    Name(String),

    /// A call to a registered function, by its canonical name.
    Call {
        fcn: String,
        args: Vec<Expr>,
    },

    /// A unary operator applied to a non-constant operand.
    UnaryOp {
        op: UnaryOp,
        arg: Box<Expr>,
    },

    /// A binary operator applied to two or more operands, left to right. Same-operator chains are
    /// flattened into one node.
    BinOp {
        op: BinOp,
        args: Vec<Expr>,
    },

    /// A comparison between a non-constant expression and a constant.
    Relation {
        cmp: Comparison,
        arg: Box<Expr>,
        constant: Value,
    },

    /// A two-sided bound `low <= arg < high` (or `low < arg <= high` when the low edge is open).
    Interval {
        arg: Box<Expr>,
        low: Value,
        high: Value,
        low_closed: bool,
    },

    /// A conjunction. Never contains another `And` or an `Or`.
    And(Vec<Expr>),

    /// A disjunction. Never contains another `Or`.
    Or(Vec<Expr>),
}

impl Expr {
    /// Creates a [`Expr::Name`].
    pub fn name(name: impl Into<String>) -> Self {
        Expr::Name(name.into())
    }

    /// Returns the function name of a [`Expr::Call`], or the operator symbol of a
    /// [`Expr::UnaryOp`] or [`Expr::BinOp`].
    pub fn fcn(&self) -> Option<&str> {
        match self {
            Expr::Call { fcn, .. } => Some(fcn),
            Expr::UnaryOp { op, .. } => Some(op.symbol()),
            Expr::BinOp { op, .. } => Some(op.symbol()),
            _ => None,
        }
    }

    /// Returns the arguments of a [`Expr::Call`], [`Expr::UnaryOp`] or [`Expr::BinOp`].
    pub fn args(&self) -> Option<&[Expr]> {
        match self {
            Expr::Call { args, .. } | Expr::BinOp { args, .. } => Some(args),
            Expr::UnaryOp { arg, .. } => Some(slice::from_ref(arg.as_ref())),
            _ => None,
        }
    }

    /// Returns the direct subexpressions of this expression, left to right.
    pub fn children(&self) -> &[Expr] {
        match self {
            Expr::Const(_) | Expr::Name(_) => &[],
            Expr::Call { args, .. } | Expr::BinOp { args, .. } => args,
            Expr::UnaryOp { arg, .. }
                | Expr::Relation { arg, .. }
                | Expr::Interval { arg, .. } => slice::from_ref(arg.as_ref()),
            Expr::And(args) | Expr::Or(args) => args,
        }
    }

    /// Returns true if the expression is a [`Expr::Const`].
    pub fn is_const(&self) -> bool {
        matches!(self, Expr::Const(_))
    }

    /// Returns true if the expression is a predicate: a relation, an interval, or a conjunction
    /// or disjunction of them.
    pub fn is_boolean(&self) -> bool {
        matches!(self, Expr::Relation { .. } | Expr::Interval { .. } | Expr::And(_) | Expr::Or(_))
    }

    /// Returns an iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first).
    pub fn post_order_iter(&self) -> ExprIter {
        ExprIter::new(self)
    }

    /// Returns the distinct variable names used in the expression, in order of first occurrence.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for expr in self.post_order_iter() {
            if let Expr::Name(name) = expr {
                if !names.contains(name) {
                    names.push(name.clone());
                }
            }
        }
        names
    }
}

/// Writes the expression, wrapped in parentheses if `paren` is true.
fn fmt_operand(f: &mut fmt::Formatter, expr: &Expr, paren: bool) -> fmt::Result {
    if paren {
        write!(f, "({})", expr)
    } else {
        write!(f, "{}", expr)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Const(value) => value.fmt(f),
            Expr::Name(name) => write!(f, "{}", name),
            Expr::Call { fcn, args } => {
                write!(f, "{}(", fcn)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    arg.fmt(f)?;
                }
                write!(f, ")")
            },
            Expr::UnaryOp { op, arg } => {
                write!(f, "{}", op.symbol())?;
                fmt_operand(f, arg, !arg.children().is_empty() && !matches!(**arg, Expr::Call { .. }))
            },
            Expr::BinOp { op, args } => {
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {} ", op.symbol())?;
                    }
                    let paren = match arg {
                        Expr::BinOp { .. } | Expr::Relation { .. } | Expr::Interval { .. }
                            | Expr::And(_) | Expr::Or(_) => true,
                        // `-x ** 2` would read as `-(x ** 2)`
                        Expr::UnaryOp { .. } => *op == BinOp::Pow && i == 0,
                        _ => false,
                    };
                    fmt_operand(f, arg, paren)?;
                }
                Ok(())
            },
            Expr::Relation { cmp, arg, constant } => {
                write!(f, "{} {} {}", arg, cmp.symbol(), constant)
            },
            Expr::Interval { arg, low, high, low_closed } => {
                if *low_closed {
                    write!(f, "{} <= {} < {}", low, arg, high)
                } else {
                    write!(f, "{} < {} <= {}", low, arg, high)
                }
            },
            Expr::And(args) => {
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, " and ")?;
                    }
                    fmt_operand(f, arg, matches!(arg, Expr::Or(_)))?;
                }
                Ok(())
            },
            Expr::Or(args) => {
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, " or ")?;
                    }
                    fmt_operand(f, arg, matches!(arg, Expr::And(_)))?;
                }
                Ok(())
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn gt(name: &str, value: i64) -> Expr {
        Expr::Relation {
            cmp: Comparison::Gt,
            arg: Box::new(Expr::name(name)),
            constant: Value::Int(value),
        }
    }

    #[test]
    fn mirror_and_inverse() {
        for cmp in [Comparison::Eq, Comparison::NotEq, Comparison::Lt, Comparison::GtEq] {
            assert_eq!(cmp.mirror().and_then(|c| c.mirror()), Some(cmp));
            assert_eq!(cmp.inverse().inverse(), cmp);
        }
        assert_eq!(Comparison::In.mirror(), None);
        assert_eq!(Comparison::In.inverse(), Comparison::NotIn);
    }

    #[test]
    fn call_subtypes() {
        let neg = Expr::UnaryOp { op: UnaryOp::Neg, arg: Box::new(Expr::name("x")) };
        assert_eq!(neg.fcn(), Some("-"));
        assert_eq!(neg.args(), Some(&[Expr::name("x")][..]));

        let call = Expr::Call { fcn: "sqrt".to_string(), args: vec![Expr::name("x")] };
        assert_eq!(call.fcn(), Some("sqrt"));
        assert_eq!(gt("x", 1).fcn(), None);
    }

    #[test]
    fn display_unary() {
        let neg_sum = Expr::UnaryOp {
            op: UnaryOp::Neg,
            arg: Box::new(Expr::BinOp {
                op: BinOp::Add,
                args: vec![Expr::name("a"), Expr::name("b")],
            }),
        };
        assert_eq!(neg_sum.to_string(), "-(a + b)");

        let inv = Expr::UnaryOp { op: UnaryOp::Invert, arg: Box::new(Expr::name("x")) };
        assert_eq!(inv.to_string(), "~x");
    }

    #[test]
    fn display_interval() {
        let interval = Expr::Interval {
            arg: Box::new(Expr::name("x")),
            low: Value::Int(0),
            high: Value::Float(2.5),
            low_closed: false,
        };
        assert_eq!(interval.to_string(), "0 < x <= 2.5");
    }

    #[test]
    fn display_dnf() {
        let expr = Expr::Or(vec![
            Expr::And(vec![gt("x", 1), gt("y", 2)]),
            gt("z", 3),
        ]);
        assert_eq!(expr.to_string(), "(x > 1 and y > 2) or z > 3");
    }

    #[test]
    fn names_in_first_occurrence_order() {
        let expr = Expr::And(vec![
            gt("y", 1),
            Expr::Relation {
                cmp: Comparison::Lt,
                arg: Box::new(Expr::BinOp {
                    op: BinOp::Add,
                    args: vec![Expr::name("x"), Expr::name("y")],
                }),
                constant: Value::Int(2),
            },
        ]);
        assert_eq!(expr.names(), vec!["y".to_string(), "x".to_string()]);
    }

    #[test]
    fn structural_equality() {
        let a = Expr::Const(Value::Set([Value::Int(2), Value::Int(1)].into_iter().collect()));
        let b = Expr::Const(Value::Set([Value::Int(1), Value::Int(2)].into_iter().collect()));
        assert_eq!(a, b);
    }
}
