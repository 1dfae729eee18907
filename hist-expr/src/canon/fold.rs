//! Evaluation of operators on constant operands.
//!
//! Arithmetic follows the conventions of the Python expressions being translated: booleans act as
//! the integers `0` and `1`, `/` always produces a float, `//` and `%` round toward negative
//! infinity, and integer results that do not fit in 64 bits are reported as an overflow.

use crate::expr::{BinOp, UnaryOp, Value};
use std::{collections::BTreeSet, fmt};

/// The longest string, in bytes, that folding may produce.
pub const MAX_STR_LEN: usize = 1 << 20;

/// A constant expression that cannot be evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FoldError {
    /// Division or modulo by zero, or zero raised to a negative power.
    DivisionByZero,

    /// An integer result does not fit in 64 bits, a float result is infinite, or a string result
    /// is longer than [`MAX_STR_LEN`].
    Overflow,

    /// A negative number raised to a fractional power.
    ComplexResult,

    /// The operator is not defined for the operand types.
    Unsupported {
        /// The operator symbol.
        op: &'static str,

        /// The type names of the operands.
        types: Vec<&'static str>,
    },
}

impl fmt::Display for FoldError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FoldError::DivisionByZero => write!(f, "division by zero"),
            FoldError::Overflow => write!(f, "numeric overflow"),
            FoldError::ComplexResult => write!(f, "result would be a complex number"),
            FoldError::Unsupported { op, types } => {
                let types = types.iter()
                    .map(|t| format!("'{}'", t))
                    .collect::<Vec<_>>()
                    .join(" and ");
                write!(f, "unsupported operand type(s) for {}: {}", op, types)
            },
        }
    }
}

/// A numeric operand, with booleans already widened to integers.
#[derive(Debug, Clone, Copy)]
enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(Num::Int(*b as i64)),
            Value::Int(i) => Some(Num::Int(*i)),
            Value::Float(x) => Some(Num::Float(*x)),
            _ => None,
        }
    }

    fn to_f64(self) -> f64 {
        match self {
            Num::Int(i) => i as f64,
            Num::Float(x) => x,
        }
    }
}

fn unsupported(op: &'static str, values: &[&Value]) -> FoldError {
    FoldError::Unsupported {
        op,
        types: values.iter().map(|v| v.type_name()).collect(),
    }
}

/// Floor division of integers.
fn int_floor_div(a: i64, b: i64) -> Result<i64, FoldError> {
    if b == 0 {
        return Err(FoldError::DivisionByZero);
    }
    let q = a.checked_div(b).ok_or(FoldError::Overflow)?;
    if a % b != 0 && (a < 0) != (b < 0) {
        Ok(q - 1)
    } else {
        Ok(q)
    }
}

/// Modulo of integers, taking the sign of the divisor.
fn int_mod(a: i64, b: i64) -> Result<i64, FoldError> {
    if b == 0 {
        return Err(FoldError::DivisionByZero);
    }
    let r = a.checked_rem(b).ok_or(FoldError::Overflow)?;
    if r != 0 && (r < 0) != (b < 0) {
        Ok(r + b)
    } else {
        Ok(r)
    }
}

fn int_pow(a: i64, b: i64) -> Result<Value, FoldError> {
    if b >= 0 {
        let exp = u32::try_from(b).map_err(|_| FoldError::Overflow)?;
        a.checked_pow(exp).map(Value::Int).ok_or(FoldError::Overflow)
    } else if a == 0 {
        Err(FoldError::DivisionByZero)
    } else {
        Ok(Value::Float((a as f64).powf(b as f64)))
    }
}

fn fold_int(op: BinOp, a: i64, b: i64) -> Result<Value, FoldError> {
    let checked = |result: Option<i64>| result.map(Value::Int).ok_or(FoldError::Overflow);
    match op {
        BinOp::Add => checked(a.checked_add(b)),
        BinOp::Sub => checked(a.checked_sub(b)),
        BinOp::Mul => checked(a.checked_mul(b)),
        BinOp::Div => fold_float(op, a as f64, b as f64),
        BinOp::FloorDiv => int_floor_div(a, b).map(Value::Int),
        BinOp::Mod => int_mod(a, b).map(Value::Int),
        BinOp::Pow => int_pow(a, b),
        BinOp::BitOr => Ok(Value::Int(a | b)),
        BinOp::BitAnd => Ok(Value::Int(a & b)),
        BinOp::BitXor => Ok(Value::Int(a ^ b)),
    }
}

fn fold_float(op: BinOp, a: f64, b: f64) -> Result<Value, FoldError> {
    let result = match op {
        BinOp::Add => a + b,
        BinOp::Sub => a - b,
        BinOp::Mul => a * b,
        BinOp::Div if b == 0.0 => return Err(FoldError::DivisionByZero),
        BinOp::Div => a / b,
        BinOp::FloorDiv if b == 0.0 => return Err(FoldError::DivisionByZero),
        BinOp::FloorDiv => (a / b).floor(),
        BinOp::Mod if b == 0.0 => return Err(FoldError::DivisionByZero),
        BinOp::Mod => {
            let r = a % b;
            if r != 0.0 && (r < 0.0) != (b < 0.0) {
                r + b
            } else {
                r
            }
        },
        BinOp::Pow if a == 0.0 && b < 0.0 => return Err(FoldError::DivisionByZero),
        BinOp::Pow if a < 0.0 && b.fract() != 0.0 => return Err(FoldError::ComplexResult),
        BinOp::Pow => {
            let result = a.powf(b);
            if result.is_infinite() && a.is_finite() && b.is_finite() {
                return Err(FoldError::Overflow);
            }
            result
        },
        BinOp::BitOr | BinOp::BitAnd | BinOp::BitXor => {
            return Err(FoldError::Unsupported {
                op: op.symbol(),
                types: vec!["float", "float"],
            });
        },
    };
    Ok(Value::Float(result))
}

/// Repeats a string `count` times; a non-positive count gives the empty string.
fn repeat(s: &str, count: i64) -> Result<Value, FoldError> {
    let count = usize::try_from(count.max(0)).map_err(|_| FoldError::Overflow)?;
    match s.len().checked_mul(count) {
        Some(len) if len <= MAX_STR_LEN => Ok(Value::Str(s.repeat(count))),
        _ => Err(FoldError::Overflow),
    }
}

fn fold_sets(op: BinOp, a: &BTreeSet<Value>, b: &BTreeSet<Value>) -> Option<Value> {
    let set = match op {
        BinOp::BitOr => a.union(b).cloned().collect(),
        BinOp::BitAnd => a.intersection(b).cloned().collect(),
        BinOp::BitXor => a.symmetric_difference(b).cloned().collect(),
        BinOp::Sub => a.difference(b).cloned().collect(),
        _ => return None,
    };
    Some(Value::Set(set))
}

/// Evaluates a binary operator on two constants.
pub fn fold_binary(op: BinOp, lhs: &Value, rhs: &Value) -> Result<Value, FoldError> {
    match (lhs, rhs) {
        (Value::Bool(a), Value::Bool(b)) => match op {
            BinOp::BitOr => return Ok(Value::Bool(a | b)),
            BinOp::BitAnd => return Ok(Value::Bool(a & b)),
            BinOp::BitXor => return Ok(Value::Bool(a ^ b)),
            _ => (),
        },
        (Value::Str(a), Value::Str(b)) if op == BinOp::Add => {
            if a.len() + b.len() > MAX_STR_LEN {
                return Err(FoldError::Overflow);
            }
            return Ok(Value::Str(format!("{}{}", a, b)));
        },
        (Value::Str(s), Value::Int(n)) | (Value::Int(n), Value::Str(s)) if op == BinOp::Mul => {
            return repeat(s, *n);
        },
        (Value::Str(s), Value::Bool(b)) | (Value::Bool(b), Value::Str(s)) if op == BinOp::Mul => {
            return repeat(s, *b as i64);
        },
        (Value::Set(a), Value::Set(b)) => {
            return fold_sets(op, a, b).ok_or_else(|| unsupported(op.symbol(), &[lhs, rhs]));
        },
        _ => (),
    }

    match (Num::of(lhs), Num::of(rhs)) {
        (Some(Num::Int(a)), Some(Num::Int(b))) => fold_int(op, a, b),
        (Some(a @ Num::Float(_)), Some(b)) | (Some(a), Some(b @ Num::Float(_))) => {
            fold_float(op, a.to_f64(), b.to_f64()).map_err(|err| match err {
                FoldError::Unsupported { op, .. } => unsupported(op, &[lhs, rhs]),
                err => err,
            })
        },
        _ => Err(unsupported(op.symbol(), &[lhs, rhs])),
    }
}

/// Evaluates a unary operator on a constant.
pub fn fold_unary(op: UnaryOp, value: &Value) -> Result<Value, FoldError> {
    match (op, Num::of(value)) {
        (UnaryOp::Neg, Some(Num::Int(i))) => i.checked_neg().map(Value::Int).ok_or(FoldError::Overflow),
        (UnaryOp::Neg, Some(Num::Float(x))) => Ok(Value::Float(-x)),
        (UnaryOp::Invert, Some(Num::Int(i))) => Ok(Value::Int(!i)),
        _ => Err(unsupported(op.symbol(), &[value])),
    }
}

/// Evaluates unary `+` on a constant.
pub fn fold_pos(value: &Value) -> Result<Value, FoldError> {
    match Num::of(value) {
        Some(Num::Int(i)) => Ok(Value::Int(i)),
        Some(Num::Float(x)) => Ok(Value::Float(x)),
        None => Err(unsupported("+", &[value])),
    }
}
