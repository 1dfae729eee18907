//! Structs to help parse binary, unary and comparison operators.

use crate::{
    parser::{
        error::{Error, kind},
        token::{In, Not},
        Associativity,
        Parse,
        Parser,
        Precedence,
    },
    tokenizer::TokenKind,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The unary operation that is being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UnaryOpKind {
    Neg,
    Pos,
    Invert,
    Not,
}

impl UnaryOpKind {
    /// Returns the precedence of the unary operation.
    pub fn precedence(&self) -> Precedence {
        match self {
            Self::Neg | Self::Pos | Self::Invert => Precedence::Neg,
            Self::Not => Precedence::Not,
        }
    }

    /// Returns the symbol of the unary operation, as written in source code.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Pos => "+",
            Self::Invert => "~",
            Self::Not => "not ",
        }
    }
}

/// A unary operator that takes one operand. All unary operators are prefix operators.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnaryOp {
    /// The kind of unary operator.
    pub kind: UnaryOpKind,

    /// The region of the source code that this operator was parsed from.
    pub span: Range<usize>,
}

impl UnaryOp {
    /// Returns the precedence of the unary operator.
    pub fn precedence(&self) -> Precedence {
        self.kind.precedence()
    }
}

/// Parses one of the arithmetic prefix operators `-`, `+` and `~`. Logical `not` is parsed
/// separately, since it binds much more loosely.
impl Parse for UnaryOp {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let token = input.next_token()?;
        let kind = match token.kind {
            TokenKind::Sub => Ok(UnaryOpKind::Neg),
            TokenKind::Add => Ok(UnaryOpKind::Pos),
            TokenKind::BitNot => Ok(UnaryOpKind::Invert),
            _ => Err(Error::new(vec![token.span.clone()], kind::UnexpectedToken {
                expected: &[
                    TokenKind::Sub,
                    TokenKind::Add,
                    TokenKind::BitNot,
                ],
                found: token.kind,
            })),
        }?;

        Ok(Self {
            kind,
            span: token.span,
        })
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.symbol())
    }
}

/// The binary operation that is being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BinOpKind {
    Pow,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Add,
    Sub,
    Shl,
    Shr,
    BitAnd,
    BitXor,
    BitOr,
}

impl BinOpKind {
    /// Returns the precedence of the binary operation.
    pub fn precedence(&self) -> Precedence {
        match self {
            Self::Pow => Precedence::Pow,
            Self::Mul | Self::Div | Self::FloorDiv | Self::Mod => Precedence::Factor,
            Self::Add | Self::Sub => Precedence::Term,
            Self::Shl | Self::Shr => Precedence::Shift,
            Self::BitAnd => Precedence::BitAnd,
            Self::BitXor => Precedence::BitXor,
            Self::BitOr => Precedence::BitOr,
        }
    }

    /// Returns the associativity of the binary operation.
    pub fn associativity(&self) -> Associativity {
        match self {
            Self::Pow => Associativity::Right,
            _ => Associativity::Left,
        }
    }

    /// Returns the symbol of the binary operation, as written in source code.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Pow => "**",
            Self::Mul => "*",
            Self::Div => "/",
            Self::FloorDiv => "//",
            Self::Mod => "%",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::BitAnd => "&",
            Self::BitXor => "^",
            Self::BitOr => "|",
        }
    }
}

/// A binary operator that takes two operands.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BinOp {
    /// The kind of binary operator.
    pub kind: BinOpKind,

    /// The region of the source code that this operator was parsed from.
    pub span: Range<usize>,
}

impl BinOp {
    /// Returns the precedence of the binary operation.
    pub fn precedence(&self) -> Precedence {
        self.kind.precedence()
    }

    /// Returns the associativity of the binary operation.
    pub fn associativity(&self) -> Associativity {
        self.kind.associativity()
    }
}

impl Parse for BinOp {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let token = input.next_token()?;
        let kind = match token.kind {
            TokenKind::Pow => Ok(BinOpKind::Pow),
            TokenKind::Mul => Ok(BinOpKind::Mul),
            TokenKind::Div => Ok(BinOpKind::Div),
            TokenKind::FloorDiv => Ok(BinOpKind::FloorDiv),
            TokenKind::Mod => Ok(BinOpKind::Mod),
            TokenKind::Add => Ok(BinOpKind::Add),
            TokenKind::Sub => Ok(BinOpKind::Sub),
            TokenKind::BitLeft => Ok(BinOpKind::Shl),
            TokenKind::BitRight => Ok(BinOpKind::Shr),
            TokenKind::BitAnd => Ok(BinOpKind::BitAnd),
            TokenKind::BitXor => Ok(BinOpKind::BitXor),
            TokenKind::BitOr => Ok(BinOpKind::BitOr),
            _ => Err(Error::new(vec![token.span.clone()], kind::UnexpectedToken {
                expected: &[
                    TokenKind::Pow,
                    TokenKind::Mul,
                    TokenKind::Div,
                    TokenKind::Add,
                    TokenKind::Sub,
                ],
                found: token.kind,
            })),
        }?;

        Ok(Self {
            kind,
            span: token.span,
        })
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " {} ", self.kind.symbol())
    }
}

/// The comparison that is being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CmpOpKind {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    In,
    NotIn,
    Is,
    IsNot,
}

impl CmpOpKind {
    /// Returns the symbol of the comparison, as written in source code.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::In => "in",
            Self::NotIn => "not in",
            Self::Is => "is",
            Self::IsNot => "is not",
        }
    }
}

/// A comparison operator. The operators `not in` and `is not` are made of two tokens, and the
/// span covers both of them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CmpOp {
    /// The kind of comparison.
    pub kind: CmpOpKind,

    /// The region of the source code that this operator was parsed from.
    pub span: Range<usize>,
}

impl Parse for CmpOp {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let token = input.next_token()?;
        let (kind, end) = match token.kind {
            TokenKind::Eq => (CmpOpKind::Eq, token.span.end),
            TokenKind::NotEq => (CmpOpKind::NotEq, token.span.end),
            TokenKind::Less => (CmpOpKind::Lt, token.span.end),
            TokenKind::LessEq => (CmpOpKind::LtEq, token.span.end),
            TokenKind::Greater => (CmpOpKind::Gt, token.span.end),
            TokenKind::GreaterEq => (CmpOpKind::GtEq, token.span.end),
            TokenKind::In => (CmpOpKind::In, token.span.end),
            TokenKind::Is => match input.try_parse::<Not>() {
                Ok(not) => (CmpOpKind::IsNot, not.span.end),
                Err(_) => (CmpOpKind::Is, token.span.end),
            },
            // `not` on its own is not a comparison
            TokenKind::Not => (CmpOpKind::NotIn, input.try_parse::<In>()?.span.end),
            _ => return Err(Error::new(vec![token.span], kind::UnexpectedToken {
                expected: &[
                    TokenKind::Eq,
                    TokenKind::NotEq,
                    TokenKind::Less,
                    TokenKind::LessEq,
                    TokenKind::Greater,
                    TokenKind::GreaterEq,
                    TokenKind::In,
                    TokenKind::Is,
                ],
                found: token.kind,
            })),
        };

        Ok(Self {
            kind,
            span: token.span.start..end,
        })
    }
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " {} ", self.kind.symbol())
    }
}

/// The logical operation joining the operands of a [`BoolOp`](crate::parser::ast::bool_op::BoolOp).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BoolOpKind {
    And,
    Or,
}

impl BoolOpKind {
    /// Returns the precedence of the logical operation.
    pub fn precedence(&self) -> Precedence {
        match self {
            Self::And => Precedence::And,
            Self::Or => Precedence::Or,
        }
    }

    /// Returns the keyword of the logical operation.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }
}
