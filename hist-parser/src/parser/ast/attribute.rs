use crate::parser::ast::{expr::Expr, literal::{Literal, LitSym}};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Attribute access, such as `numpy.sqrt`. Parsed as part of a primary expression by
/// [`Expr::parse_primary`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Attribute {
    /// The expression whose attribute is accessed.
    pub value: Box<Expr>,

    /// The name of the attribute.
    pub attr: LitSym,

    /// The region of the source code that this expression was parsed from.
    pub span: Range<usize>,
}

impl Attribute {
    /// Returns the span of the attribute access.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Returns the dotted path of this attribute access, such as `["numpy", "sqrt"]`, if every
    /// component of it is a plain name.
    pub fn dotted_path(&self) -> Option<Vec<&str>> {
        let mut path = match self.value.as_ref() {
            Expr::Literal(Literal::Symbol(sym)) => vec![sym.name.as_str()],
            Expr::Attribute(inner) => inner.dotted_path()?,
            _ => return None,
        };
        path.push(&self.attr.name);
        Some(path)
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}", self.value, self.attr)
    }
}
