use crate::expr::Expr;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A translated axis or cut: the expression, and the names of the variables it reads.
///
/// [`translate`](crate::translate) leaves `names` empty; callers that need the variable list fill
/// it with [`Dim::with_names`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Dim {
    /// The variables read by the expression.
    pub names: Vec<String>,

    /// The canonical expression.
    pub expr: Expr,
}

impl Dim {
    /// Creates a [`Dim`] with no names.
    pub fn new(expr: Expr) -> Self {
        Self { names: Vec::new(), expr }
    }

    /// Fills `names` with the variables of the expression, in order of first occurrence.
    pub fn with_names(mut self) -> Self {
        self.names = self.expr.names();
        self
    }
}

impl fmt::Display for Dim {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Dim([{}], {})", self.names.join(", "), self.expr)
    }
}
