//! Syntax tree nodes produced by the parser.
//!
//! Every node carries the span of the source code it was parsed from and implements
//! [`std::fmt::Display`], which renders the node back into source form.

pub mod attribute;
pub mod binary;
pub mod bool_op;
pub mod braces;
pub mod call;
pub mod compare;
pub mod expr;
pub mod lambda;
pub mod literal;
pub mod paren;
pub mod stmt;
pub mod unary;

pub use attribute::Attribute;
pub use binary::Binary;
pub use bool_op::BoolOp;
pub use braces::{Dict, Set};
pub use call::Call;
pub use compare::Compare;
pub use expr::Expr;
pub use lambda::Lambda;
pub use literal::{Literal, LitBool, LitFloat, LitInt, LitStr, LitSym};
pub use paren::Paren;
pub use stmt::{Assign, FunctionDef, Return, Stmt};
pub use unary::Unary;
