//! Tokenizer and parser for the small Python-like language used to write axis and cut
//! expressions.
//!
//! The parser produces a closed syntax tree ([`parser::ast::Expr`] and [`parser::ast::Stmt`])
//! that keeps the span of every node, so that later stages can point at the exact fragment of
//! source code they reject.
//!
//! ```
//! use hist_parser::parser::{ast::{Expr, Stmt}, Parser};
//!
//! let mut parser = Parser::new("0 <= x < 10");
//! let stmts = parser.try_parse_full_many::<Stmt>().unwrap();
//! assert_eq!(stmts.len(), 1);
//! assert!(matches!(stmts[0], Stmt::Expr(Expr::Compare(_))));
//! ```

pub mod parser;
pub mod tokenizer;
