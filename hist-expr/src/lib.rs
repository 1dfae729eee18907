//! Translates histogram axis and cut expressions into canonical symbolic expression trees.
//!
//! An expression is given as a one-line string ([`Source::Text`]) or as a function returning one
//! expression ([`Source::Function`]). Translation validates the expression, folds constant
//! subexpressions, flattens chains of associative operators, moves constants to the right of
//! comparisons, and brings logical combinations into disjunctive normal form, so that equivalent
//! spellings of an expression produce equal [`Expr`]s.
//!
//! ```
//! use hist_expr::{translate, Source};
//!
//! let a = translate(Source::Text("5 < x and not y >= 2")).unwrap();
//! let b = translate(Source::Function("lambda x, y: y < 2 and x > 5")).unwrap();
//! assert_eq!(a.expr.to_string(), "x > 5 and y < 2");
//! assert_eq!(b.expr.to_string(), "y < 2 and x > 5");
//! ```

pub mod canon;
pub mod dim;
pub mod error;
pub mod expr;
pub mod logic;
pub mod registry;
pub mod source;
pub mod translate;

pub use dim::Dim;
pub use error::Error;
pub use expr::{BinOp, Comparison, Expr, UnaryOp, Value};
pub use registry::Registry;
pub use source::Source;
pub use translate::Translator;

use tracing::debug;

/// Translates the source into a [`Dim`], resolving function calls through the default
/// [`Registry`].
///
/// The returned [`Dim`] has no names; use [`Dim::with_names`] to fill them in.
pub fn translate(source: Source) -> Result<Dim, Error> {
    translate_with(source, Registry::default_registry())
}

/// Translates the source into a [`Dim`], resolving function calls through the given registry.
#[tracing::instrument(level = "debug", skip(registry))]
pub fn translate_with(source: Source, registry: &Registry) -> Result<Dim, Error> {
    let node = source.expression()?;
    let expr = Translator::new(registry).translate(&node)?;
    debug!(%expr, "translated");
    Ok(Dim::new(expr))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn thread_safe() {
        assert_send_sync::<Expr>();
        assert_send_sync::<Dim>();
        assert_send_sync::<Registry>();
        assert_send_sync::<Error>();
    }

    #[test]
    fn deep_nesting_is_a_syntax_error() {
        let source = format!("{}x{} > 1", "(".repeat(1000), ")".repeat(1000));
        let err = translate(Source::Text(&source)).unwrap_err();
        assert!(err.is_syntax(), "expected syntax error, got {:?}", err);
        assert_eq!(err.to_string(), "expression is nested too deeply");
    }

    #[test]
    fn nesting_below_limit_translates() {
        let source = format!("{}-x{} > 1", "(".repeat(60), ")".repeat(60));
        assert_eq!(translate(Source::Text(&source)).unwrap().expr.to_string(), "-x > 1");

        let source = format!("x{} > 1", " + y".repeat(60));
        let dim = translate(Source::Text(&source)).unwrap();
        assert_eq!(dim.expr.post_order_iter().count(), 63);
    }

    #[test]
    fn translate_across_threads() {
        let handles = (0..4)
            .map(|i| std::thread::spawn(move || {
                let source = format!("{} <= x < {}", i, i + 10);
                translate(Source::Text(&source)).map(|dim| dim.expr)
            }))
            .collect::<Vec<_>>();
        for (i, handle) in handles.into_iter().enumerate() {
            let expr = handle.join().unwrap().unwrap();
            assert_eq!(expr.to_string(), format!("{} <= x < {}", i, i + 10));
        }
    }
}
