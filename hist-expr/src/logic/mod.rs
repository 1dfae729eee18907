//! Normalization of predicates into disjunctive normal form.
//!
//! Predicates built by [`negate`], [`conjoin`] and [`disjoin`] are always an [`Expr::Or`] of
//! [`Expr::And`]s of simple terms (relations and intervals), with single-element groups collapsed:
//! an `And` never contains another `And` or an `Or`, and an `Or` never contains another `Or`.

use crate::expr::{Comparison, Expr};
use tracing::trace;

/// Returns the logical negation of a predicate, pushing the negation down to the simple terms.
///
/// # Panics
///
/// Panics if the expression is not a predicate (see [`Expr::is_boolean`]).
pub fn negate(expr: Expr) -> Expr {
    trace!(%expr, "negate");
    match expr {
        Expr::Relation { cmp, arg, constant } => Expr::Relation {
            cmp: cmp.inverse(),
            arg,
            constant,
        },
        Expr::Interval { arg, low, high, low_closed } => {
            let (below, above) = if low_closed {
                (Comparison::Lt, Comparison::GtEq)
            } else {
                (Comparison::LtEq, Comparison::Gt)
            };
            Expr::Or(vec![
                Expr::Relation { cmp: below, arg: arg.clone(), constant: low },
                Expr::Relation { cmp: above, arg, constant: high },
            ])
        },
        Expr::And(args) => disjoin(args.into_iter().map(negate).collect()),
        Expr::Or(args) => conjoin(args.into_iter().map(negate).collect()),
        expr => unreachable!("cannot negate non-boolean expression `{}`", expr),
    }
}

/// Returns the conjunction of the given predicates, distributing over any disjunctions.
///
/// # Panics
///
/// Panics if `args` is empty.
pub fn conjoin(args: Vec<Expr>) -> Expr {
    assert!(!args.is_empty(), "cannot conjoin zero expressions");
    trace!(count = args.len(), "conjoin");

    // each group is a disjunction of branches, each branch a conjunction of terms
    let mut simple = Vec::new();
    let mut groups: Vec<Vec<Expr>> = Vec::new();
    for arg in args {
        match arg {
            Expr::And(terms) => simple.extend(terms),
            Expr::Or(branches) => groups.push(branches),
            term => simple.push(term),
        }
    }

    let mut product: Vec<Vec<Expr>> = vec![simple];
    for group in groups {
        product = product
            .iter()
            .flat_map(|prefix| group.iter().map(move |branch| {
                let mut terms = prefix.clone();
                match branch {
                    Expr::And(inner) => terms.extend(inner.iter().cloned()),
                    term => terms.push(term.clone()),
                }
                terms
            }))
            .collect();
    }

    let mut branches = product
        .into_iter()
        .map(|mut terms| match terms.len() {
            1 => terms.remove(0),
            _ => Expr::And(terms),
        })
        .collect::<Vec<_>>();

    match branches.len() {
        0 => unreachable!("conjunction produced no branches"),
        1 => branches.remove(0),
        _ => Expr::Or(branches),
    }
}

/// Returns the disjunction of the given predicates, flattening nested disjunctions.
pub fn disjoin(args: Vec<Expr>) -> Expr {
    trace!(count = args.len(), "disjoin");
    let mut branches = Vec::new();
    for arg in args {
        match arg {
            Expr::Or(inner) => branches.extend(inner),
            branch => branches.push(branch),
        }
    }

    if branches.len() == 1 {
        branches.remove(0)
    } else {
        Expr::Or(branches)
    }
}

/// Rebuilds a predicate through [`conjoin`] and [`disjoin`], bringing it into disjunctive normal
/// form. Expressions already in normal form are returned unchanged.
pub fn normalize(expr: Expr) -> Expr {
    match expr {
        Expr::And(args) => conjoin(args.into_iter().map(normalize).collect()),
        Expr::Or(args) => disjoin(args.into_iter().map(normalize).collect()),
        expr => expr,
    }
}
