//! Translation of syntax trees into canonical [`Expr`]s.

use crate::{
    canon::{self, fold::{fold_pos, FoldError}, IntervalError, RelationError},
    error::{kind, Error},
    expr::{BinOp, Comparison, Expr, UnaryOp, Value},
    logic::{conjoin, disjoin, negate},
    registry::Registry,
};
use hist_parser::parser::{
    ast::{Binary, BoolOp, Call, Compare, Expr as AstExpr, Literal, Set, Unary},
    token::op::{BinOpKind, BoolOpKind, CmpOpKind, UnaryOpKind},
};
use tracing::trace;

/// Where in the expression a node appears, which determines the constructs allowed there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Context {
    /// Whether single comparisons and logical operators are allowed.
    relations: bool,

    /// Whether two-operator comparison chains (intervals) are allowed.
    intervals: bool,
}

impl Context {
    /// The top of the expression, or an operand of a logical operator.
    const TOP: Self = Self { relations: true, intervals: true };

    /// Anywhere else: arithmetic operands, call arguments, set elements and comparison operands.
    const INNER: Self = Self { relations: false, intervals: false };
}

/// Returns the comparison for a syntax comparison operator, if it can be used in a relation.
fn comparison(op: CmpOpKind) -> Option<Comparison> {
    match op {
        CmpOpKind::Eq => Some(Comparison::Eq),
        CmpOpKind::NotEq => Some(Comparison::NotEq),
        CmpOpKind::Lt => Some(Comparison::Lt),
        CmpOpKind::LtEq => Some(Comparison::LtEq),
        CmpOpKind::Gt => Some(Comparison::Gt),
        CmpOpKind::GtEq => Some(Comparison::GtEq),
        CmpOpKind::In => Some(Comparison::In),
        CmpOpKind::NotIn => Some(Comparison::NotIn),
        CmpOpKind::Is | CmpOpKind::IsNot => None,
    }
}

/// Returns the binary operator for a syntax binary operator, if it can be translated.
fn bin_op(op: BinOpKind) -> Option<BinOp> {
    match op {
        BinOpKind::Add => Some(BinOp::Add),
        BinOpKind::Sub => Some(BinOp::Sub),
        BinOpKind::Mul => Some(BinOp::Mul),
        BinOpKind::Div => Some(BinOp::Div),
        BinOpKind::FloorDiv => Some(BinOp::FloorDiv),
        BinOpKind::Mod => Some(BinOp::Mod),
        BinOpKind::Pow => Some(BinOp::Pow),
        BinOpKind::BitOr => Some(BinOp::BitOr),
        BinOpKind::BitAnd => Some(BinOp::BitAnd),
        BinOpKind::BitXor => Some(BinOp::BitXor),
        BinOpKind::Shl | BinOpKind::Shr => None,
    }
}

/// Converts a failed constant evaluation into a grammar error on the node being translated.
fn fold_error(node: &AstExpr) -> impl FnOnce(FoldError) -> Error + '_ {
    move |err| Error::grammar(node, kind::ConstantFold { reason: err.to_string() })
}

/// Translates syntax trees into canonical expressions, resolving function calls through a
/// [`Registry`].
#[derive(Debug, Clone, Copy)]
pub struct Translator<'r> {
    registry: &'r Registry,
}

impl<'r> Translator<'r> {
    /// Creates a translator that resolves functions through the given registry.
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    /// Translates an expression appearing at the top of an axis or cut.
    pub fn translate(&self, node: &AstExpr) -> Result<Expr, Error> {
        self.expr(node, Context::TOP)
    }

    fn expr(&self, node: &AstExpr, ctxt: Context) -> Result<Expr, Error> {
        trace!(%node, ?ctxt, "translating");
        match node {
            AstExpr::Literal(literal) => Ok(match literal {
                Literal::Int(int) => Expr::Const(Value::Int(int.value)),
                Literal::Float(float) => Expr::Const(Value::Float(float.value)),
                Literal::Str(string) => Expr::Const(Value::Str(string.value.clone())),
                Literal::Bool(boolean) => Expr::Const(Value::Bool(boolean.value)),
                Literal::Symbol(sym) => Expr::Name(sym.name.clone()),
            }),
            AstExpr::Paren(paren) => self.expr(&paren.expr, ctxt),
            AstExpr::Set(set) => self.set(node, set),
            AstExpr::Dict(dict) if dict.entries.is_empty() => {
                Ok(Expr::Const(Value::Set(Default::default())))
            },
            AstExpr::Dict(_) => Err(Error::grammar(node, kind::UnhandledSyntax { what: "a dictionary" })),
            AstExpr::Attribute(_) => Err(Error::grammar(node, kind::UnhandledSyntax { what: "attribute access" })),
            AstExpr::Lambda(_) => Err(Error::grammar(node, kind::UnhandledSyntax { what: "a lambda" })),
            AstExpr::Call(call) => self.call(node, call),
            AstExpr::Unary(unary) => self.unary(node, unary, ctxt),
            AstExpr::Binary(binary) => self.binary(node, binary),
            AstExpr::Compare(compare) => self.compare(node, compare, ctxt),
            AstExpr::BoolOp(bool_op) => self.bool_op(node, bool_op, ctxt),
        }
    }

    /// Translates an operand of `not`, `and` or `or`, which must be a predicate.
    fn boolean_operand(&self, node: &AstExpr) -> Result<Expr, Error> {
        let expr = self.expr(node, Context::TOP)?;
        if expr.is_boolean() {
            Ok(expr)
        } else {
            Err(Error::grammar(node, kind::BooleanOperand))
        }
    }

    fn set(&self, node: &AstExpr, set: &Set) -> Result<Expr, Error> {
        let mut values = std::collections::BTreeSet::new();
        for element in &set.elements {
            match self.expr(element, Context::INNER)? {
                Expr::Const(value) if value.is_scalar() => {
                    values.insert(value);
                },
                _ => return Err(Error::grammar_with_spans(
                    node,
                    vec![set.span.clone(), element.span()],
                    kind::SetContents,
                )),
            }
        }
        Ok(Expr::Const(Value::Set(values)))
    }

    fn unary(&self, node: &AstExpr, unary: &Unary, ctxt: Context) -> Result<Expr, Error> {
        let op = match unary.op.kind {
            UnaryOpKind::Not => {
                if !ctxt.relations {
                    return Err(Error::grammar(node, kind::LogicalContext));
                }
                return Ok(negate(self.boolean_operand(&unary.operand)?));
            },
            UnaryOpKind::Pos => {
                return match self.expr(&unary.operand, Context::INNER)? {
                    Expr::Const(value) => fold_pos(&value).map(Expr::Const).map_err(fold_error(node)),
                    operand => Ok(operand),
                };
            },
            UnaryOpKind::Neg => UnaryOp::Neg,
            UnaryOpKind::Invert => UnaryOp::Invert,
        };

        let operand = self.expr(&unary.operand, Context::INNER)?;
        canon::unary(op, operand).map_err(fold_error(node))
    }

    fn binary(&self, node: &AstExpr, binary: &Binary) -> Result<Expr, Error> {
        let Some(op) = bin_op(binary.op.kind) else {
            return Err(Error::grammar_with_spans(
                node,
                vec![binary.op.span.clone()],
                kind::UnsupportedBinaryOp { op: binary.op.kind.symbol() },
            ));
        };

        let lhs = self.expr(&binary.lhs, Context::INNER)?;
        let rhs = self.expr(&binary.rhs, Context::INNER)?;
        canon::binop(op, lhs, rhs).map_err(fold_error(node))
    }

    fn compare(&self, node: &AstExpr, compare: &Compare, ctxt: Context) -> Result<Expr, Error> {
        if !ctxt.relations {
            return Err(Error::grammar(node, kind::RelationContext));
        }

        match (compare.ops.as_slice(), compare.comparators.as_slice()) {
            ([op], [right]) => {
                let Some(cmp) = comparison(op.kind) else {
                    return Err(Error::grammar(node, kind::UnsupportedComparison));
                };
                let left = self.expr(&compare.left, Context::INNER)?;
                let right = self.expr(right, Context::INNER)?;
                canon::relation(cmp, left, right).map_err(|err| match err {
                    RelationError::BothConstant => {
                        Error::grammar(node, kind::RelationConstants { both: true })
                    },
                    RelationError::NeitherConstant => {
                        Error::grammar(node, kind::RelationConstants { both: false })
                    },
                    RelationError::ConstantLeftMembership => {
                        Error::grammar(node, kind::MembershipOrientation)
                    },
                })
            },
            ([op1, op2], [middle, high]) if ctxt.intervals => {
                let (Some(cmp1), Some(cmp2)) = (comparison(op1.kind), comparison(op2.kind)) else {
                    return Err(Error::grammar(node, kind::InvalidInterval));
                };
                let a = self.expr(&compare.left, Context::INNER)?;
                let x = self.expr(middle, Context::INNER)?;
                let b = self.expr(high, Context::INNER)?;
                let bound_span = if a.is_const() { high.span() } else { compare.left.span() };

                canon::interval((cmp1, cmp2), a, x, b).map_err(|err| match err {
                    IntervalError::InvalidOps => Error::grammar(node, kind::InvalidInterval),
                    IntervalError::ConstantMiddle => Error::grammar_with_spans(
                        node,
                        vec![compare.span.clone(), middle.span()],
                        kind::ConstantIntervalMiddle,
                    ),
                    IntervalError::NonConstantBound => Error::grammar_with_spans(
                        node,
                        vec![compare.span.clone(), bound_span],
                        kind::NonConstantBound,
                    ),
                })
            },
            (ops, _) => Err(Error::grammar(node, kind::ComparisonChain { count: ops.len() })),
        }
    }

    fn bool_op(&self, node: &AstExpr, bool_op: &BoolOp, ctxt: Context) -> Result<Expr, Error> {
        if !ctxt.relations {
            return Err(Error::grammar(node, kind::LogicalContext));
        }

        let operands = bool_op.values
            .iter()
            .map(|value| self.boolean_operand(value))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(match bool_op.op {
            BoolOpKind::And => conjoin(operands),
            BoolOpKind::Or => disjoin(operands),
        })
    }

    fn call(&self, node: &AstExpr, call: &Call) -> Result<Expr, Error> {
        let path = match call.callee.as_ref() {
            AstExpr::Literal(Literal::Symbol(sym)) => vec![sym.name.as_str()],
            AstExpr::Attribute(attr) => attr.dotted_path()
                .ok_or_else(|| Error::grammar(&call.callee, kind::NotAFunctionName))?,
            callee => return Err(Error::grammar(callee, kind::NotAFunctionName)),
        };

        let fcn = match path.as_slice() {
            [name] if self.registry.is_canonical(name) => name.to_string(),
            path => match self.registry.resolve(path) {
                Some(canonical) => canonical.to_string(),
                None => {
                    let name = path.join(".");
                    let suggestions = self.registry.similar(&name);
                    return Err(Error::grammar_with_spans(
                        node,
                        vec![call.callee.span()],
                        kind::UnknownFunction { name, suggestions },
                    ));
                },
            },
        };

        let args = call.args
            .iter()
            .map(|arg| self.expr(arg, Context::INNER))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Expr::Call { fcn, args })
    }
}

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;
    use pretty_assertions::assert_eq;
    use crate::{translate, translate_with, Dim, Source};
    use super::*;

    fn expr(source: &str) -> Expr {
        match translate(Source::Text(source)) {
            Ok(Dim { expr, .. }) => expr,
            Err(err) => panic!("failed to translate `{}`: {}", source, err),
        }
    }

    fn display(source: &str) -> String {
        expr(source).to_string()
    }

    fn grammar_error(source: &str) -> Error {
        match translate(Source::Text(source)) {
            Ok(dim) => panic!("expected `{}` to fail, got {}", source, dim),
            Err(err) => {
                assert!(err.is_grammar(), "expected grammar error, got {:?}", err);
                err
            },
        }
    }

    fn message(source: &str) -> String {
        grammar_error(source).errors()[0].message()
    }

    fn int(i: i64) -> Expr {
        Expr::Const(Value::Int(i))
    }

    fn float(source: &str) -> f64 {
        match expr(source) {
            Expr::Const(Value::Float(x)) => x,
            other => panic!("expected a float constant, got {}", other),
        }
    }

    #[test]
    fn literals() {
        assert_eq!(expr("42"), int(42));
        assert_eq!(expr("0x10"), int(16));
        assert_eq!(expr("'hi'"), Expr::Const(Value::from("hi")));
        assert_eq!(expr("True"), Expr::Const(Value::Bool(true)));
        assert_eq!(expr("x"), Expr::name("x"));
        assert_eq!(expr("((x))"), Expr::name("x"));
    }

    #[test]
    fn constant_folding() {
        assert_eq!(expr("2 + 3"), int(5));
        assert_eq!(expr("2 - 3"), int(-1));
        assert_eq!(expr("2 * 3"), int(6));
        assert_eq!(expr("7 // 2"), int(3));
        assert_eq!(expr("-7 % 3"), int(2));
        assert_eq!(expr("2 ** 10"), int(1024));
        assert_eq!(expr("6 | 1"), int(7));
        assert_eq!(expr("6 & 3"), int(2));
        assert_eq!(expr("6 ^ 3"), int(5));
        assert_eq!(expr("-(2 + 3)"), int(-5));
        assert_eq!(expr("~0"), int(-1));
        assert_eq!(expr("+True"), int(1));
        assert_float_absolute_eq!(float("1 / 2"), 0.5);
        assert_float_absolute_eq!(float("2 ** -1"), 0.5);
        assert_float_absolute_eq!(float("1.5 * 2"), 3.0);
        assert_eq!(expr("'a' + 'b'"), Expr::Const(Value::from("ab")));
        assert_eq!(display("{1, 2} | {3}"), "{1, 2, 3}");
        assert_eq!(expr("True ^ True"), Expr::Const(Value::Bool(false)));
    }

    #[test]
    fn associative_flattening() {
        let expected = Expr::BinOp {
            op: BinOp::Add,
            args: vec![Expr::name("a"), Expr::name("b"), Expr::name("c")],
        };
        assert_eq!(expr("(a + b) + c"), expected);
        assert_eq!(expr("a + (b + c)"), expected);
        assert_eq!(expr("a + b + c"), expected);
        assert_eq!(display("a - (b - c)"), "a - (b - c)");
        assert_eq!(display("a * (b + c) * d"), "a * (b + c) * d");
    }

    #[test]
    fn rendering_translates_back() {
        for source in [
            "(a ** b) ** c",
            "a ** b ** c",
            "(a - b) - c",
            "a - (b - c)",
            "a / b / c // d % e",
            "-a ** 2",
            "(-a) ** 2",
            "x > 1 and (y < 2 or not z == 3)",
            "0 <= x ** 2 < 10",
        ] {
            let rendered = display(source);
            assert_eq!(expr(&rendered), expr(source), "`{}` rendered as `{}`", source, rendered);
        }
        assert_eq!(display("(a ** b) ** c"), "(a ** b) ** c");
        assert_eq!(display("a ** b ** c"), "a ** (b ** c)");
    }

    #[test]
    fn unary_cancellation() {
        assert_eq!(expr("- -x"), Expr::name("x"));
        assert_eq!(expr("~~x"), Expr::name("x"));
        assert_eq!(expr("+x"), Expr::name("x"));
        assert_eq!(display("-(a + b)"), "-(a + b)");
        assert_eq!(display("-~x"), "-(~x)");
    }

    #[test]
    fn integer_literal_forms() {
        assert_eq!(display("x > 1_000"), "x > 1000");
        assert_eq!(display("x >= -9223372036854775808"), "x >= -9223372036854775808");
        assert_eq!(expr("x >= -9223372036854775808"), expr("x >= -9223372036854775807 - 1"));
        assert_eq!(
            message("x > -9223372036854775808 - 1"),
            "cannot evaluate constant expression: numeric overflow"
        );
    }

    #[test]
    fn relation_orientation() {
        assert_eq!(expr("5 < x"), expr("x > 5"));
        assert_eq!(expr("x > 5"), Expr::Relation {
            cmp: Comparison::Gt,
            arg: Box::new(Expr::name("x")),
            constant: Value::Int(5),
        });
        assert_eq!(expr("5 == x"), expr("x == 5"));
        assert_eq!(display("x > -5"), "x > -5");
        assert_eq!(display("sqrt(x**2 + y**2) <= 2 * 3"), "sqrt((x ** 2) + (y ** 2)) <= 6");
    }

    #[test]
    fn membership() {
        assert_eq!(display("x in {3, 1, 2}"), "x in {1, 2, 3}");
        assert_eq!(display("x not in {}"), "x not in set()");
        assert_eq!(expr("x in {1, 2}"), expr("x in {2, 1, 1}"));
        assert_eq!(display("name in {'b', 'a'}"), "name in {'a', 'b'}");
    }

    #[test]
    fn intervals() {
        assert_eq!(expr("0 <= x < 10"), Expr::Interval {
            arg: Box::new(Expr::name("x")),
            low: Value::Int(0),
            high: Value::Int(10),
            low_closed: true,
        });
        assert_eq!(expr("0 < x <= 10"), Expr::Interval {
            arg: Box::new(Expr::name("x")),
            low: Value::Int(0),
            high: Value::Int(10),
            low_closed: false,
        });
        assert_eq!(expr("10 > x >= 0"), expr("0 <= x < 10"));
        assert_eq!(expr("10 >= x > 0"), expr("0 < x <= 10"));
        assert_eq!(display("-1.5 <= x + y < 2 ** 3"), "-1.5 <= x + y < 8");
    }

    #[test]
    fn negation() {
        assert_eq!(display("not x > 5"), "x <= 5");
        assert_eq!(expr("not not x > 5"), expr("x > 5"));
        assert_eq!(display("not x in {1}"), "x not in {1}");
        assert_eq!(display("not 0 <= x < 10"), "x < 0 or x >= 10");
    }

    #[test]
    fn de_morgan() {
        assert_eq!(expr("not (a > 1 and b < 2)"), expr("a <= 1 or b >= 2"));
        assert_eq!(expr("not (a > 1 or b < 2)"), expr("a <= 1 and b >= 2"));
    }

    #[test]
    fn disjunctive_normal_form() {
        assert_eq!(display("a > 1 and b > 2 and c > 3"), "a > 1 and b > 2 and c > 3");
        assert_eq!(expr("(a > 1 and b > 2) and c > 3"), expr("a > 1 and (b > 2 and c > 3)"));
        assert_eq!(
            display("(a > 1 or b > 2) and c > 3"),
            "(c > 3 and a > 1) or (c > 3 and b > 2)"
        );
        assert_eq!(display("a > 1 or (b > 2 or c > 3)"), "a > 1 or b > 2 or c > 3");
        assert_eq!(
            display("not (a > 1 or (b > 2 and c > 3))"),
            "(a <= 1 and b <= 2) or (a <= 1 and c <= 3)"
        );
    }

    #[test]
    fn calls() {
        let expected = Expr::Call { fcn: "sqrt".to_string(), args: vec![Expr::name("x")] };
        assert_eq!(expr("sqrt(x)"), expected);
        assert_eq!(expr("math.sqrt(x)"), expected);
        assert_eq!(expr("numpy.sqrt(x)"), expected);
        assert_eq!(expr("np.sqrt(x)"), expected);
        assert_eq!(expr("sqrt(4)"), Expr::Call { fcn: "sqrt".to_string(), args: vec![int(4)] });
    }

    #[test]
    fn custom_registry() {
        let registry = Registry::seeded().register("numpy.arctan2", "atan2");
        let dim = translate_with(Source::Text("np.arctan2(y, x) > 0"), &registry).unwrap();
        assert_eq!(dim.expr.to_string(), "atan2(y, x) > 0");

        let err = translate(Source::Text("np.arctan2(y, x) > 0")).unwrap_err();
        assert!(err.is_grammar());
    }

    #[test]
    fn unknown_function() {
        let err = grammar_error("sqr(x) > 1");
        assert_eq!(err.fragment(), Some("sqr(x)"));
        assert_eq!(err.errors()[0].spans, vec![0..3]);
        assert_eq!(err.to_string(), "unhandled function in expression: `sqr`: sqr(x)");

        let err = grammar_error("math.log(x)");
        assert_eq!(err.errors()[0].message(), "unhandled function in expression: `math.log`");
    }

    #[test]
    fn not_a_function_name() {
        assert_eq!(message("sqrt(x)(y)"), "not a function name");
        assert_eq!(message("(x + 1)(y)"), "not a function name");
    }

    #[test]
    fn set_contents() {
        let err = grammar_error("{x, 1}");
        assert_eq!(err.fragment(), Some("{x, 1}"));
        assert_eq!(err.errors()[0].spans, vec![0..6, 1..2]);
        assert_eq!(message("x in {1, {2}}"), "sets in expressions may not contain variable contents");
    }

    #[test]
    fn comparison_errors() {
        assert_eq!(message("a < b < c < d"), "only interval ranges are allowed to be chained");
        assert_eq!(message("x is 1"), "only comparison relations supported: '==', '!=', '<', '<=', '>', '>=', 'in', and 'not in'");
        assert_eq!(message("1 < 2"), "comparisons must relate an unknown expression to a known constant");
        assert_eq!(message("x < y"), "comparisons must relate an unknown expression to a known constant");
        assert_eq!(message("1 in x"), "membership tests must have the unknown expression on the left");
        assert_eq!(
            message("0 < x < 10"),
            "interval comparisons may be A <= x < B, A < x <= B, A > x >= B, A >= x > B, but no other combination"
        );
        assert_eq!(message("0 <= x is 10"), message("0 < x < 10"));

        let err = grammar_error("a <= x < 10");
        assert_eq!(err.errors()[0].spans, vec![0..11, 0..1]);
        let err = grammar_error("0 <= 5 < 10");
        assert_eq!(err.errors()[0].spans, vec![0..11, 5..6]);
    }

    #[test]
    fn context_errors() {
        assert_eq!(message("(x > 1) + 2"), "comparison operators are only allowed at the top of an expression");
        assert_eq!(message("sqrt(x > 1)"), "comparison operators are only allowed at the top of an expression");
        assert_eq!(message("x in {y > 1}"), "comparison operators are only allowed at the top of an expression");
        assert_eq!(message("x + (a > 1 and b > 1)"), "logical operators are only allowed at the top of an expression");
        assert_eq!(message("-(not x > 1)"), "logical operators are only allowed at the top of an expression");
        assert_eq!(message("x and y > 1"), "operands of logical operators must be comparisons");
        assert_eq!(grammar_error("x and y > 1").fragment(), Some("x"));
    }

    #[test]
    fn unsupported_syntax() {
        assert_eq!(
            message("x << 2"),
            "only binary operators supported: '+', '-', '*', '/', '//', '%', '**', '|', '&', and '^'"
        );
        assert_eq!(message("lambda x: x"), "unhandled syntax in expression");
        assert_eq!(message("{'a': 1}"), "unhandled syntax in expression");
        assert_eq!(message("x.y"), "unhandled syntax in expression");
    }

    #[test]
    fn fold_errors() {
        assert_eq!(message("x > 1 / 0"), "cannot evaluate constant expression: division by zero");
        assert_eq!(
            message("x > 'a' - 1"),
            "cannot evaluate constant expression: unsupported operand type(s) for -: 'str' and 'int'"
        );
        assert_eq!(grammar_error("x > 1 / 0").fragment(), Some("1 / 0"));
        assert_eq!(message("x > 2 ** 64"), "cannot evaluate constant expression: numeric overflow");
        assert_eq!(message("x > ~1.5"), "cannot evaluate constant expression: unsupported operand type(s) for ~: 'float'");
        assert_eq!(
            message("x == 'ab' * 2 ** 40"),
            "cannot evaluate constant expression: numeric overflow"
        );
    }

    #[test]
    fn names_left_empty() {
        let dim = translate(Source::Text("x + y > 1")).unwrap();
        assert!(dim.names.is_empty());
        assert_eq!(dim.with_names().names, vec!["x".to_string(), "y".to_string()]);
    }
}
