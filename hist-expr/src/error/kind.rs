use ariadne::Fmt;
use hist_attrs::ErrorKind;
use hist_error::EXPR;

/// A comparison appeared somewhere other than the top of the expression or the operand of a
/// logical operator.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "comparison operators are only allowed at the top of an expression",
    labels = ["this comparison"],
    help = "comparisons cannot be used as arithmetic operands or function arguments",
)]
pub struct RelationContext;

/// `not`, `and` or `or` appeared inside an arithmetic expression.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "logical operators are only allowed at the top of an expression",
    labels = ["this logical operation"],
)]
pub struct LogicalContext;

/// An operand of `not`, `and` or `or` is not a comparison.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "operands of logical operators must be comparisons",
    labels = ["this operand"],
    help = format!("compare it to a constant, such as: {}", "x != 0".fg(EXPR)),
)]
pub struct BooleanOperand;

/// `is` or `is not` was used.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "only comparison relations supported: '==', '!=', '<', '<=', '>', '>=', 'in', and 'not in'",
    labels = ["this comparison"],
)]
pub struct UnsupportedComparison;

/// A comparison does not relate exactly one unknown expression to one constant.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "comparisons must relate an unknown expression to a known constant",
    labels = ["this comparison"],
    help = if *both {
        "both sides are constants, so the result is always the same"
    } else {
        "neither side is a constant"
    },
)]
pub struct RelationConstants {
    /// Whether both sides were constants. Otherwise, neither side was.
    pub both: bool,
}

/// A membership test has the constant on the left.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "membership tests must have the unknown expression on the left",
    labels = ["this membership test"],
    help = format!("write it as: {}", "x in {1, 2}".fg(EXPR)),
)]
pub struct MembershipOrientation;

/// A two-operator comparison chain uses a pair of operators that does not form an interval.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "interval comparisons may be A <= x < B, A < x <= B, A > x >= B, A >= x > B, but no other combination",
    labels = ["this interval"],
)]
pub struct InvalidInterval;

/// An edge of an interval is not a constant.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "interval comparisons must have known constants on the low and high edge with an unknown expression in the middle",
    labels = ["this interval", "this edge is not a constant"],
)]
pub struct NonConstantBound;

/// The middle of an interval is a constant.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "interval comparisons must have known constants on the low and high edge with an unknown expression in the middle",
    labels = ["this interval", "this is a constant"],
)]
pub struct ConstantIntervalMiddle;

/// A comparison chain has more than two operators.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "only interval ranges are allowed to be chained",
    labels = [format!("{} comparisons chained here", count)],
    help = "an interval has exactly two comparisons, such as `0 <= x < 10`",
)]
pub struct ComparisonChain {
    /// The number of comparison operators in the chain.
    pub count: usize,
}

/// A set literal contains a non-constant element.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "sets in expressions may not contain variable contents",
    labels = ["this set", "this element is not a constant"],
)]
pub struct SetContents;

/// A binary operator that cannot be translated, such as a shift.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "only binary operators supported: '+', '-', '*', '/', '//', '%', '**', '|', '&', and '^'",
    labels = [format!("`{}` is not supported", op)],
)]
pub struct UnsupportedBinaryOp {
    /// The operator symbol.
    pub op: &'static str,
}

/// A call whose callee is not a name or a dotted path of names.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "not a function name",
    labels = ["this is not a name"],
)]
pub struct NotAFunctionName;

/// A call to a function that is not in the registry.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unhandled function in expression: `{}`", self.name),
    labels = ["this function"],
    help = if self.suggestions.is_empty() {
        "see the function registry for a list of available functions".to_string()
    } else if self.suggestions.len() == 1 {
        format!("did you mean the `{}` function?", (&*self.suggestions[0]).fg(EXPR))
    } else {
        format!(
            "did you mean one of these functions? {}",
            self.suggestions
                .iter()
                .map(|s| format!("`{}`", s.fg(EXPR)))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
)]
pub struct UnknownFunction {
    /// The dotted name of the function, as written.
    pub name: String,

    /// A list of similarly named functions, if any.
    pub suggestions: Vec<String>,
}

/// A constant subexpression could not be evaluated.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("cannot evaluate constant expression: {}", reason),
    labels = ["this expression"],
)]
pub struct ConstantFold {
    /// Why evaluation failed.
    pub reason: String,
}

/// Syntax that has no meaning in an expression, such as a lambda or a dictionary.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unhandled syntax in expression",
    labels = [format!("{} cannot be used here", what)],
)]
pub struct UnhandledSyntax {
    /// A description of the syntax.
    pub what: &'static str,
}

/// The source contains no statements.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "expression is empty",
    labels = [""],
    help = "write a one-line expression, such as `x + y`",
)]
pub struct EmptySource;

/// The source contains more than one statement.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "expression must be a one-line string, one-line function, or lambda expression",
    labels = [format!("found {} statements here", count)],
)]
pub struct NotSingleExpression {
    /// The number of statements found.
    pub count: usize,
}

/// The only statement of a text source is not an expression.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "expected an expression",
    labels = [format!("this is {}", what)],
)]
pub struct NotAnExpression {
    /// A description of the statement.
    pub what: &'static str,
}

/// The body of a function is not exactly one `return` statement.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "function body must be a single `return` statement",
    labels = ["this function"],
    help = format!("write the function as: {}", "def cut(x): return x > 0".fg(EXPR)),
)]
pub struct FunctionBody;

/// A function source is not a `def` or a `lambda`.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "expected a function definition or a lambda expression",
    labels = ["this is not a function"],
)]
pub struct NotAFunction;
