pub mod ast;
pub mod error;
pub mod token;

use error::{Error, kind};
use hist_error::ErrorKind;
use super::tokenizer::{tokenize_complete, Token, TokenKind};
use std::ops::Range;

/// The deepest nesting of subexpressions the parser accepts. Parenthesized expressions, prefix
/// operators and each operator of a binary chain count as one level.
pub const MAX_NESTING: usize = 64;

/// Returns from the enclosing parsing function if the given parse result is [`Ok`], or if it is
/// a fatal error. Otherwise, evaluates to the non-fatal error, so that the caller can try the
/// next alternative.
///
/// Fatal errors short-circuit the parsing process; they are raised once a construct has
/// committed to a parse and no other alternative could succeed.
#[macro_export]
macro_rules! try_parse_catch_fatal {
    ($expr:expr) => {
        match $expr {
            Ok(value) => return Ok(value),
            Err(err) if err.fatal => return Err(err),
            // ignore this error and try the next parser, or return it
            err => err,
        }
    };
}

/// A high-level parser for the language. This is the type to use to parse an arbitrary piece of
/// code into an abstract syntax tree.
#[derive(Debug, Clone)]
pub struct Parser<'source> {
    /// The tokens that this parser is currently parsing.
    tokens: Box<[Token<'source>]>,

    /// The index of the **next** token to be parsed.
    cursor: usize,

    /// How many nested subexpressions are currently being parsed.
    depth: usize,
}

impl<'source> Parser<'source> {
    /// Create a new parser for the given source.
    pub fn new(source: &'source str) -> Self {
        Self {
            tokens: tokenize_complete(source),
            cursor: 0,
            depth: 0,
        }
    }

    /// Creates an error that points at the current token, or the end of the source code if the
    /// cursor is at the end of the stream.
    pub fn error(&self, kind: impl ErrorKind + 'static) -> Error {
        Error::new(vec![self.span()], kind)
    }

    /// Creates a fatal error that points at the current token, or the end of the source code if
    /// the cursor is at the end of the stream.
    pub fn error_fatal(&self, kind: impl ErrorKind + 'static) -> Error {
        Error::new_fatal(vec![self.span()], kind)
    }

    /// Returns a span pointing at the end of the source code.
    pub fn eof_span(&self) -> Range<usize> {
        self.tokens.last().map_or(0..0, |token| token.span.end..token.span.end)
    }

    /// Returns the span of the current token, or the end of the source code if the cursor is at
    /// the end of the stream.
    pub fn span(&self) -> Range<usize> {
        self.tokens
            .get(self.cursor)
            .map_or(self.eof_span(), |token| token.span.clone())
    }

    /// Move the cursor to the previous token. This function is a no-op if the cursor is at the
    /// beginning of the stream.
    pub fn prev(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    /// Returns the next token to be parsed, then advances the cursor. Whitespace and comment
    /// tokens are skipped.
    ///
    /// Returns an EOF error if there are no more tokens.
    pub fn next_token(&mut self) -> Result<Token<'source>, Error> {
        while self.cursor < self.tokens.len() {
            let token = &self.tokens[self.cursor];
            self.cursor += 1;
            if token.is_ignorable() {
                continue;
            } else {
                // cloning is cheap: only Range<_> is cloned
                return Ok(token.clone());
            }
        }

        Err(self.error(kind::UnexpectedEof))
    }

    /// Returns the kind of the next meaningful token without moving the cursor.
    pub fn peek_kind(&self) -> Option<TokenKind> {
        self.tokens[self.cursor..]
            .iter()
            .find(|token| !token.is_ignorable())
            .map(|token| token.kind)
    }

    /// Returns true if only whitespace and comments remain in the stream.
    pub fn is_eof(&self) -> bool {
        self.peek_kind().is_none()
    }

    /// Advances the cursor past any statement separators (newlines and semicolons).
    fn skip_separators(&mut self) {
        while matches!(self.peek_kind(), Some(TokenKind::NewLine | TokenKind::Semicolon)) {
            // cannot fail; the token was just peeked
            let _ = self.next_token();
        }
    }

    /// Adds one level of nesting, which lasts until the enclosing [`Parser::scoped`] call
    /// returns. Nesting deeper than [`MAX_NESTING`] levels is a fatal error.
    pub fn deepen(&mut self) -> Result<(), Error> {
        if self.depth >= MAX_NESTING {
            return Err(self.error_fatal(kind::NestingTooDeep { max: MAX_NESTING }));
        }
        self.depth += 1;
        Ok(())
    }

    /// Runs the given function, then restores the nesting depth to what it was before the call.
    pub fn scoped<T, F>(&mut self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut Parser<'source>) -> Result<T, Error>,
    {
        let depth = self.depth;
        let result = f(self);
        self.depth = depth;
        result
    }

    /// Parses a nested subexpression with the given function, one level deeper than the current
    /// one.
    pub fn nested<T, F>(&mut self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut Parser<'source>) -> Result<T, Error>,
    {
        self.scoped(|input| {
            input.deepen()?;
            f(input)
        })
    }

    /// Speculatively parses a value from the given stream of tokens. This function can be used
    /// in the [`Parse::parse`] implementation of a type with the given [`Parser`], as it will
    /// automatically backtrack the cursor position if parsing fails.
    ///
    /// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
    /// value is returned. Otherwise, the stream is left unchanged and an error is returned.
    pub fn try_parse<T: Parse>(&mut self) -> Result<T, Error> {
        self.try_parse_with_fn(T::parse)
    }

    /// Speculatively parses a value from the given stream of tokens, using a custom parsing
    /// function to parse the value. The stream is left unchanged if parsing fails.
    pub fn try_parse_with_fn<T, F>(&mut self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut Parser<'source>) -> Result<T, Error>,
    {
        let start = self.cursor;
        match f(self) {
            Ok(value) => Ok(value),
            err => {
                self.cursor = start;
                err
            },
        }
    }

    /// Speculatively parses a value from the given stream of tokens, with a validation predicate.
    /// The value must parse successfully, **and** the predicate must return [`Ok`] for this
    /// function to return successfully.
    ///
    /// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
    /// value is returned. Otherwise, the stream is left unchanged and an error is returned.
    pub fn try_parse_then<T: Parse, F>(&mut self, predicate: F) -> Result<T, Error>
    where
        F: FnOnce(&T, &Parser) -> Result<(), Error>,
    {
        let start = self.cursor;

        // closure workaround allows us to use `?` in the closure
        let compute = || {
            let value = T::parse(self)?;
            predicate(&value, self)?;
            Ok(value)
        };

        match compute() {
            Ok(value) => Ok(value),
            err => {
                self.cursor = start;
                err
            },
        }
    }

    /// Attempts to parse a value from the given stream of tokens. All the tokens must be consumed
    /// by the parser; if not, an error is returned.
    pub fn try_parse_full<T: Parse>(&mut self) -> Result<T, Error> {
        let value = T::parse(self)?;
        if self.is_eof() {
            Ok(value)
        } else {
            Err(self.leftover_error())
        }
    }

    /// Creates an error pointing at the first leftover token after a complete parse. A stray
    /// closing parenthesis gets its own error.
    fn leftover_error(&mut self) -> Error {
        match self.next_token() {
            Ok(token) if token.kind == TokenKind::CloseParen => {
                Error::new(vec![token.span], kind::UnclosedParenthesis { opening: false })
            },
            Ok(token) => Error::new(vec![token.span], kind::ExpectedEof),
            Err(err) => err,
        }
    }

    /// Attempts to parse zero or more values from the given stream of tokens, each separated by
    /// newlines or semicolons. All the tokens must be consumed by the parser; if not, an error is
    /// returned.
    pub fn try_parse_full_many<T: Parse>(&mut self) -> Result<Vec<T>, Error> {
        let mut values = Vec::new();

        loop {
            self.skip_separators();
            if self.is_eof() {
                break;
            }

            values.push(T::parse(self)?);

            match self.next_token() {
                Ok(token) if matches!(token.kind, TokenKind::NewLine | TokenKind::Semicolon) => (),
                Ok(_) => {
                    self.prev();
                    return Err(self.leftover_error());
                },
                Err(_) => break,
            }
        }

        Ok(values)
    }
}

/// Any type that can be parsed from a source of tokens.
pub trait Parse: Sized {
    /// Parses a value from the given stream of tokens, advancing the stream past the consumed
    /// tokens if parsing is successful.
    ///
    /// This function should be used by consumers of the library.
    fn parse(input: &mut Parser) -> Result<Self, Error>;
}

/// The associativity of a binary or unary operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Associativity {
    /// The binary / unary operation is left-associative.
    ///
    /// For binary operations, this means `a op b op c` is evaluated as `(a op b) op c`.
    Left,

    /// The binary / unary operation is right-associative.
    ///
    /// For binary operations, this means `a op b op c` is evaluated as `a op (b op c)`. For unary
    /// operations, this means `op op a` is evaluated as `op (op a)` (the operators appear to the
    /// left of the operand).
    Right,
}

/// The precedence of an operation, in order from lowest precedence (evaluated last) to highest
/// precedence (evaluated first).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Precedence {
    /// Any precedence.
    Any,

    /// Precedence of lambda expressions (`lambda x: ...`).
    Lambda,

    /// Precedence of logical or (`or`).
    Or,

    /// Precedence of logical and (`and`).
    And,

    /// Precedence of logical not (`not`).
    Not,

    /// Precedence of comparisons (`==`, `!=`, `<`, `<=`, `>`, `>=`, `in`, `not in`, `is`, and
    /// `is not`).
    Compare,

    /// Precedence of bitwise or (`|`).
    BitOr,

    /// Precedence of bitwise xor (`^`).
    BitXor,

    /// Precedence of bitwise and (`&`).
    BitAnd,

    /// Precedence of bitshifts (`<<` and `>>`).
    Shift,

    /// Precedence of addition (`+`) and subtraction (`-`), which separate terms.
    Term,

    /// Precedence of multiplication (`*`), division (`/` and `//`), and modulo (`%`), which
    /// separate factors.
    Factor,

    /// Precedence of the prefix operators `-`, `+` and `~`.
    Neg,

    /// Precedence of exponentiation (`**`).
    Pow,
}

impl PartialOrd for Precedence {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        let left = *self as u8;
        let right = *other as u8;
        left.partial_cmp(&right)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    use ast::{
        binary::Binary,
        bool_op::BoolOp,
        call::Call,
        compare::Compare,
        expr::Expr,
        literal::{Literal, LitFloat, LitInt, LitStr, LitSym},
        paren::Paren,
        stmt::Stmt,
        unary::Unary,
    };
    use token::op::{BinOp, BinOpKind, BoolOpKind, CmpOp, CmpOpKind, UnaryOp, UnaryOpKind};
    fn sym(name: &str, span: Range<usize>) -> Expr {
        Expr::Literal(Literal::Symbol(LitSym { name: name.to_string(), span }))
    }

    fn int(value: i64, span: Range<usize>) -> Expr {
        Expr::Literal(Literal::Int(LitInt { value, span }))
    }

    #[test]
    fn literal_int() {
        let mut parser = Parser::new("16");
        let expr = parser.try_parse_full::<Expr>().unwrap();
        assert_eq!(expr, int(16, 0..2));
    }

    #[test]
    fn literal_radix() {
        let mut parser = Parser::new("0x1F");
        let expr = parser.try_parse_full::<Expr>().unwrap();
        assert_eq!(expr, int(31, 0..4));

        let mut parser = Parser::new("0b101");
        let expr = parser.try_parse_full::<Expr>().unwrap();
        assert_eq!(expr, int(5, 0..5));
    }

    #[test]
    fn literal_float() {
        let mut parser = Parser::new("3.14");
        let expr = parser.try_parse_full::<Expr>().unwrap();
        assert_eq!(expr, Expr::Literal(Literal::Float(LitFloat { value: 3.14, span: 0..4 })));
    }

    #[test]
    fn literal_str_escapes() {
        let mut parser = Parser::new(r#"'it\'s\n'"#);
        let expr = parser.try_parse_full::<Expr>().unwrap();
        assert_eq!(expr, Expr::Literal(Literal::Str(LitStr {
            value: "it's\n".to_string(),
            span: 0..9,
        })));
    }

    #[test]
    fn integer_overflow() {
        let mut parser = Parser::new("99999999999999999999");
        let err = parser.try_parse_full::<Expr>().unwrap_err();
        assert_eq!(err.to_string(), "invalid number literal: `99999999999999999999`");

        let mut parser = Parser::new("9223372036854775808");
        let err = parser.try_parse_full::<Expr>().unwrap_err();
        assert_eq!(err.to_string(), "invalid number literal: `9223372036854775808`");
    }

    #[test]
    fn literal_digit_separators() {
        let mut parser = Parser::new("1_000_000");
        assert_eq!(parser.try_parse_full::<Expr>().unwrap(), int(1_000_000, 0..9));

        let mut parser = Parser::new("0b_1010");
        assert_eq!(parser.try_parse_full::<Expr>().unwrap(), int(10, 0..7));

        let mut parser = Parser::new("1_0.2_5");
        let expr = parser.try_parse_full::<Expr>().unwrap();
        assert_eq!(expr, Expr::Literal(Literal::Float(LitFloat { value: 10.25, span: 0..7 })));
    }

    #[test]
    fn negated_min_integer() {
        let mut parser = Parser::new("-9223372036854775808");
        assert_eq!(parser.try_parse_full::<Expr>().unwrap(), int(i64::MIN, 0..20));

        let mut parser = Parser::new("-0x8000_0000_0000_0000");
        assert_eq!(parser.try_parse_full::<Expr>().unwrap(), int(i64::MIN, 0..22));

        // `**` binds tighter, so the literal would have to stand on its own
        let mut parser = Parser::new("-9223372036854775808 ** 2");
        let err = parser.try_parse_full::<Expr>().unwrap_err();
        assert_eq!(err.to_string(), "invalid number literal: `9223372036854775808`");
    }

    #[test]
    fn binary_precedence() {
        let mut parser = Parser::new("1 + 2 * 3");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Binary(Binary {
            lhs: Box::new(int(1, 0..1)),
            op: BinOp { kind: BinOpKind::Add, span: 2..3 },
            rhs: Box::new(Expr::Binary(Binary {
                lhs: Box::new(int(2, 4..5)),
                op: BinOp { kind: BinOpKind::Mul, span: 6..7 },
                rhs: Box::new(int(3, 8..9)),
                span: 4..9,
            })),
            span: 0..9,
        }));
    }

    #[test]
    fn binary_left_associative() {
        let mut parser = Parser::new("a - b - c");
        let expr = parser.try_parse_full::<Expr>().unwrap();
        assert_eq!(expr.to_string(), "a - b - c");

        let Expr::Binary(outer) = expr else { panic!("expected binary expression") };
        assert_eq!(*outer.rhs, sym("c", 8..9));
    }

    #[test]
    fn pow_right_associative_and_binds_tighter_than_neg() {
        let mut parser = Parser::new("-2 ** 3 ** 2");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        let Expr::Unary(Unary { op, operand, .. }) = expr else { panic!("expected unary") };
        assert_eq!(op, UnaryOp { kind: UnaryOpKind::Neg, span: 0..1 });

        let Expr::Binary(pow) = *operand else { panic!("expected binary") };
        assert_eq!(*pow.lhs, int(2, 1..2));
        assert!(matches!(*pow.rhs, Expr::Binary(Binary { op: BinOp { kind: BinOpKind::Pow, .. }, .. })));
    }

    #[test]
    fn pow_with_negative_exponent() {
        let mut parser = Parser::new("2 ** -1");
        let expr = parser.try_parse_full::<Expr>().unwrap();
        assert_eq!(expr.to_string(), "2 ** -1");
    }

    #[test]
    fn comparison_chain() {
        let mut parser = Parser::new("0 <= x < 10");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Compare(Compare {
            left: Box::new(int(0, 0..1)),
            ops: vec![
                CmpOp { kind: CmpOpKind::LtEq, span: 2..4 },
                CmpOp { kind: CmpOpKind::Lt, span: 7..8 },
            ],
            comparators: vec![sym("x", 5..6), int(10, 9..11)],
            span: 0..11,
        }));
    }

    #[test]
    fn two_token_comparisons() {
        let mut parser = Parser::new("x not in {1, 2}");
        let Expr::Compare(cmp) = parser.try_parse_full::<Expr>().unwrap() else {
            panic!("expected comparison");
        };
        assert_eq!(cmp.ops, vec![CmpOp { kind: CmpOpKind::NotIn, span: 2..8 }]);

        let mut parser = Parser::new("x is not y");
        let Expr::Compare(cmp) = parser.try_parse_full::<Expr>().unwrap() else {
            panic!("expected comparison");
        };
        assert_eq!(cmp.ops[0].kind, CmpOpKind::IsNot);
    }

    #[test]
    fn bool_ops() {
        let mut parser = Parser::new("not a or b and c");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        let Expr::BoolOp(BoolOp { op, values, .. }) = expr else { panic!("expected or") };
        assert_eq!(op, BoolOpKind::Or);
        assert_eq!(values.len(), 2);
        assert!(matches!(values[0], Expr::Unary(Unary { op: UnaryOp { kind: UnaryOpKind::Not, .. }, .. })));
        assert!(matches!(&values[1], Expr::BoolOp(inner) if inner.op == BoolOpKind::And));
    }

    #[test]
    fn call_with_attribute_callee() {
        let mut parser = Parser::new("np.sqrt(x, )");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        let Expr::Call(Call { callee, args, span }) = expr else { panic!("expected call") };
        assert_eq!(callee.to_string(), "np.sqrt");
        assert_eq!(args, vec![sym("x", 8..9)]);
        assert_eq!(span, 0..12);
    }

    #[test]
    fn sets_and_dicts() {
        let mut parser = Parser::new("{}");
        assert!(matches!(parser.try_parse_full::<Expr>().unwrap(), Expr::Dict(ref dict) if dict.entries.is_empty()));

        let mut parser = Parser::new("{1, 'a'}");
        let expr = parser.try_parse_full::<Expr>().unwrap();
        assert_eq!(expr.to_string(), "{1, 'a'}");

        let mut parser = Parser::new("{1: 2}");
        assert!(matches!(parser.try_parse_full::<Expr>().unwrap(), Expr::Dict(ref dict) if dict.entries.len() == 1));
    }

    #[test]
    fn paren_kept_in_tree() {
        let mut parser = Parser::new("(x)");
        let expr = parser.try_parse_full::<Expr>().unwrap();
        assert_eq!(expr, Expr::Paren(Paren {
            expr: Box::new(sym("x", 1..2)),
            span: 0..3,
        }));
    }

    #[test]
    fn unclosed_paren() {
        let mut parser = Parser::new("(x + 1");
        let err = parser.try_parse_full::<Expr>().unwrap_err();
        assert_eq!(err.to_string(), "unclosed parenthesis");
        assert_eq!(err.spans, vec![0..1]);
    }

    #[test]
    fn empty_paren() {
        let mut parser = Parser::new("f + ()");
        let err = parser.try_parse_full::<Expr>().unwrap_err();
        assert_eq!(err.to_string(), "missing expression inside parenthesis");
    }

    #[test]
    fn leftover_tokens() {
        let mut parser = Parser::new("x y");
        let err = parser.try_parse_full::<Expr>().unwrap_err();
        assert_eq!(err.to_string(), "expected end of file");
        assert_eq!(err.spans, vec![2..3]);
    }

    #[test]
    fn lambda_expr() {
        let mut parser = Parser::new("lambda x, y: x + y");
        let expr = parser.try_parse_full::<Expr>().unwrap();
        assert_eq!(expr.to_string(), "lambda x, y: x + y");
    }

    #[test]
    fn statements_separated_by_newlines_and_semicolons() {
        let mut parser = Parser::new("x = 1; y\n\n# comment\nreturn x\n");
        let stmts = parser.try_parse_full_many::<Stmt>().unwrap();
        assert_eq!(stmts.len(), 3);
        assert!(matches!(stmts[0], Stmt::Assign(_)));
        assert!(matches!(stmts[1], Stmt::Expr(_)));
        assert!(matches!(stmts[2], Stmt::Return(_)));
    }

    #[test]
    fn function_def_takes_remaining_statements() {
        let mut parser = Parser::new("def f(x):\n    y = x\n    return y + 1\n");
        let stmts = parser.try_parse_full_many::<Stmt>().unwrap();
        assert_eq!(stmts.len(), 1);

        let Stmt::FunctionDef(def) = &stmts[0] else { panic!("expected def") };
        assert_eq!(def.name.name, "f");
        assert_eq!(def.params.len(), 1);
        assert_eq!(def.body.len(), 2);
    }

    #[test]
    fn one_line_function_def() {
        let mut parser = Parser::new("def f(x): return x > 1");
        let stmts = parser.try_parse_full_many::<Stmt>().unwrap();
        let Stmt::FunctionDef(def) = &stmts[0] else { panic!("expected def") };
        assert_eq!(def.body.len(), 1);
        assert_eq!(def.to_string(), "def f(x): return x > 1");
    }

    fn nested_parens(depth: usize) -> String {
        format!("{}x{} > 1", "(".repeat(depth), ")".repeat(depth))
    }

    #[test]
    fn nesting_within_limit() {
        let src = nested_parens(MAX_NESTING - 1);
        let mut parser = Parser::new(&src);
        assert!(parser.try_parse_full::<Expr>().is_ok());

        // siblings do not add up
        let half = format!("{}x{}", "(".repeat(MAX_NESTING - 2), ")".repeat(MAX_NESTING - 2));
        let src = format!("{} + {} > 1", half, half);
        let mut parser = Parser::new(&src);
        assert!(parser.try_parse_full::<Expr>().is_ok());
    }

    #[test]
    fn nesting_too_deep() {
        let sources = [
            nested_parens(1000),
            format!("{}x > 1", "-".repeat(1000)),
            format!("{}x > 1", "not ".repeat(1000)),
            format!("x{} > 1", " ** x".repeat(1000)),
            format!("x{} > 1", " + x".repeat(1000)),
        ];
        for source in &sources {
            let mut parser = Parser::new(source);
            let err = parser.try_parse_full::<Expr>().unwrap_err();
            assert!(err.fatal);
            assert_eq!(err.to_string(), "expression is nested too deeply");
        }
    }

    #[test]
    fn bracketed_expression_spans_lines() {
        let mut parser = Parser::new("f(x,\n  y)");
        let stmts = parser.try_parse_full_many::<Stmt>().unwrap();
        assert_eq!(stmts.len(), 1);
    }
}
