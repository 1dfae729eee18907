use crate::{
    parser::{
        ast::{expr::Expr, lambda::parse_params, literal::LitSym, paren::close_paren},
        error::{kind, Error},
        token::{Assign as AssignToken, Colon, Def, OpenParen, Return as ReturnToken},
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
    try_parse_catch_fatal,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A `return` statement, such as `return x > 5`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Return {
    /// The returned expression.
    pub value: Expr,

    /// The region of the source code that this statement was parsed from.
    pub span: Range<usize>,
}

impl Parse for Return {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let keyword = input.try_parse::<ReturnToken>()?;
        let value = input.try_parse::<Expr>().map_err(Error::into_fatal)?;
        let span = keyword.span.start..value.span().end;
        Ok(Self { value, span })
    }
}

impl std::fmt::Display for Return {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "return {}", self.value)
    }
}

/// An assignment to a single name, such as `y = x + 1`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Assign {
    /// The name being assigned to.
    pub target: LitSym,

    /// The assigned expression.
    pub value: Expr,

    /// The region of the source code that this statement was parsed from.
    pub span: Range<usize>,
}

impl Parse for Assign {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let target = input.try_parse::<LitSym>()?;
        input.try_parse::<AssignToken>()?;
        let value = input.try_parse::<Expr>().map_err(Error::into_fatal)?;
        let span = target.span.start..value.span().end;
        Ok(Self { target, value, span })
    }
}

impl std::fmt::Display for Assign {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} = {}", self.target, self.value)
    }
}

/// A function definition, such as `def cut(x): return x > 5`.
///
/// Without indentation tracking, the body of a function is every statement that follows the
/// header, up to the end of the source.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FunctionDef {
    /// The name of the function.
    pub name: LitSym,

    /// The parameters of the function.
    pub params: Vec<LitSym>,

    /// The statements in the body of the function, at least one.
    pub body: Vec<Stmt>,

    /// The region of the source code that this definition was parsed from.
    pub span: Range<usize>,
}

impl Parse for FunctionDef {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let keyword = input.try_parse::<Def>()?;

        // committed to a function definition from here on
        let header = |input: &mut Parser| -> Result<_, Error> {
            let name = input.try_parse::<LitSym>()?;
            let open_paren = input.try_parse::<OpenParen>()?;
            let params = parse_params(input)?;
            close_paren(input, open_paren.span)?;
            input.try_parse::<Colon>()?;
            Ok((name, params))
        };
        let (name, params) = header(input).map_err(Error::into_fatal)?;

        let body = input.try_parse_full_many::<Stmt>().map_err(Error::into_fatal)?;
        let Some(last) = body.last() else {
            return Err(input.error_fatal(kind::UnexpectedEof));
        };

        let span = keyword.span.start..last.span().end;
        Ok(Self { name, params, body, span })
    }
}

impl std::fmt::Display for FunctionDef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "def {}(", self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            param.fmt(f)?;
        }
        write!(f, "):")?;
        for (i, stmt) in self.body.iter().enumerate() {
            write!(f, "{}{}", if i == 0 { " " } else { "; " }, stmt)?;
        }
        Ok(())
    }
}

/// A statement: one line (or one `;`-separated part of a line) of a source.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Stmt {
    /// An expression on its own.
    Expr(Expr),

    /// A `return` statement.
    Return(Return),

    /// An assignment to a name.
    Assign(Assign),

    /// A function definition.
    FunctionDef(FunctionDef),
}

impl Stmt {
    /// Returns the span of the statement.
    pub fn span(&self) -> Range<usize> {
        match self {
            Stmt::Expr(expr) => expr.span(),
            Stmt::Return(ret) => ret.span.clone(),
            Stmt::Assign(assign) => assign.span.clone(),
            Stmt::FunctionDef(def) => def.span.clone(),
        }
    }
}

impl Parse for Stmt {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        match input.peek_kind() {
            Some(TokenKind::Def) => input.try_parse().map(Stmt::FunctionDef),
            Some(TokenKind::Return) => input.try_parse().map(Stmt::Return),
            _ => {
                let _ = try_parse_catch_fatal!(input.try_parse().map(Stmt::Assign));
                input.try_parse().map(Stmt::Expr)
            },
        }
    }
}

impl std::fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Stmt::Expr(expr) => expr.fmt(f),
            Stmt::Return(ret) => ret.fmt(f),
            Stmt::Assign(assign) => assign.fmt(f),
            Stmt::FunctionDef(def) => def.fmt(f),
        }
    }
}
