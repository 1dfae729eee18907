use crate::error::{kind, Error};
use hist_parser::parser::{
    ast::{Expr as AstExpr, Stmt},
    Parser,
};

/// The source of an axis or cut expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source<'a> {
    /// A one-line expression, such as `0 <= x < 10`.
    Text(&'a str),

    /// A function returning one expression: either `def name(params): return <expr>` or
    /// `lambda params: <expr>`.
    Function(&'a str),
}

impl<'a> Source<'a> {
    /// Returns the source code.
    pub fn body(&self) -> &'a str {
        match self {
            Source::Text(body) | Source::Function(body) => body,
        }
    }

    /// Parses the source and extracts the single expression to translate.
    pub(crate) fn expression(&self) -> Result<AstExpr, Error> {
        let body = self.body();
        let mut stmts = Parser::new(body).try_parse_full_many::<Stmt>()?;

        let stmt = match stmts.len() {
            0 => return Err(Error::container(0..body.len(), kind::EmptySource)),
            1 => stmts.remove(0),
            count => {
                let span = stmts[0].span().start..stmts[count - 1].span().end;
                return Err(Error::container(span, kind::NotSingleExpression { count }));
            },
        };

        match self {
            Source::Text(_) => match stmt {
                Stmt::Expr(expr) => Ok(expr),
                stmt => {
                    let what = match stmt {
                        Stmt::Return(_) => "a `return` statement",
                        Stmt::Assign(_) => "an assignment",
                        _ => "a function definition",
                    };
                    Err(Error::container(stmt.span(), kind::NotAnExpression { what }))
                },
            },
            Source::Function(_) => match stmt {
                Stmt::FunctionDef(def) => match <[Stmt; 1]>::try_from(def.body) {
                    Ok([Stmt::Return(ret)]) => Ok(ret.value),
                    _ => Err(Error::container(def.span, kind::FunctionBody)),
                },
                Stmt::Expr(AstExpr::Lambda(lambda)) => Ok(*lambda.body),
                stmt => Err(Error::container(stmt.span(), kind::NotAFunction)),
            },
        }
    }
}
