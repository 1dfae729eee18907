use crate::parser::{
    ast::{expr::Expr, literal::LitSym},
    error::Error,
    token::{Colon, Comma, Lambda as LambdaToken},
    Parse,
    Parser,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parses a comma-separated list of parameter names, stopping at the first token that is not a
/// name. A trailing comma is allowed.
pub(crate) fn parse_params(input: &mut Parser) -> Result<Vec<LitSym>, Error> {
    let mut params = Vec::new();
    while let Ok(param) = input.try_parse::<LitSym>() {
        params.push(param);
        if input.try_parse::<Comma>().is_err() {
            break;
        }
    }
    Ok(params)
}

/// An anonymous function, such as `lambda x, y: x + y`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Lambda {
    /// The parameters of the function.
    pub params: Vec<LitSym>,

    /// The body of the function.
    pub body: Box<Expr>,

    /// The region of the source code that this lambda was parsed from.
    pub span: Range<usize>,
}

impl Lambda {
    /// Returns the span of the lambda.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

impl Parse for Lambda {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let keyword = input.try_parse::<LambdaToken>()?;
        let params = parse_params(input)?;
        input.try_parse::<Colon>().map_err(Error::into_fatal)?;
        let body = input.try_parse::<Expr>().map_err(Error::into_fatal)?;
        let span = keyword.span.start..body.span().end;
        Ok(Self {
            params,
            body: Box::new(body),
            span,
        })
    }
}

impl std::fmt::Display for Lambda {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "lambda")?;
        for (i, param) in self.params.iter().enumerate() {
            write!(f, "{}{}", if i == 0 { " " } else { ", " }, param)?;
        }
        write!(f, ": {}", self.body)
    }
}
