use crate::parser::{
    ast::expr::Expr,
    error::{kind, Error},
    token::{CloseBrace, Colon, Comma, OpenBrace},
    Parser,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A set display, such as `{1, 2, 3}`. A set display always has at least one element; `{}` is an
/// empty [`Dict`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Set {
    /// The elements of the set, in source order.
    pub elements: Vec<Expr>,

    /// The region of the source code that this set was parsed from.
    pub span: Range<usize>,
}

impl Set {
    /// Returns the span of the set display.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

impl std::fmt::Display for Set {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{")?;
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            element.fmt(f)?;
        }
        write!(f, "}}")
    }
}

/// A dict display, such as `{}` or `{'a': 1}`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Dict {
    /// The key-value pairs, in source order.
    pub entries: Vec<(Expr, Expr)>,

    /// The region of the source code that this dict was parsed from.
    pub span: Range<usize>,
}

impl Dict {
    /// Returns the span of the dict display.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

impl std::fmt::Display for Dict {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", key, value)?;
        }
        write!(f, "}}")
    }
}

/// Parses the closing brace matching the opening brace at `open_span`.
fn close_brace(input: &mut Parser, open_span: Range<usize>) -> Result<CloseBrace, Error> {
    match input.try_parse::<CloseBrace>() {
        Ok(close) => Ok(close),
        Err(_) if input.is_eof() => Err(Error::new_fatal(vec![open_span], kind::UnclosedBrace)),
        Err(err) => Err(err.into_fatal()),
    }
}

/// Parses the comma and the item that follows it in a braced display. Returns [`None`] if there
/// is no comma, or if the comma is a trailing one.
fn parse_item<T>(
    input: &mut Parser,
    item: impl FnOnce(&mut Parser) -> Result<T, Error>,
) -> Result<Option<T>, Error> {
    if input.try_parse::<Comma>().is_err() {
        return Ok(None);
    }
    if input.clone().try_parse::<CloseBrace>().is_ok() {
        return Ok(None);
    }
    item(input).map(Some).map_err(Error::into_fatal)
}

/// Parses a braced display: `{}` (empty dict), a set display, or a dict display.
pub fn parse_braces(input: &mut Parser) -> Result<Expr, Error> {
    let open_brace = input.try_parse::<OpenBrace>()?;
    let open_span = open_brace.span.clone();

    if let Ok(close) = input.try_parse::<CloseBrace>() {
        return Ok(Expr::Dict(Dict {
            entries: Vec::new(),
            span: open_span.start..close.span.end,
        }));
    }

    let first = input.try_parse::<Expr>().map_err(Error::into_fatal)?;

    if input.try_parse::<Colon>().is_ok() {
        let value = input.try_parse::<Expr>().map_err(Error::into_fatal)?;
        let mut entries = vec![(first, value)];

        while let Some(entry) = parse_item(input, |input| {
            let key = input.try_parse::<Expr>()?;
            input.try_parse::<Colon>()?;
            let value = input.try_parse::<Expr>()?;
            Ok((key, value))
        })? {
            entries.push(entry);
        }

        let close = close_brace(input, open_span.clone())?;
        return Ok(Expr::Dict(Dict {
            entries,
            span: open_span.start..close.span.end,
        }));
    }

    let mut elements = vec![first];
    while let Some(element) = parse_item(input, |input| input.try_parse::<Expr>())? {
        elements.push(element);
    }

    let close = close_brace(input, open_span.clone())?;
    Ok(Expr::Set(Set {
        elements,
        span: open_span.start..close.span.end,
    }))
}
