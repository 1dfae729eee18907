pub mod kind;

use ariadne::Source;
use hist_error::ErrorKind;
use hist_parser::parser::ast::Expr as AstExpr;
use std::{fmt, io, ops::Range, slice};

/// An error that occurred while translating a source into a [`Dim`](crate::Dim).
#[derive(Debug)]
pub enum Error {
    /// The source could not be parsed.
    Syntax(Vec<hist_error::Error>),

    /// The source parsed, but some part of it has no meaning as an axis or cut expression.
    Grammar {
        /// The offending syntax, rendered back to text.
        fragment: String,

        /// The error, spanning the offending syntax.
        error: hist_error::Error,
    },

    /// The source is not a single expression, or a function returning a single expression.
    Container(hist_error::Error),
}

impl Error {
    /// Creates a grammar error spanning the given syntax node.
    pub(crate) fn grammar(node: &AstExpr, kind: impl ErrorKind + 'static) -> Self {
        Self::grammar_with_spans(node, vec![node.span()], kind)
    }

    /// Creates a grammar error for the given syntax node with custom spans, such as the node
    /// followed by one of its children.
    pub(crate) fn grammar_with_spans(
        node: &AstExpr,
        spans: Vec<Range<usize>>,
        kind: impl ErrorKind + 'static,
    ) -> Self {
        Self::Grammar {
            fragment: node.to_string(),
            error: hist_error::Error::new(spans, kind),
        }
    }

    /// Creates a container error spanning the given region.
    pub(crate) fn container(span: Range<usize>, kind: impl ErrorKind + 'static) -> Self {
        Self::Container(hist_error::Error::new(vec![span], kind))
    }

    /// Returns true if this is a [`Error::Syntax`].
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax(_))
    }

    /// Returns true if this is a [`Error::Grammar`].
    pub fn is_grammar(&self) -> bool {
        matches!(self, Self::Grammar { .. })
    }

    /// Returns true if this is a [`Error::Container`].
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Container(_))
    }

    /// Returns the offending fragment of a grammar error.
    pub fn fragment(&self) -> Option<&str> {
        match self {
            Self::Grammar { fragment, .. } => Some(fragment),
            _ => None,
        }
    }

    /// Returns the underlying source errors.
    pub fn errors(&self) -> &[hist_error::Error] {
        match self {
            Self::Syntax(errs) => errs,
            Self::Grammar { error, .. } | Self::Container(error) => slice::from_ref(error),
        }
    }

    /// Writes a report for each underlying error to `out`.
    pub fn write_reports(&self, src_id: &str, input: &str, mut out: impl io::Write) -> io::Result<()> {
        for err in self.errors() {
            err.write_report(src_id, input, &mut out)?;
        }
        Ok(())
    }

    /// Report the errors in this [`Error`] to stderr.
    ///
    /// The `ariadne` crate's [`Report`](ariadne::Report) type does not have a `Display`
    /// implementation, so we can only use its `eprint` method to print to stderr.
    pub fn report_to_stderr(&self, src_id: &str, input: &str) -> io::Result<()> {
        for err in self.errors() {
            err.build_report(src_id).eprint((src_id, Source::from(input)))?;
        }
        Ok(())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Syntax(errs) => {
                for (i, err) in errs.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            },
            Self::Grammar { fragment, error } => write!(f, "{}: {}", error, fragment),
            Self::Container(error) => write!(f, "{}", error),
        }
    }
}

impl std::error::Error for Error {}

impl From<hist_parser::parser::error::Error> for Error {
    fn from(err: hist_parser::parser::error::Error) -> Self {
        Self::Syntax(vec![err.into()])
    }
}

#[cfg(test)]
mod tests {
    use hist_parser::parser::Parser;
    use pretty_assertions::assert_eq;
    use super::*;

    fn strip(report: Vec<u8>) -> String {
        String::from_utf8(strip_ansi_escapes::strip(report)).unwrap()
    }

    #[test]
    fn grammar_error_display() {
        let node = Parser::new("{x, 1}").try_parse_full::<AstExpr>().unwrap();
        let err = Error::grammar(&node, kind::SetContents);
        assert!(err.is_grammar());
        assert_eq!(err.fragment(), Some("{x, 1}"));
        assert_eq!(
            err.to_string(),
            "sets in expressions may not contain variable contents: {x, 1}"
        );
    }

    #[test]
    fn report_highlights_fragment() {
        let input = "sqr(x) > 1";
        let node = Parser::new(input).try_parse_full::<AstExpr>().unwrap();
        let err = Error::grammar(&node, kind::UnknownFunction {
            name: "sqr".to_string(),
            suggestions: vec!["sqrt".to_string()],
        });

        let mut out = Vec::new();
        err.write_reports("input", input, &mut out).unwrap();
        let report = strip(out);
        assert!(report.contains("unhandled function in expression: `sqr`"));
        assert!(report.contains("this function"));
        assert!(report.contains("did you mean the `sqrt` function?"));
    }

    #[test]
    fn syntax_error_conversion() {
        let err = Parser::new("(x").try_parse_full::<AstExpr>().unwrap_err();
        let err = Error::from(err);
        assert!(err.is_syntax());
        assert_eq!(err.errors().len(), 1);
        assert_eq!(err.fragment(), None);
    }
}
