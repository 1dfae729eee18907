//! Contains the common [`ErrorKind`] trait used by all errors to display user-facing error
//! messages.

use ariadne::{Color, Report, Source};
use std::{fmt::Debug, io, ops::Range};

/// The color to use to highlight expressions.
pub const EXPR: Color = Color::RGB(52, 235, 152);

/// Represents any kind of error that can occur during some operation.
pub trait ErrorKind: Debug + Send + Sync {
    /// The one-line message describing this error, without any source context.
    fn message(&self) -> String;

    /// Builds the report for this error.
    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)>;
}

/// An error associated with regions of source code that can be highlighted.
#[derive(Debug)]
pub struct Error {
    /// The regions of the source code that this error originated from.
    pub spans: Vec<Range<usize>>,

    /// The kind of error that occurred.
    pub kind: Box<dyn ErrorKind>,
}

impl Error {
    /// Creates a new error with the given spans and kind.
    pub fn new(spans: Vec<Range<usize>>, kind: impl ErrorKind + 'static) -> Self {
        Self { spans, kind: Box::new(kind) }
    }

    /// Returns the message of this error's kind.
    pub fn message(&self) -> String {
        self.kind.message()
    }

    /// Build a report from this error kind.
    pub fn build_report<'a>(&self, src_id: &'a str) -> Report<(&'a str, Range<usize>)> {
        self.kind.build_report(src_id, &self.spans)
    }

    /// Renders the report for this error against the given source into `out`.
    pub fn write_report(&self, src_id: &str, input: &str, out: impl io::Write) -> io::Result<()> {
        self.build_report(src_id).write((src_id, Source::from(input)), out)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind.message())
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use ariadne::{Label, ReportKind};
    use super::*;

    #[derive(Debug)]
    struct UnknownName {
        name: String,
    }

    impl ErrorKind for UnknownName {
        fn message(&self) -> String {
            format!("unknown name: `{}`", self.name)
        }

        fn build_report<'a>(
            &self,
            src_id: &'a str,
            spans: &[Range<usize>],
        ) -> Report<(&'a str, Range<usize>)> {
            Report::build(ReportKind::Error, src_id, spans[0].start)
                .with_message(self.message())
                .with_label(Label::new((src_id, spans[0].clone())).with_message("this name"))
                .finish()
        }
    }

    fn render(err: &Error, input: &str) -> String {
        let mut out = Vec::new();
        err.write_report("input", input, &mut out).unwrap();
        String::from_utf8(strip_ansi_escapes::strip(out)).unwrap()
    }

    #[test]
    fn display_uses_message() {
        let err = Error::new(vec![0..3], UnknownName { name: "foo".to_string() });
        assert_eq!(err.to_string(), "unknown name: `foo`");
    }

    #[test]
    fn report_points_at_span() {
        let input = "foo + 1";
        let err = Error::new(vec![0..3], UnknownName { name: "foo".to_string() });
        let report = render(&err, input);
        assert!(report.contains("unknown name: `foo`"));
        assert!(report.contains("this name"));
        assert!(report.contains("foo + 1"));
    }
}
