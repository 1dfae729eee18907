pub mod kind;

use ariadne::Report;
use hist_error::ErrorKind;
use std::ops::Range;

/// A general parsing error.
#[derive(Debug)]
pub struct Error {
    /// The regions of the source code that this error originated from.
    pub spans: Vec<Range<usize>>,

    /// The kind of error that occurred.
    pub kind: Box<dyn ErrorKind>,

    /// Whether the error is fatal. A fatal error stops the parser from backtracking and trying
    /// other alternatives.
    pub fatal: bool,
}

impl Error {
    /// Creates a new non-fatal error with the given spans and kind.
    pub fn new(spans: Vec<Range<usize>>, kind: impl ErrorKind + 'static) -> Self {
        Self { spans, kind: Box::new(kind), fatal: false }
    }

    /// Creates a new fatal error with the given spans and kind.
    pub fn new_fatal(spans: Vec<Range<usize>>, kind: impl ErrorKind + 'static) -> Self {
        Self { spans, kind: Box::new(kind), fatal: true }
    }

    /// Marks this error as fatal. Used once a construct has committed to a parse, such as after
    /// the opening parenthesis of a parenthesized expression.
    pub fn into_fatal(mut self) -> Self {
        self.fatal = true;
        self
    }

    /// Build a report from this error kind.
    pub fn build_report<'a>(&self, src_id: &'a str) -> Report<(&'a str, Range<usize>)> {
        self.kind.build_report(src_id, &self.spans)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind.message())
    }
}

impl std::error::Error for Error {}

/// Parse errors lose their fatality once parsing is over; they are plain source errors from then
/// on.
impl From<Error> for hist_error::Error {
    fn from(err: Error) -> Self {
        Self {
            spans: err.spans,
            kind: err.kind,
        }
    }
}
