use logos::Logos;
use std::ops::Range;

/// The different kinds of tokens that can be produced by the tokenizer.
#[derive(Logos, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    #[regex(r"[\n\r]+")]
    NewLine,

    #[regex(r"[ \t]+")]
    #[regex(r"\\\r?\n")]
    Whitespace,

    #[regex(r"#[^\n\r]*")]
    Comment,

    #[token(";")]
    Semicolon,

    #[token(":")]
    Colon,

    #[token(",")]
    Comma,

    #[token(".")]
    Dot,

    #[token("(")]
    OpenParen,

    #[token(")")]
    CloseParen,

    #[token("{")]
    OpenBrace,

    #[token("}")]
    CloseBrace,

    #[token("==")]
    Eq,

    #[token("!=")]
    NotEq,

    #[token("<")]
    Less,

    #[token("<=")]
    LessEq,

    #[token(">")]
    Greater,

    #[token(">=")]
    GreaterEq,

    #[token("=")]
    Assign,

    #[token("+")]
    Add,

    #[token("-")]
    Sub,

    #[token("*")]
    Mul,

    #[token("/")]
    Div,

    #[token("//")]
    FloorDiv,

    #[token("%")]
    Mod,

    #[token("**")]
    Pow,

    #[token("|")]
    BitOr,

    #[token("&")]
    BitAnd,

    #[token("^")]
    BitXor,

    #[token("~")]
    BitNot,

    #[token("<<")]
    BitLeft,

    #[token(">>")]
    BitRight,

    #[token("and")]
    And,

    #[token("or")]
    Or,

    #[token("not")]
    Not,

    #[token("in")]
    In,

    #[token("is")]
    Is,

    #[token("lambda")]
    Lambda,

    #[token("def")]
    Def,

    #[token("return")]
    Return,

    #[token("True")]
    True,

    #[token("False")]
    False,

    // digits may be grouped with single underscores, as in `1_000`
    #[regex(r"[0-9](_?[0-9])*")]
    Int,

    #[regex(r"[0-9](_?[0-9])*\.([0-9](_?[0-9])*)?([eE][+-]?[0-9](_?[0-9])*)?")]
    #[regex(r"\.[0-9](_?[0-9])*([eE][+-]?[0-9](_?[0-9])*)?")]
    #[regex(r"[0-9](_?[0-9])*[eE][+-]?[0-9](_?[0-9])*")]
    Float,

    #[regex(r"0[xX](_?[0-9a-fA-F])+")]
    Hex,

    #[regex(r"0[oO](_?[0-7])+")]
    Oct,

    #[regex(r"0[bB](_?[01])+")]
    Bin,

    #[regex(r#""([^"\\\n\r]|\\.)*""#)]
    #[regex(r#"'([^'\\\n\r]|\\.)*'"#)]
    Str,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Name,

    #[regex(r".", priority = 0)]
    Symbol,
}

impl TokenKind {
    /// Returns true if the token carries no meaning for the parser (whitespace and comments).
    ///
    /// Newlines are **not** ignorable; they separate statements.
    pub fn is_ignorable(self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Comment)
    }

    /// Returns true if the token opens a bracketed region.
    pub fn is_opening_bracket(self) -> bool {
        matches!(self, TokenKind::OpenParen | TokenKind::OpenBrace)
    }

    /// Returns true if the token closes a bracketed region.
    pub fn is_closing_bracket(self) -> bool {
        matches!(self, TokenKind::CloseParen | TokenKind::CloseBrace)
    }
}

/// A token produced by the tokenizer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'source> {
    /// The region of the source code that this token originated from.
    pub span: Range<usize>,

    /// The kind of token.
    pub kind: TokenKind,

    /// The raw lexeme that was parsed into this token.
    pub lexeme: &'source str,
}

impl Token<'_> {
    /// Returns true if the token carries no meaning for the parser.
    pub fn is_ignorable(&self) -> bool {
        self.kind.is_ignorable()
    }
}
