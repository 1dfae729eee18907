pub mod token;

use logos::{Lexer, Logos};
pub use token::{Token, TokenKind};

/// Returns an iterator over the token kinds produced by the tokenizer.
pub fn tokenize(input: &str) -> Lexer<TokenKind> {
    TokenKind::lexer(input)
}

/// Returns an owned array containing all of the tokens produced by the tokenizer. This allows us
/// to backtrack in case of an error.
///
/// Newlines inside parentheses or braces are dropped, so that an expression can span multiple
/// lines when it is bracketed.
pub fn tokenize_complete(input: &str) -> Box<[Token]> {
    let mut lexer = tokenize(input);
    let mut tokens = Vec::new();
    let mut depth = 0usize;

    while let Some(result) = lexer.next() {
        // anything the lexer cannot match is handed to the parser as a stray symbol, which it
        // reports with a proper span
        let kind = result.unwrap_or(TokenKind::Symbol);

        if kind.is_opening_bracket() {
            depth += 1;
        } else if kind.is_closing_bracket() {
            depth = depth.saturating_sub(1);
        } else if kind == TokenKind::NewLine && depth > 0 {
            continue;
        }

        tokens.push(Token {
            span: lexer.span(),
            kind,
            lexeme: lexer.slice(),
        });
    }

    tokens.into_boxed_slice()
}
