//! Lexer for the PalmTree language
//!
//! Scanning is generated by logos; this module turns its output into a
//! `Vec<Token>` terminated by an `Eof` token.

mod tokens;

pub use tokens::{Token, TokenKind};

use crate::common::Span;
use crate::config::UnknownChars;
use crate::diagnostics::{Error, Result};
use logos::Logos;

/// Tokenize source, rejecting characters outside the language
pub fn lex(source: &str) -> Result<Vec<Token>> {
    lex_with(source, UnknownChars::Reject)
}

/// Tokenize source with an explicit policy for unknown characters.
///
/// A failed match can swallow more than one character (an unterminated
/// string runs to the end of the input), so a skip drops exactly one
/// character and scanning resumes right after it.
pub fn lex_with(source: &str, unknown: UnknownChars) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut offset = 0;

    'scan: while offset < source.len() {
        let mut lexer = TokenKind::lexer(&source[offset..]);

        while let Some(result) = lexer.next() {
            let range = lexer.span();
            let span = Span::new(offset + range.start, offset + range.end);
            match result {
                Ok(kind) => tokens.push(Token {
                    kind,
                    span,
                    text: lexer.slice().to_string(),
                }),
                Err(()) => {
                    let ch = source[span.start..].chars().next().unwrap_or('\0');
                    let char_span = Span::new(span.start, span.start + ch.len_utf8());
                    match unknown {
                        UnknownChars::Reject => {
                            return Err(Error::UnexpectedCharacter {
                                ch,
                                span: char_span.into(),
                            });
                        }
                        UnknownChars::Skip => {
                            tracing::warn!(offset = span.start, "skipping unexpected character {:?}", ch);
                            if span.end > char_span.end {
                                offset = char_span.end;
                                continue 'scan;
                            }
                        }
                    }
                }
            }
        }
        break;
    }

    let end = source.len();
    tokens.push(Token {
        kind: TokenKind::Eof,
        span: Span::new(end, end),
        text: String::new(),
    });

    tracing::debug!("Lexed {} tokens", tokens.len());
    Ok(tokens)
}
