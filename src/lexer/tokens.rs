//! Token definitions for the PalmTree lexer

use crate::common::Span;
use logos::Logos;
use serde::Serialize;

/// A token with its kind, span, and text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub text: String,
}

impl Token {
    /// Byte offset of the first character of this token
    pub fn offset(&self) -> usize {
        self.span.start
    }
}

/// Token kinds recognized by the lexer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Logos, Serialize)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum TokenKind {
    // Keywords
    #[token("let")]
    Let,
    #[token("mut")]
    Mut,

    // Literals
    #[regex(r"[0-9]+", priority = 2)]
    IntLit,
    #[regex(r"[0-9]+\.[0-9]*")]
    FloatLit,
    #[regex(r#""([^"\\]|\\.)*""#)]
    StringLit,

    #[regex(r"[a-zA-Z][a-zA-Z0-9]*", priority = 1)]
    Ident,

    // Operators
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("=")]
    Eq,
    #[token("|>")]
    PipeGt,
    #[token("=>")]
    FatArrow,

    // Delimiters
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,

    // Special
    Eof,
}

impl TokenKind {
    /// Check if this token is a keyword
    pub fn is_keyword(&self) -> bool {
        matches!(self, TokenKind::Let | TokenKind::Mut)
    }

    /// Check if this token is a literal
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::IntLit | TokenKind::FloatLit | TokenKind::StringLit
        )
    }

    /// Check if this token is an operator
    pub fn is_operator(&self) -> bool {
        matches!(
            self,
            TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Star
                | TokenKind::Slash
                | TokenKind::Percent
                | TokenKind::Eq
                | TokenKind::PipeGt
                | TokenKind::FatArrow
        )
    }

    /// Check if this token is a delimiter
    pub fn is_delimiter(&self) -> bool {
        matches!(
            self,
            TokenKind::LParen | TokenKind::RParen | TokenKind::Comma | TokenKind::Semi
        )
    }

    /// Get the string representation of the token
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Let => "let",
            TokenKind::Mut => "mut",
            TokenKind::IntLit => "<int>",
            TokenKind::FloatLit => "<float>",
            TokenKind::StringLit => "<string>",
            TokenKind::Ident => "<ident>",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Eq => "=",
            TokenKind::PipeGt => "|>",
            TokenKind::FatArrow => "=>",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::Comma => ",",
            TokenKind::Semi => ";",
            TokenKind::Eof => "<eof>",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
