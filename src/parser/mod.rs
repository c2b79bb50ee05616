//! Parser for the PalmTree language
//!
//! A recursive descent parser with two levels of precedence climbing
//! (additive over multiplicative) that produces a [`Program`] from a token
//! stream. The pipe operator is desugared into calls here, so the evaluator
//! never sees it. The first error aborts parsing.
//!
//! Expressions are bounded: both the nesting of the parser's own recursion
//! and the height of the finished tree are capped at [`MAX_EXPR_DEPTH`], so
//! neither parsing nor evaluation can exhaust the stack.

use crate::ast::*;
use crate::common::Span;
use crate::diagnostics::{Error, Result};
use crate::lexer::{Token, TokenKind};
use id_arena::Arena;

/// Deepest expression nesting or tree height the parser accepts
pub const MAX_EXPR_DEPTH: usize = 256;

/// An expression and the height of its tree
type Node = (Expr, usize);

/// Parse a token stream into a program
pub fn parse(tokens: &[Token]) -> Result<Program> {
    let mut parser = Parser::new(tokens);
    parser.parse_program()
}

/// Parser state
struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    /// Returned once the stream is exhausted, so a stream missing its
    /// trailing `Eof` still terminates cleanly
    eof: Token,
    lambdas: Arena<Lambda>,
    /// Current `parse_node` recursion depth
    nesting: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        let end = tokens.last().map(|t| t.span.end).unwrap_or(0);
        Self {
            tokens,
            pos: 0,
            eof: Token {
                kind: TokenKind::Eof,
                span: Span::new(end, end),
                text: String::new(),
            },
            lambdas: Arena::new(),
            nesting: 0,
        }
    }

    fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    fn peek(&self) -> TokenKind {
        self.current().kind
    }

    fn peek_n(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek() == kind
    }

    fn advance(&mut self) -> &Token {
        let idx = self.pos;
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        self.tokens.get(idx).unwrap_or(&self.eof)
    }

    fn expect(&mut self, kind: TokenKind) -> Result<&Token> {
        if self.at(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(format!("`{}`", kind)))
        }
    }

    fn unexpected(&self, expected: impl Into<String>) -> Error {
        let found = self.current();
        Error::UnexpectedToken {
            expected: expected.into(),
            found: format!("`{}`", found.kind),
            span: found.span.into(),
        }
    }

    fn too_deep(span: Span) -> Error {
        Error::ExpressionTooDeep {
            limit: MAX_EXPR_DEPTH,
            span: span.into(),
        }
    }

    /// Height of a node built over children of the given heights
    fn grow(&self, child_height: usize, span: Span) -> Result<usize> {
        let height = child_height + 1;
        if height > MAX_EXPR_DEPTH {
            return Err(Self::too_deep(span));
        }
        Ok(height)
    }

    /// Token index just past the argument list when the statement starts
    /// with `name(`
    fn bare_call_end(&self) -> Option<usize> {
        if self.peek() != TokenKind::Ident || self.peek_n(1) != TokenKind::LParen {
            return None;
        }

        let mut depth = 0usize;
        for (idx, token) in self.tokens.iter().enumerate().skip(self.pos + 1) {
            match token.kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(idx + 1);
                    }
                }
                TokenKind::Eof => return None,
                _ => {}
            }
        }
        None
    }

    // ==================== PROGRAM ====================

    fn parse_program(&mut self) -> Result<Program> {
        let mut statements = Vec::new();

        while !self.at(TokenKind::Eof) {
            statements.push(self.parse_stmt()?);
        }

        tracing::debug!(
            "Parsed {} statements, {} lambdas",
            statements.len(),
            self.lambdas.len()
        );

        Ok(Program {
            statements,
            lambdas: std::mem::take(&mut self.lambdas),
        })
    }

    // ==================== STATEMENTS ====================

    fn parse_stmt(&mut self) -> Result<Stmt> {
        match self.peek() {
            TokenKind::Let => self.parse_let_stmt(),
            TokenKind::Ident if self.peek_n(1) == TokenKind::Eq => self.parse_assign_stmt(),
            _ => self.parse_expr_stmt(),
        }
    }

    fn parse_let_stmt(&mut self) -> Result<Stmt> {
        let start = self.expect(TokenKind::Let)?.span;
        let name = self.expect(TokenKind::Ident)?.text.clone();

        let mutable = if self.at(TokenKind::Mut) {
            self.advance();
            true
        } else {
            false
        };

        let init = if self.at(TokenKind::Eq) {
            self.advance();
            Some(self.parse_expr()?)
        } else {
            None
        };

        let end = self.expect(TokenKind::Semi)?.span;

        Ok(Stmt::Let {
            name,
            mutable,
            init,
            span: start.to(end),
        })
    }

    fn parse_assign_stmt(&mut self) -> Result<Stmt> {
        let target = self.expect(TokenKind::Ident)?;
        let (name, start) = (target.text.clone(), target.span);
        self.expect(TokenKind::Eq)?;
        let value = self.parse_expr()?;
        let end = self.expect(TokenKind::Semi)?.span;

        Ok(Stmt::Assign {
            name,
            value,
            span: start.to(end),
        })
    }

    /// A statement that is exactly `name(args)` must be terminated; any
    /// other expression statement, pipes included, may omit the `;`.
    fn parse_expr_stmt(&mut self) -> Result<Stmt> {
        let call_end = self.bare_call_end();
        let expr = self.parse_expr()?;

        if call_end == Some(self.pos) {
            self.expect(TokenKind::Semi)?;
        } else if self.at(TokenKind::Semi) {
            self.advance();
        }

        Ok(Stmt::Expr(expr))
    }

    // ==================== EXPRESSIONS ====================

    fn parse_expr(&mut self) -> Result<Expr> {
        self.parse_node().map(|(expr, _)| expr)
    }

    fn parse_node(&mut self) -> Result<Node> {
        if self.nesting >= MAX_EXPR_DEPTH {
            return Err(Self::too_deep(self.current().span));
        }

        self.nesting += 1;
        let node = if self.at_lambda() {
            self.parse_lambda()
        } else {
            self.parse_pipe()
        };
        self.nesting -= 1;
        node
    }

    /// `(` opens a lambda when an identifier is followed by `,` right inside
    /// the parentheses, or when an identifier list is closed by `) =>`.
    fn at_lambda(&self) -> bool {
        if !self.at(TokenKind::LParen) {
            return false;
        }
        if self.peek_n(1) == TokenKind::Ident && self.peek_n(2) == TokenKind::Comma {
            return true;
        }

        let mut n = 1;
        if self.peek_n(n) == TokenKind::Ident {
            n += 1;
            while self.peek_n(n) == TokenKind::Comma && self.peek_n(n + 1) == TokenKind::Ident {
                n += 2;
            }
        }
        self.peek_n(n) == TokenKind::RParen && self.peek_n(n + 1) == TokenKind::FatArrow
    }

    /// A lambda is a leaf of the tree it appears in; its body is a tree of
    /// its own in the arena.
    fn parse_lambda(&mut self) -> Result<Node> {
        let start = self.expect(TokenKind::LParen)?.span;

        let mut params = Vec::new();
        if !self.at(TokenKind::RParen) {
            loop {
                params.push(self.expect(TokenKind::Ident)?.text.clone());
                if self.at(TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::FatArrow)?;

        let body = self.parse_expr()?;
        let span = start.to(body.span(&self.lambdas));

        let id = self.lambdas.alloc(Lambda { params, body, span });
        Ok((Expr::Lambda(id), 1))
    }

    /// `a |> f` becomes `f(a)`; `a |> f(b, c)` becomes `f(a, b, c)`
    fn parse_pipe(&mut self) -> Result<Node> {
        let (mut left, mut height) = self.parse_additive()?;

        while self.at(TokenKind::PipeGt) {
            self.advance();
            let callee = self.expect(TokenKind::Ident)?;
            let (name, mut end) = (callee.text.clone(), callee.span);

            let start = left.span(&self.lambdas);
            let mut args = vec![left];
            if self.at(TokenKind::LParen) {
                let (rest, rest_height, close) = self.parse_call_args()?;
                args.extend(rest);
                height = height.max(rest_height);
                end = close;
            }

            let span = start.to(end);
            height = self.grow(height, span)?;
            left = Expr::Call { name, args, span };
        }

        Ok((left, height))
    }

    fn parse_additive(&mut self) -> Result<Node> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.peek() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = self.binary(op, left, right)?;
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Node> {
        let mut left = self.parse_primary()?;

        loop {
            let op = match self.peek() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Rem,
                _ => break,
            };
            self.advance();
            let right = self.parse_primary()?;
            left = self.binary(op, left, right)?;
        }

        Ok(left)
    }

    fn binary(&self, op: BinaryOp, (left, lh): Node, (right, rh): Node) -> Result<Node> {
        let span = left.span(&self.lambdas).to(right.span(&self.lambdas));
        let height = self.grow(lh.max(rh), span)?;
        let expr = Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
            span,
        };
        Ok((expr, height))
    }

    fn parse_primary(&mut self) -> Result<Node> {
        match self.peek() {
            TokenKind::IntLit => {
                let tok = self.advance();
                let (text, span) = (tok.text.clone(), tok.span);
                let value: i64 = text.parse().map_err(|_| Error::InvalidNumber {
                    text: text.clone(),
                    span: span.into(),
                })?;
                let expr = Expr::Literal {
                    value: Literal::Int(value),
                    span,
                };
                Ok((expr, 1))
            }
            TokenKind::FloatLit => {
                let tok = self.advance();
                let (text, span) = (tok.text.clone(), tok.span);
                let value: f64 = text.parse().map_err(|_| Error::InvalidNumber {
                    text: text.clone(),
                    span: span.into(),
                })?;
                let expr = Expr::Literal {
                    value: Literal::Float(value),
                    span,
                };
                Ok((expr, 1))
            }
            TokenKind::StringLit => {
                let tok = self.advance();
                let span = tok.span;
                let value = unescape(&tok.text);
                let expr = Expr::Literal {
                    value: Literal::String(value),
                    span,
                };
                Ok((expr, 1))
            }
            TokenKind::Ident => {
                let tok = self.advance();
                let (name, start) = (tok.text.clone(), tok.span);
                if self.at(TokenKind::LParen) {
                    let (args, args_height, close) = self.parse_call_args()?;
                    let span = start.to(close);
                    let height = self.grow(args_height, span)?;
                    Ok((Expr::Call { name, args, span }, height))
                } else {
                    Ok((Expr::Variable { name, span: start }, 1))
                }
            }
            TokenKind::LParen => {
                self.advance();
                let node = self.parse_node()?;
                self.expect(TokenKind::RParen)?;
                Ok(node)
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    /// `( (expr ("," expr)*)? )`, returning the tallest argument and the
    /// span of the closing paren
    fn parse_call_args(&mut self) -> Result<(Vec<Expr>, usize, Span)> {
        self.expect(TokenKind::LParen)?;

        let mut args = Vec::new();
        let mut height = 0;
        if !self.at(TokenKind::RParen) {
            loop {
                let (arg, arg_height) = self.parse_node()?;
                height = height.max(arg_height);
                args.push(arg);
                if self.at(TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }

        let close = self.expect(TokenKind::RParen)?.span;
        Ok((args, height, close))
    }
}

/// Strip the quotes from a string literal and resolve backslash escapes
fn unescape(literal: &str) -> String {
    let inner = literal
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(literal);

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
