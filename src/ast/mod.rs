//! Abstract Syntax Tree for the PalmTree language
//!
//! This module defines the AST types produced by the parser. Statements and
//! expressions own their children; lambda definitions live in an arena owned
//! by the [`Program`] and are referred to by [`LambdaId`], which is what a
//! callable value carries at runtime.

mod pretty;

use crate::common::Span;
use id_arena::{Arena, Id};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Handle to a lambda definition in [`Program::lambdas`]
pub type LambdaId = Id<Lambda>;

/// Root of a parsed source file
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub statements: Vec<Stmt>,
    pub lambdas: Arena<Lambda>,
}

impl Program {
    /// Look up a lambda definition
    pub fn lambda(&self, id: LambdaId) -> &Lambda {
        &self.lambdas[id]
    }
}

impl Serialize for Program {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let lambdas: Vec<&Lambda> = self.lambdas.iter().map(|(_, lambda)| lambda).collect();
        let mut state = serializer.serialize_struct("Program", 2)?;
        state.serialize_field("statements", &self.statements)?;
        state.serialize_field("lambdas", &lambdas)?;
        state.end()
    }
}

// ==================== STATEMENTS ====================

/// Top-level statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Stmt {
    /// `let name [mut] [= init];`
    Let {
        name: String,
        mutable: bool,
        init: Option<Expr>,
        span: Span,
    },
    /// `name = value;`
    Assign { name: String, value: Expr, span: Span },
    /// Expression evaluated for its effect
    Expr(Expr),
}

// ==================== EXPRESSIONS ====================

/// Expression
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    Literal {
        value: Literal,
        span: Span,
    },
    Variable {
        name: String,
        span: Span,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },
    /// `name(args...)`; also the desugared form of `a |> name(args...)`
    Call {
        name: String,
        args: Vec<Expr>,
        span: Span,
    },
    Lambda(#[serde(serialize_with = "serialize_lambda_id")] LambdaId),
}

impl Expr {
    /// Source span of this expression. Lambdas are spanned by their
    /// definition, which lives in the arena.
    pub fn span(&self, lambdas: &Arena<Lambda>) -> Span {
        match self {
            Expr::Literal { span, .. }
            | Expr::Variable { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Call { span, .. } => *span,
            Expr::Lambda(id) => lambdas[*id].span,
        }
    }
}

fn serialize_lambda_id<S: Serializer>(id: &LambdaId, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(id.index() as u64)
}

/// Literal values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Literal {
    Int(i64),
    Float(f64),
    String(String),
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
        }
    }
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// `(params) => body`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lambda {
    pub params: Vec<String>,
    pub body: Expr,
    pub span: Span,
}
