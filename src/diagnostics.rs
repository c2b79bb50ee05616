//! Diagnostic reporting with source locations
//!
//! Every phase (lex, parse, evaluate) fails with one [`Error`]. Spans are
//! kept as miette [`SourceSpan`]s so the driver can render the failure
//! against the original source.

use crate::common::Span;
use miette::{Diagnostic, NamedSource, SourceSpan};
use std::sync::Arc;
use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Source file for error reporting
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub content: Arc<str>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: Arc::from(content.into()),
        }
    }

    pub fn to_named_source(&self) -> NamedSource<String> {
        NamedSource::new(self.name.clone(), self.content.to_string())
    }

    /// Wrap an error into a report that renders against this file
    pub fn report(&self, error: Error) -> miette::Report {
        miette::Report::new(error).with_source_code(self.to_named_source())
    }
}

/// Convert our Span to miette's SourceSpan
impl From<Span> for SourceSpan {
    fn from(span: Span) -> Self {
        SourceSpan::new(span.start.into(), span.len())
    }
}

/// PalmTree diagnostic
#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum Error {
    // === Lexical Errors ===
    #[error("Unexpected character `{ch}`")]
    #[diagnostic(code(lex::unexpected_char))]
    UnexpectedCharacter {
        ch: char,
        #[label("not part of the language")]
        span: SourceSpan,
    },

    // === Parse Errors ===
    #[error("Unexpected token: expected {expected}, found {found}")]
    #[diagnostic(code(parse::unexpected_token))]
    UnexpectedToken {
        expected: String,
        found: String,
        #[label("unexpected token here")]
        span: SourceSpan,
    },

    #[error("Invalid number literal `{text}`")]
    #[diagnostic(code(parse::invalid_number))]
    InvalidNumber {
        text: String,
        #[label("does not fit in a 64-bit integer")]
        span: SourceSpan,
    },

    #[error("Expression nested deeper than {limit} levels")]
    #[diagnostic(
        code(parse::too_deep),
        help("split the expression across several `let` bindings")
    )]
    ExpressionTooDeep {
        limit: usize,
        #[label("limit reached here")]
        span: SourceSpan,
    },

    // === Runtime Errors ===
    #[error("Undefined variable `{name}`")]
    #[diagnostic(
        code(eval::undefined_var),
        help("did you mean to declare this variable with `let`?")
    )]
    UndefinedVariable {
        name: String,
        #[label("not found in this scope")]
        span: Option<SourceSpan>,
    },

    #[error("Cannot assign to undeclared variable `{name}`")]
    #[diagnostic(
        code(eval::undeclared_var),
        help("declare it first with `let {name} mut = ...;`")
    )]
    UndeclaredVariable {
        name: String,
        #[label("assigned here")]
        span: Option<SourceSpan>,
    },

    #[error("Duplicate declaration of `{name}`")]
    #[diagnostic(code(eval::duplicate_decl))]
    DuplicateDeclaration {
        name: String,
        #[label("already declared")]
        span: Option<SourceSpan>,
    },

    #[error("Cannot assign twice to immutable variable `{name}`")]
    #[diagnostic(
        code(eval::immutable_assign),
        help("declare it as mutable: `let {name} mut = ...;`")
    )]
    ImmutableAssignment {
        name: String,
        #[label("cannot assign")]
        span: Option<SourceSpan>,
    },

    #[error("Type mismatch: cannot apply `{op}` to {found}")]
    #[diagnostic(code(eval::type_mismatch))]
    TypeMismatch {
        op: String,
        found: String,
        #[label("incompatible operands")]
        span: Option<SourceSpan>,
    },

    #[error("Division by zero")]
    #[diagnostic(code(eval::division_by_zero))]
    DivisionByZero {
        #[label("right operand is zero")]
        span: Option<SourceSpan>,
    },

    #[error("Unknown function `{name}`")]
    #[diagnostic(code(eval::unknown_function))]
    UnknownFunction {
        name: String,
        #[label("no builtin or lambda with this name")]
        span: Option<SourceSpan>,
    },

    #[error("`{name}` expects {expected} argument(s), found {found}")]
    #[diagnostic(code(eval::arity_mismatch))]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
        #[label("called here")]
        span: Option<SourceSpan>,
    },

    #[error("Integer overflow in `{op}`")]
    #[diagnostic(code(eval::overflow))]
    Overflow {
        op: String,
        #[label("result does not fit in a 64-bit integer")]
        span: Option<SourceSpan>,
    },

    #[error("Call depth limit of {limit} exceeded calling `{name}`")]
    #[diagnostic(code(eval::call_depth))]
    CallDepthExceeded {
        name: String,
        limit: usize,
        #[label("too deeply nested")]
        span: Option<SourceSpan>,
    },

    #[error("Evaluation nested deeper than {limit} levels")]
    #[diagnostic(code(eval::too_deep))]
    EvaluationTooDeep {
        limit: usize,
        #[label("limit reached here")]
        span: Option<SourceSpan>,
    },
}

impl Error {
    /// Attach a location to a runtime error raised without one
    /// (by the value layer or a builtin). Existing spans are kept.
    pub fn at(mut self, location: Span) -> Self {
        let slot = match &mut self {
            Error::UnexpectedCharacter { .. }
            | Error::UnexpectedToken { .. }
            | Error::InvalidNumber { .. }
            | Error::ExpressionTooDeep { .. } => return self,
            Error::UndefinedVariable { span, .. }
            | Error::UndeclaredVariable { span, .. }
            | Error::DuplicateDeclaration { span, .. }
            | Error::ImmutableAssignment { span, .. }
            | Error::TypeMismatch { span, .. }
            | Error::DivisionByZero { span }
            | Error::UnknownFunction { span, .. }
            | Error::ArityMismatch { span, .. }
            | Error::Overflow { span, .. }
            | Error::CallDepthExceeded { span, .. }
            | Error::EvaluationTooDeep { span, .. } => span,
        };
        if slot.is_none() {
            *slot = Some(location.into());
        }
        self
    }

    /// True for errors raised while evaluating (as opposed to lexing/parsing)
    pub fn is_runtime(&self) -> bool {
        !matches!(
            self,
            Error::UnexpectedCharacter { .. }
                | Error::UnexpectedToken { .. }
                | Error::InvalidNumber { .. }
                | Error::ExpressionTooDeep { .. }
        )
    }
}
