//! Tree-walking interpreter for the PalmTree AST
//!
//! Evaluates a parsed [`Program`](crate::ast::Program) against a scoped
//! environment, dispatching calls to builtins or lambdas.

pub mod builtins;
pub mod env;
pub mod eval;
pub mod value;

pub use builtins::{BuiltinFn, Builtins, Console};
pub use env::{Binding, Environment};
pub use eval::{Interpreter, MAX_EVAL_DEPTH};
pub use value::Value;
