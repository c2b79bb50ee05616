//! Tree-walking interpreter over the PalmTree AST

use std::sync::Arc;

use crate::ast::*;
use crate::common::Span;
use crate::config::{Config, Scoping};
use crate::diagnostics::{Error, Result};

use super::builtins::{Builtins, Console};
use super::env::Environment;
use super::value::Value;

/// Deepest nesting of `evaluate` calls, counting through lambda bodies
pub const MAX_EVAL_DEPTH: usize = 512;

/// Tree-walking interpreter
pub struct Interpreter<'p> {
    /// Program being run; owns the lambda definitions that values refer to
    program: &'p Program,
    /// Variable environment
    env: Environment,
    /// Builtin functions (by name)
    builtins: Arc<Builtins>,
    /// Captured `print` output
    console: Console,
    config: Config,
    /// Current nesting of lambda calls
    depth: usize,
    /// Current nesting of `evaluate`
    eval_depth: usize,
}

impl<'p> Interpreter<'p> {
    /// Create an interpreter with the default configuration
    pub fn new(program: &'p Program) -> Self {
        Self::with_config(program, Config::default())
    }

    pub fn with_config(program: &'p Program, config: Config) -> Self {
        Self::with_builtins(program, config, Arc::new(Builtins::standard()))
    }

    /// Create an interpreter over a shared builtin registry
    pub fn with_builtins(program: &'p Program, config: Config, builtins: Arc<Builtins>) -> Self {
        Interpreter {
            program,
            env: Environment::new(),
            builtins,
            console: Console::new(config.echo),
            config,
            depth: 0,
            eval_depth: 0,
        }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Lines printed so far
    pub fn output(&self) -> &[String] {
        self.console.lines()
    }

    pub fn into_output(self) -> Vec<String> {
        self.console.into_lines()
    }

    /// Execute every statement in order. The program itself yields null.
    pub fn run(&mut self) -> Result<Value> {
        let program = self.program;
        for stmt in &program.statements {
            self.execute(stmt)?;
        }

        tracing::debug!(
            "Executed {} statements, {} globals live",
            program.statements.len(),
            self.env.len()
        );
        Ok(Value::Null)
    }

    /// Visit a statement
    pub fn execute(&mut self, stmt: &Stmt) -> Result<Value> {
        match stmt {
            Stmt::Let {
                name,
                mutable,
                init,
                span,
            } => {
                if self.env.contains(name) {
                    return Err(Error::DuplicateDeclaration {
                        name: name.clone(),
                        span: Some((*span).into()),
                    });
                }
                let value = match init {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Null,
                };
                tracing::debug!(%name, mutable, "declare {}", value.type_name());
                self.env.define(name.clone(), value, *mutable);
            }

            Stmt::Assign {
                name,
                value: rhs,
                span,
            } => {
                match self.env.get(name) {
                    None => {
                        return Err(Error::UndeclaredVariable {
                            name: name.clone(),
                            span: Some((*span).into()),
                        });
                    }
                    Some(binding) if !binding.mutable => {
                        return Err(Error::ImmutableAssignment {
                            name: name.clone(),
                            span: Some((*span).into()),
                        });
                    }
                    Some(_) => {}
                }
                let value = self.evaluate(rhs)?;
                self.env.assign(name, value);
            }

            Stmt::Expr(expr) => {
                self.evaluate(expr)?;
            }
        }

        Ok(Value::Null)
    }

    /// Evaluate an expression
    pub fn evaluate(&mut self, expr: &Expr) -> Result<Value> {
        if self.eval_depth >= MAX_EVAL_DEPTH {
            return Err(Error::EvaluationTooDeep {
                limit: MAX_EVAL_DEPTH,
                span: Some(expr.span(&self.program.lambdas).into()),
            });
        }

        self.eval_depth += 1;
        let value = self.evaluate_node(expr);
        self.eval_depth -= 1;
        value
    }

    fn evaluate_node(&mut self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Literal { value, .. } => Ok(match value {
                Literal::Int(n) => Value::Int(*n),
                Literal::Float(f) => Value::Float(*f),
                Literal::String(s) => Value::String(s.clone()),
            }),

            Expr::Variable { name, span } => {
                self.env
                    .value(name)
                    .cloned()
                    .ok_or_else(|| Error::UndefinedVariable {
                        name: name.clone(),
                        span: Some((*span).into()),
                    })
            }

            Expr::Binary {
                op,
                left,
                right,
                span,
            } => {
                let lhs = self.evaluate(left)?;
                let rhs = self.evaluate(right)?;
                self.eval_binary(*op, &lhs, &rhs, *span)
            }

            Expr::Call { name, args, span } => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.evaluate(arg)?);
                }
                self.call_function(name, values, *span)
            }

            Expr::Lambda(id) => Ok(Value::Lambda(*id)),
        }
    }

    fn eval_binary(&self, op: BinaryOp, lhs: &Value, rhs: &Value, span: Span) -> Result<Value> {
        if matches!(op, BinaryOp::Div | BinaryOp::Rem) && rhs.is_zero() {
            return Err(Error::DivisionByZero {
                span: Some(span.into()),
            });
        }
        lhs.apply(op, rhs).map_err(|e| e.at(span))
    }

    // ==================== CALLS ====================

    /// Builtins take precedence over lambdas bound under the same name
    fn call_function(&mut self, name: &str, args: Vec<Value>, span: Span) -> Result<Value> {
        if let Some(builtin) = self.builtins.get(name) {
            tracing::debug!(name, args = args.len(), "call builtin");
            return builtin(&args, &mut self.console).map_err(|e| e.at(span));
        }

        let id = self
            .env
            .value(name)
            .and_then(Value::as_lambda)
            .ok_or_else(|| Error::UnknownFunction {
                name: name.to_string(),
                span: Some(span.into()),
            })?;

        self.call_lambda(name, id, args, span)
    }

    fn call_lambda(&mut self, name: &str, id: LambdaId, args: Vec<Value>, span: Span) -> Result<Value> {
        let program = self.program;
        let lambda = program.lambda(id);

        if lambda.params.len() != args.len() {
            return Err(Error::ArityMismatch {
                name: name.to_string(),
                expected: lambda.params.len(),
                found: args.len(),
                span: Some(span.into()),
            });
        }
        if self.depth >= self.config.max_call_depth {
            return Err(Error::CallDepthExceeded {
                name: name.to_string(),
                limit: self.config.max_call_depth,
                span: Some(span.into()),
            });
        }

        tracing::debug!(name, depth = self.depth, "call lambda");

        self.depth += 1;
        let result = match self.config.scoping {
            Scoping::Stack => self.call_scoped(lambda, args, span),
            Scoping::Flat => self.call_flat(lambda, args, span),
        };
        self.depth -= 1;

        result
    }

    /// Parameters live in a fresh scope that is popped after the body
    fn call_scoped(&mut self, lambda: &Lambda, args: Vec<Value>, span: Span) -> Result<Value> {
        self.env.push_scope();
        let result = self
            .bind_locals(lambda, args, span)
            .and_then(|()| self.evaluate(&lambda.body));
        self.env.pop_scope();
        result
    }

    fn bind_locals(&mut self, lambda: &Lambda, args: Vec<Value>, span: Span) -> Result<()> {
        for (param, arg) in lambda.params.iter().zip(args) {
            if self.env.contains_local(param) {
                return Err(duplicate(param, span));
            }
            self.env.define(param.clone(), arg, false);
        }
        Ok(())
    }

    /// Parameters are written into the globals and erased after the body.
    /// Any existing binding of a parameter name is a collision.
    fn call_flat(&mut self, lambda: &Lambda, args: Vec<Value>, span: Span) -> Result<Value> {
        let mut bound = Vec::with_capacity(args.len());
        let mut result = Ok(Value::Null);

        for (param, arg) in lambda.params.iter().zip(args) {
            if self.env.contains(param) {
                result = Err(duplicate(param, span));
                break;
            }
            self.env.define(param.clone(), arg, false);
            bound.push(param);
        }

        if result.is_ok() {
            result = self.evaluate(&lambda.body);
        }
        for param in bound {
            self.env.remove(param);
        }

        result
    }
}

fn duplicate(name: &str, span: Span) -> Error {
    Error::DuplicateDeclaration {
        name: name.to_string(),
        span: Some(span.into()),
    }
}
