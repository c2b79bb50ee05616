//! Host functions callable by name from PalmTree code

use std::fmt;

use indexmap::IndexMap;

use super::value::Value;
use crate::diagnostics::{Error, Result};

/// Signature of a builtin: evaluated arguments in, value out
pub type BuiltinFn = fn(&[Value], &mut Console) -> Result<Value>;

/// Console output sink. Every line is captured; it is also written to
/// stdout when `echo` is set.
#[derive(Debug, Clone, Default)]
pub struct Console {
    lines: Vec<String>,
    echo: bool,
}

impl Console {
    pub fn new(echo: bool) -> Self {
        Self {
            lines: Vec::new(),
            echo,
        }
    }

    /// A console that only captures
    pub fn captured() -> Self {
        Self::new(false)
    }

    pub fn write_line(&mut self, line: String) {
        if self.echo {
            println!("{}", line);
        }
        self.lines.push(line);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

/// Registry of builtin functions. Read-only during evaluation, so one
/// registry can be shared by interpreters on different threads.
#[derive(Clone, Default)]
pub struct Builtins {
    functions: IndexMap<String, BuiltinFn>,
}

impl Builtins {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// `print`, `PI`, `double`, `increment` and `decrement`
    pub fn standard() -> Self {
        let mut builtins = Self::new();
        builtins.register("print", print);
        builtins.register("PI", pi);
        builtins.register("double", double);
        builtins.register("increment", increment);
        builtins.register("decrement", decrement);
        builtins
    }

    /// Add or replace a builtin, returning the one it replaced
    pub fn register(&mut self, name: impl Into<String>, func: BuiltinFn) -> Option<BuiltinFn> {
        self.functions.insert(name.into(), func)
    }

    pub fn get(&self, name: &str) -> Option<BuiltinFn> {
        self.functions.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl fmt::Debug for Builtins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

fn check_arity(name: &str, args: &[Value], expected: usize) -> Result<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(Error::ArityMismatch {
            name: name.to_string(),
            expected,
            found: args.len(),
            span: None,
        })
    }
}

fn single_number<'v>(name: &str, args: &'v [Value]) -> Result<&'v Value> {
    check_arity(name, args, 1)?;
    let arg = &args[0];
    if arg.is_numeric() {
        Ok(arg)
    } else {
        Err(Error::TypeMismatch {
            op: name.to_string(),
            found: arg.type_name().to_string(),
            span: None,
        })
    }
}

fn print(args: &[Value], console: &mut Console) -> Result<Value> {
    let line = args
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    console.write_line(line);
    Ok(Value::Null)
}

fn pi(args: &[Value], _console: &mut Console) -> Result<Value> {
    check_arity("PI", args, 0)?;
    Ok(Value::Float(std::f64::consts::PI))
}

fn double(args: &[Value], _console: &mut Console) -> Result<Value> {
    single_number("double", args)?.mul(&Value::Int(2))
}

fn increment(args: &[Value], _console: &mut Console) -> Result<Value> {
    single_number("increment", args)?.add(&Value::Int(1))
}

fn decrement(args: &[Value], _console: &mut Console) -> Result<Value> {
    single_number("decrement", args)?.sub(&Value::Int(1))
}
