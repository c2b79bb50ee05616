//! Runtime values for the interpreter

use std::fmt;

use crate::ast::{BinaryOp, LambdaId};
use crate::diagnostics::{Error, Result};

/// Runtime value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Result of statements and of `let` without initializer
    #[default]
    Null,
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit float
    Float(f64),
    /// String
    String(String),
    /// Boolean
    Bool(bool),
    /// Callable reference to a lambda definition
    Lambda(LambdaId),
}

impl Value {
    /// Get the type name of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Bool(_) => "bool",
            Value::Lambda(_) => "lambda",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    /// Numerically zero (`0`, `0.0` or `-0.0`)
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Int(n) => *n == 0,
            Value::Float(f) => *f == 0.0,
            _ => false,
        }
    }

    /// Try to get as integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get as float, promoting integers
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Try to get as string
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as a callable reference
    pub fn as_lambda(&self) -> Option<LambdaId> {
        match self {
            Value::Lambda(id) => Some(*id),
            _ => None,
        }
    }

    /// Significant post-decimal digits of a float value
    pub fn decimal_count(&self) -> Option<usize> {
        match self {
            Value::Float(f) => Some(decimal_count(*f)),
            _ => None,
        }
    }

    // ==================== ARITHMETIC ====================

    /// Apply a binary operator. Zero divisors are not checked here.
    pub fn apply(&self, op: BinaryOp, other: &Value) -> Result<Value> {
        match op {
            BinaryOp::Add => self.add(other),
            BinaryOp::Sub => self.sub(other),
            BinaryOp::Mul => self.mul(other),
            BinaryOp::Div => self.div(other),
            BinaryOp::Rem => self.rem(other),
        }
    }

    pub fn add(&self, other: &Value) -> Result<Value> {
        self.arith(other, BinaryOp::Add, i64::checked_add, |a, b| a + b)
    }

    pub fn sub(&self, other: &Value) -> Result<Value> {
        self.arith(other, BinaryOp::Sub, i64::checked_sub, |a, b| a - b)
    }

    pub fn mul(&self, other: &Value) -> Result<Value> {
        self.arith(other, BinaryOp::Mul, i64::checked_mul, |a, b| a * b)
    }

    /// Truncating division for two integers, float division otherwise
    pub fn div(&self, other: &Value) -> Result<Value> {
        self.arith(other, BinaryOp::Div, i64::checked_div, |a, b| a / b)
    }

    pub fn rem(&self, other: &Value) -> Result<Value> {
        self.arith(other, BinaryOp::Rem, i64::checked_rem, |a, b| a % b)
    }

    fn arith(
        &self,
        other: &Value,
        op: BinaryOp,
        int_op: fn(i64, i64) -> Option<i64>,
        float_op: fn(f64, f64) -> f64,
    ) -> Result<Value> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => {
                int_op(*a, *b)
                    .map(Value::Int)
                    .ok_or_else(|| Error::Overflow {
                        op: op.symbol().to_string(),
                        span: None,
                    })
            }
            (Value::Float(a), Value::Float(b)) => Ok(Value::Float(float_op(*a, *b))),
            (Value::Int(a), Value::Float(b)) => Ok(Value::Float(float_op(*a as f64, *b))),
            (Value::Float(a), Value::Int(b)) => Ok(Value::Float(float_op(*a, *b as f64))),
            _ => Err(self.mismatch(op.symbol(), other)),
        }
    }

    // ==================== EQUALITY ====================

    /// Numeric equality with int/float promotion
    pub fn try_eq(&self, other: &Value) -> Result<bool> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Ok(a == b),
            (Value::Float(a), Value::Float(b)) => Ok(a == b),
            (Value::Int(a), Value::Float(b)) => Ok(*a as f64 == *b),
            (Value::Float(a), Value::Int(b)) => Ok(*a == *b as f64),
            _ => Err(self.mismatch("==", other)),
        }
    }

    pub fn try_ne(&self, other: &Value) -> Result<bool> {
        self.try_eq(other)
            .map(|eq| !eq)
            .map_err(|_| self.mismatch("!=", other))
    }

    fn mismatch(&self, op: &str, other: &Value) -> Error {
        Error::TypeMismatch {
            op: op.to_string(),
            found: format!("{} and {}", self.type_name(), other.type_name()),
            span: None,
        }
    }
}

/// Places a float is rounded to before printing
pub const FLOAT_PLACES: usize = 6;

/// Render a float rounded to [`FLOAT_PLACES`] with trailing zeros (and a
/// bare trailing point) removed: `0.1 + 0.2` prints as `0.3`, `4.0` as `4`
pub fn format_float(value: f64) -> String {
    let mut repr = format!("{:.*}", FLOAT_PLACES, value);
    if repr.contains('.') {
        let kept = repr.trim_end_matches('0').trim_end_matches('.').len();
        repr.truncate(kept);
    }
    repr
}

/// Digits after the decimal point in the printed form (`4.5` → 1, `4.0` → 0)
pub fn decimal_count(value: f64) -> usize {
    match format_float(value).split_once('.') {
        Some((_, fraction)) => fraction.len(),
        None => 0,
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => f.write_str(&format_float(*n)),
            Value::String(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Lambda(id) => write!(f, "<lambda/{}>", id.index()),
        }
    }
}
