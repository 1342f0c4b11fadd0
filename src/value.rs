//! Document model: the top-level map, shape checks and the arithmetic used by
//! [`JsonStore::math`](crate::JsonStore::math).
//!
//! Values are plain [`serde_json::Value`]s, which already is the sum type we
//! want (string, number, bool, null, array, object).

use crate::error::Error;
use serde_json::{Map, Number, Value};
use std::fmt;
use std::str::FromStr;

/// The whole persisted document: string keys to arbitrary JSON values.
pub type Document = Map<String, Value>;

/// Shape check for the array operations: `Some(seq)` if `value` is an array.
#[must_use]
pub fn into_sequence(value: Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(seq) => Some(seq),
        _ => None,
    }
}

/// Shape check for the object operations: `Some(map)` if `value` is an
/// object. `null` is never a mapping.
#[must_use]
pub fn into_mapping(value: Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

/// Drop every element equal to `needle`. Returns how many were dropped.
pub fn retain_ne(seq: &mut Vec<Value>, needle: &Value) -> usize {
    let before = seq.len();
    seq.retain(|v| v != needle);
    before - seq.len()
}

/// `true` for integer or float zero (including `-0.0`).
#[must_use]
pub fn is_zero(n: &Number) -> bool {
    if let Some(i) = n.as_i64() {
        i == 0
    } else if let Some(u) = n.as_u64() {
        u == 0
    } else {
        n.as_f64() == Some(0.0)
    }
}

/// Arithmetic operator accepted by `math`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
}

impl MathOp {
    /// The operator as written by callers.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            MathOp::Add => "+",
            MathOp::Sub => "-",
            MathOp::Mul => "*",
            MathOp::Div => "/",
        }
    }

    /// Compute `lhs <op> rhs`.
    ///
    /// Two integers stay integral as long as the checked operation succeeds
    /// (and, for division, divides evenly); everything else goes through
    /// `f64`. Returns `None` when the result is not a finite number. Zero
    /// divisors must be rejected by the caller.
    #[must_use]
    pub fn apply(self, lhs: &Number, rhs: &Number) -> Option<Number> {
        if let (Some(a), Some(b)) = (lhs.as_i64(), rhs.as_i64()) {
            let exact = match self {
                MathOp::Add => a.checked_add(b),
                MathOp::Sub => a.checked_sub(b),
                MathOp::Mul => a.checked_mul(b),
                MathOp::Div if b != 0 && a.checked_rem(b) == Some(0) => a.checked_div(b),
                MathOp::Div => None,
            };
            if let Some(n) = exact {
                return Some(Number::from(n));
            }
        }

        let a = lhs.as_f64()?;
        let b = rhs.as_f64()?;
        let out = match self {
            MathOp::Add => a + b,
            MathOp::Sub => a - b,
            MathOp::Mul => a * b,
            MathOp::Div => a / b,
        };
        Number::from_f64(out)
    }
}

impl FromStr for MathOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(MathOp::Add),
            "-" => Ok(MathOp::Sub),
            "*" => Ok(MathOp::Mul),
            "/" => Ok(MathOp::Div),
            other => Err(Error::InvalidOperator(other.to_string())),
        }
    }
}

impl fmt::Display for MathOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
