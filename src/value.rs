//! Loosely-typed log arguments.
//!
//! Logging operations accept slices of [`Value`] so call sites can mix text,
//! numbers, and booleans without formatting up front. The [`args!`] macro
//! builds such a slice from heterogeneous expressions.

use std::fmt;

/// A single loosely-typed log argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Text.
    Str(String),
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    Uint(u64),
    /// Floating point number.
    Float(f64),
    /// Boolean.
    Bool(bool),
    /// Arbitrary serializable payload, rendered as JSON.
    Json(serde_json::Value),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(v) => write!(f, "{v}"),
            Self::Uint(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Json(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Self::Str(v.clone())
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Uint(u64::from(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::Uint(v)
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Self::Uint(v as u64)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Self::Json(v)
    }
}

/// Concatenates arguments with no separator.
#[must_use]
pub fn concat(args: &[Value]) -> String {
    use fmt::Write;
    let mut out = String::new();
    for arg in args {
        let _ = write!(out, "{arg}");
    }
    out
}

/// Joins arguments with a single space.
#[must_use]
pub fn join(args: &[Value]) -> String {
    use fmt::Write;
    let mut out = String::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{arg}");
    }
    out
}

/// Builds a `[Value; N]` array from heterogeneous expressions.
///
/// ```
/// use bitlog::args;
///
/// let rendered = bitlog::value::concat(&args!["port=", 8080_u32]);
/// assert_eq!(rendered, "port=8080");
/// ```
#[macro_export]
macro_rules! args {
    ($($arg:expr),* $(,)?) => {
        [$($crate::Value::from($arg)),*]
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_variants() {
        assert_eq!(Value::from("x").to_string(), "x");
        assert_eq!(Value::from(-3_i64).to_string(), "-3");
        assert_eq!(Value::from(7_u64).to_string(), "7");
        assert_eq!(Value::from(1.5_f64).to_string(), "1.5");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(
            Value::from(serde_json::json!({"a": 1})).to_string(),
            r#"{"a":1}"#
        );
    }

    #[test]
    fn concat_has_no_separator() {
        let rendered = concat(&args!["a", 1, "b"]);
        assert_eq!(rendered, "a1b");
    }

    #[test]
    fn join_uses_single_space() {
        let rendered = join(&args!["a", 1, true]);
        assert_eq!(rendered, "a 1 true");
    }

    #[test]
    fn empty_args() {
        assert_eq!(concat(&[]), "");
        assert_eq!(join(&[]), "");
    }
}
