//! Typed coercion of extracted values

use serde_json::Value;
use thiserror::Error;

use crate::eval::value_kind;

/// Coercion error
#[derive(Debug, Clone, PartialEq, Error)]
#[error("cannot coerce {found} to {target}")]
pub struct CoercionError {
    pub target: &'static str,
    pub found: String,
}

impl CoercionError {
    pub(crate) fn new(target: &'static str, found: &Value) -> Self {
        Self {
            target,
            found: describe(found),
        }
    }
}

/// Value description for error messages; scalars include their rendering
fn describe(value: &Value) -> String {
    match value {
        Value::Null | Value::Array(_) | Value::Object(_) => value_kind(value).to_string(),
        Value::Bool(b) => format!("boolean {b}"),
        Value::Number(n) => format!("number {n}"),
        Value::String(s) => format!("string {s:?}"),
    }
}

/// Conversion from an extracted document value.
///
/// Numbers stored with an integer representation convert to the integer
/// types with two's-complement truncation, exactly like a primitive
/// narrowing cast; string values convert with a strict parse instead, so
/// `"300"` overflows an `i8` rather than wrapping. Floating-point
/// representations never convert to integer targets.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self, CoercionError>;
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self, CoercionError> {
        Ok(value.clone())
    }
}

/// Null coerces to `None`; everything else must coerce to the inner type
impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self, CoercionError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self, CoercionError> {
        match value {
            Value::Bool(b) => Ok(*b),
            Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(true),
            Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(false),
            other => Err(CoercionError::new("bool", other)),
        }
    }
}

impl FromValue for char {
    fn from_value(value: &Value) -> Result<Self, CoercionError> {
        let text = canonical_string(value).ok_or_else(|| CoercionError::new("char", value))?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Ok(ch),
            _ => Err(CoercionError::new("char", value)),
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self, CoercionError> {
        canonical_string(value).ok_or_else(|| CoercionError::new("String", value))
    }
}

/// Canonical text of a scalar: strings verbatim, numbers and booleans as
/// rendered; null and containers have none
fn canonical_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl FromValue for i8 {
    fn from_value(value: &Value) -> Result<Self, CoercionError> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .map(|v| v as i8)
                .ok_or_else(|| CoercionError::new("i8", value)),
            Value::String(s) => s.parse().map_err(|_| CoercionError::new("i8", value)),
            other => Err(CoercionError::new("i8", other)),
        }
    }
}

impl FromValue for i16 {
    fn from_value(value: &Value) -> Result<Self, CoercionError> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .map(|v| v as i16)
                .ok_or_else(|| CoercionError::new("i16", value)),
            Value::String(s) => s.parse().map_err(|_| CoercionError::new("i16", value)),
            other => Err(CoercionError::new("i16", other)),
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: &Value) -> Result<Self, CoercionError> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .map(|v| v as i32)
                .ok_or_else(|| CoercionError::new("i32", value)),
            Value::String(s) => s.parse().map_err(|_| CoercionError::new("i32", value)),
            other => Err(CoercionError::new("i32", other)),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Result<Self, CoercionError> {
        match value {
            Value::Number(n) => n.as_i64().ok_or_else(|| CoercionError::new("i64", value)),
            Value::String(s) => s.parse().map_err(|_| CoercionError::new("i64", value)),
            other => Err(CoercionError::new("i64", other)),
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: &Value) -> Result<Self, CoercionError> {
        match value {
            Value::Number(n) => n
                .as_f64()
                .map(|v| v as f32)
                .ok_or_else(|| CoercionError::new("f32", value)),
            Value::String(s) => s.parse().map_err(|_| CoercionError::new("f32", value)),
            other => Err(CoercionError::new("f32", other)),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self, CoercionError> {
        match value {
            Value::Number(n) => n.as_f64().ok_or_else(|| CoercionError::new("f64", value)),
            Value::String(s) => s.parse().map_err(|_| CoercionError::new("f64", value)),
            other => Err(CoercionError::new("f64", other)),
        }
    }
}
