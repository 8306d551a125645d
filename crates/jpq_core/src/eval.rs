//! Evaluator for dot-notation path expressions

use std::borrow::Cow;

use serde_json::Value;
use thiserror::Error;

use crate::ast::{CompOp, Expr, Function, Literal, LogicalOp, Path, Segment};

/// Evaluation error
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// A segment was applied to a value shape it cannot operate on
    #[error("type mismatch: cannot apply {operation} to {found}")]
    TypeMismatch {
        operation: &'static str,
        found: &'static str,
    },
    /// An index resolved outside the bounds of the sequence
    #[error("index {index} out of bounds for array of length {len}")]
    IndexOutOfRange { index: i64, len: usize },
}

impl EvalError {
    fn type_mismatch(operation: &'static str, found: &Value) -> Self {
        Self::TypeMismatch {
            operation,
            found: value_kind(found),
        }
    }
}

/// Name for a value's shape, used in error messages
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Evaluate a path against a document, producing the selected fragment
pub fn evaluate(path: &Path, root: &Value) -> Result<Value, EvalError> {
    let mut current = Cow::Borrowed(root);

    for segment in &path.segments {
        current = apply_segment(current, segment)?;
    }

    Ok(current.into_owned())
}

/// The walk borrows from the document until a projection or filter has
/// to build a new value
fn apply_segment<'a>(
    current: Cow<'a, Value>,
    segment: &Segment,
) -> Result<Cow<'a, Value>, EvalError> {
    match segment {
        Segment::Field(name) => apply_field(current, name),
        Segment::Index(index) => apply_index(current, *index),
        Segment::Wildcard => apply_wildcard(current),
        Segment::Predicate(expr) => apply_predicate(current, expr),
        Segment::Function(function) => apply_function(current, *function),
    }
}

fn apply_field<'a>(current: Cow<'a, Value>, name: &str) -> Result<Cow<'a, Value>, EvalError> {
    match current {
        Cow::Borrowed(Value::Object(map)) => Ok(match map.get(name) {
            Some(value) => Cow::Borrowed(value),
            None => Cow::Owned(Value::Null),
        }),
        Cow::Owned(Value::Object(mut map)) => {
            Ok(Cow::Owned(map.remove(name).unwrap_or(Value::Null)))
        }
        other => field_value(other.as_ref(), name).map(Cow::Owned),
    }
}

/// The field rule: mapping lookup with a soft miss, element-wise
/// projection over sequences (recursing into nested sequences),
/// forgiving null
fn field_value(value: &Value, name: &str) -> Result<Value, EvalError> {
    match value {
        Value::Object(map) => Ok(map.get(name).cloned().unwrap_or(Value::Null)),
        Value::Array(items) => items
            .iter()
            .map(|item| field_value(item, name))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Value::Null => Ok(Value::Null),
        other => Err(EvalError::type_mismatch("field access", other)),
    }
}

fn apply_index<'a>(current: Cow<'a, Value>, index: i64) -> Result<Cow<'a, Value>, EvalError> {
    match current {
        Cow::Borrowed(Value::Array(items)) => {
            let at = resolve_index(index, items.len())?;
            match items.get(at) {
                Some(value) => Ok(Cow::Borrowed(value)),
                None => Err(EvalError::IndexOutOfRange {
                    index,
                    len: items.len(),
                }),
            }
        }
        Cow::Owned(Value::Array(mut items)) => {
            let at = resolve_index(index, items.len())?;
            // order does not matter once the element is extracted
            Ok(Cow::Owned(items.swap_remove(at)))
        }
        other => Err(EvalError::type_mismatch("indexing", other.as_ref())),
    }
}

/// Resolve a possibly-negative index against a length; negative indices
/// count back from the end
fn resolve_index(index: i64, len: usize) -> Result<usize, EvalError> {
    let resolved = if index >= 0 {
        index
    } else {
        index + len as i64
    };
    if resolved >= 0 && (resolved as usize) < len {
        Ok(resolved as usize)
    } else {
        Err(EvalError::IndexOutOfRange { index, len })
    }
}

fn apply_wildcard(current: Cow<'_, Value>) -> Result<Cow<'_, Value>, EvalError> {
    match current {
        // a sequence already is all of its elements
        Cow::Borrowed(Value::Array(_)) | Cow::Owned(Value::Array(_)) => Ok(current),
        Cow::Borrowed(Value::Object(map)) => {
            Ok(Cow::Owned(Value::Array(map.values().cloned().collect())))
        }
        Cow::Owned(Value::Object(map)) => Ok(Cow::Owned(Value::Array(
            map.into_iter().map(|(_, value)| value).collect(),
        ))),
        Cow::Borrowed(Value::Null) | Cow::Owned(Value::Null) => Ok(Cow::Owned(Value::Null)),
        other => Err(EvalError::type_mismatch("wildcard", other.as_ref())),
    }
}

fn apply_predicate<'a>(current: Cow<'a, Value>, expr: &Expr) -> Result<Cow<'a, Value>, EvalError> {
    match current {
        Cow::Borrowed(Value::Array(items)) => {
            let mut kept = Vec::new();
            for item in items {
                if eval_predicate(expr, item)? {
                    kept.push(item.clone());
                }
            }
            Ok(Cow::Owned(Value::Array(kept)))
        }
        Cow::Owned(Value::Array(items)) => {
            let mut kept = Vec::new();
            for item in items {
                if eval_predicate(expr, &item)? {
                    kept.push(item);
                }
            }
            Ok(Cow::Owned(Value::Array(kept)))
        }
        // an absent upstream field yields null; filtering null stays null
        Cow::Borrowed(Value::Null) | Cow::Owned(Value::Null) => Ok(Cow::Owned(Value::Null)),
        other => Err(EvalError::type_mismatch("filtering", other.as_ref())),
    }
}

fn apply_function(
    current: Cow<'_, Value>,
    function: Function,
) -> Result<Cow<'_, Value>, EvalError> {
    match function {
        Function::Size => {
            let size = match current.as_ref() {
                Value::Array(items) => items.len(),
                Value::Object(map) => map.len(),
                // a missing collection has size zero
                Value::Null => 0,
                other => return Err(EvalError::type_mismatch("size()", other)),
            };
            Ok(Cow::Owned(Value::from(size)))
        }
    }
}

// ========== Predicate Evaluation ==========

fn eval_predicate(expr: &Expr, element: &Value) -> Result<bool, EvalError> {
    Ok(value_is_truthy(&eval_operand(expr, element)?))
}

/// Evaluate an expression against the element under test; comparisons
/// and logical operators yield booleans, everything else yields the
/// referenced value
fn eval_operand(expr: &Expr, element: &Value) -> Result<Value, EvalError> {
    match expr {
        Expr::Element => Ok(element.clone()),
        Expr::Field(chain) => {
            let Some((first, rest)) = chain.split_first() else {
                return Ok(element.clone());
            };
            let mut current = field_value(element, first)?;
            for name in rest {
                current = field_value(&current, name)?;
            }
            Ok(current)
        }
        Expr::Literal(literal) => Ok(literal_to_value(literal)),
        Expr::Comparison { left, op, right } => {
            let left = eval_operand(left, element)?;
            let right = eval_operand(right, element)?;
            Ok(Value::Bool(compare_values(&left, *op, &right)))
        }
        Expr::Logical { left, op, right } => {
            let left = value_is_truthy(&eval_operand(left, element)?);
            let result = match op {
                LogicalOp::And => left && value_is_truthy(&eval_operand(right, element)?),
                LogicalOp::Or => left || value_is_truthy(&eval_operand(right, element)?),
            };
            Ok(Value::Bool(result))
        }
        Expr::Not(inner) => {
            let inner = eval_operand(inner, element)?;
            Ok(Value::Bool(!value_is_truthy(&inner)))
        }
    }
}

fn literal_to_value(literal: &Literal) -> Value {
    match literal {
        Literal::Null => Value::Null,
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Int(n) => Value::from(*n),
        Literal::Float(f) => serde_json::Number::from_f64(*f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Literal::String(s) => Value::String(s.clone()),
    }
}

/// Truthiness of a value used as a boolean in a predicate
fn value_is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn compare_values(left: &Value, op: CompOp, right: &Value) -> bool {
    match op {
        CompOp::Eq => values_equal(left, right),
        CompOp::Ne => !values_equal(left, right),
        CompOp::Lt => values_less_than(left, right),
        CompOp::Gt => values_less_than(right, left),
        CompOp::Le => values_equal(left, right) || values_less_than(left, right),
        CompOp::Ge => values_equal(left, right) || values_less_than(right, left),
    }
}

/// Numbers compare numerically across representations; both-integer
/// pairs compare exactly, mixed pairs promote to f64. Mismatched types
/// are never equal.
fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => match (l.as_i64(), r.as_i64()) {
            (Some(li), Some(ri)) => li == ri,
            _ => l.as_f64() == r.as_f64(),
        },
        _ => left == right,
    }
}

/// Ordering is defined for number pairs and string pairs only
fn values_less_than(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => match (l.as_i64(), r.as_i64()) {
            (Some(li), Some(ri)) => li < ri,
            _ => match (l.as_f64(), r.as_f64()) {
                (Some(lf), Some(rf)) => lf < rf,
                _ => false,
            },
        },
        (Value::String(l), Value::String(r)) => l < r,
        _ => false,
    }
}
