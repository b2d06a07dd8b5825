//! Dynamic value representation and typed coercion
//!
//! Every operation in this crate moves data as [`Value`], a tagged dynamic
//! value. [`ValueKind`] is the runtime type tag; coercion back to a concrete
//! Rust type is an explicit, fallible step through [`FromValue`] rather than
//! an implicit cast, so a mismatch surfaces as a typed error instead of a
//! panic.

use std::fmt;
use std::sync::Arc;

use crate::error::{ReflectError, ReflectResult};
use crate::task::TaskHandle;

/// Runtime type tag of a [`Value`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// The null/absent sentinel
    Null,
    /// Boolean
    Bool,
    /// 32-bit signed integer
    I32,
    /// 64-bit signed integer
    I64,
    /// 64-bit float
    F64,
    /// Owned string
    Str,
    /// Ordered list of values
    List,
    /// Handle to an asynchronous computation
    Task,
}

impl ValueKind {
    /// Display name used in error messages
    pub const fn name(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::I32 => "i32",
            ValueKind::I64 => "i64",
            ValueKind::F64 => "f64",
            ValueKind::Str => "string",
            ValueKind::List => "list",
            ValueKind::Task => "task",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A dynamically typed value
///
/// `Value::Null` is the null/absent sentinel used by the bulk property
/// operations. Two `Task` values are equal only if they are the same handle.
#[derive(Debug, Clone)]
pub enum Value {
    /// The null/absent sentinel
    Null,
    /// Boolean
    Bool(bool),
    /// 32-bit signed integer
    I32(i32),
    /// 64-bit signed integer
    I64(i64),
    /// 64-bit float
    F64(f64),
    /// Owned string
    Str(String),
    /// Ordered list of values
    List(Vec<Value>),
    /// Handle to an asynchronous computation
    Task(Arc<TaskHandle>),
}

impl Value {
    /// Runtime type tag of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::I32(_) => ValueKind::I32,
            Value::I64(_) => ValueKind::I64,
            Value::F64(_) => ValueKind::F64,
            Value::Str(_) => ValueKind::Str,
            Value::List(_) => ValueKind::List,
            Value::Task(_) => ValueKind::Task,
        }
    }

    /// Display name of this value's runtime type
    pub fn type_name(&self) -> &'static str {
        self.kind().name()
    }

    /// Check if this value is the null sentinel
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Extract boolean value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extract i32 value
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::I32(i) => Some(*i),
            _ => None,
        }
    }

    /// Extract i64 value
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I64(i) => Some(*i),
            _ => None,
        }
    }

    /// Extract f64 value
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::F64(f) => Some(*f),
            _ => None,
        }
    }

    /// Borrow the string value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the list elements
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow the task handle
    pub fn as_task(&self) -> Option<&Arc<TaskHandle>> {
        match self {
            Value::Task(handle) => Some(handle),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::I32(a), Value::I32(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::F64(a), Value::F64(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            // Handle identity, not state
            (Value::Task(a), Value::Task(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::I32(i) => write!(f, "{i}"),
            Value::I64(i) => write!(f, "{i}"),
            Value::F64(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Task(_) => write!(f, "<task>"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::I32(i)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::I64(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::F64(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Arc<TaskHandle>> for Value {
    fn from(handle: Arc<TaskHandle>) -> Self {
        Value::Task(handle)
    }
}

/// Coercion of a [`Value`] into a concrete Rust type.
///
/// Coercion is strict: no numeric widening, no stringification. A kind
/// mismatch yields [`ReflectError::TypeMismatch`] with an empty member slot;
/// the typed entry points fill the slot in before the error reaches the
/// caller.
pub trait FromValue: Sized {
    /// Display name of the requested type, used in mismatch errors
    const TYPE_NAME: &'static str;

    /// Perform the coercion
    fn from_value(value: Value) -> ReflectResult<Self>;
}

fn mismatch<T: FromValue>(value: &Value) -> ReflectError {
    ReflectError::TypeMismatch {
        member: String::new(),
        expected: T::TYPE_NAME,
        actual: value.type_name().to_string(),
    }
}

impl FromValue for bool {
    const TYPE_NAME: &'static str = "bool";

    fn from_value(value: Value) -> ReflectResult<Self> {
        value.as_bool().ok_or_else(|| mismatch::<Self>(&value))
    }
}

impl FromValue for i32 {
    const TYPE_NAME: &'static str = "i32";

    fn from_value(value: Value) -> ReflectResult<Self> {
        value.as_i32().ok_or_else(|| mismatch::<Self>(&value))
    }
}

impl FromValue for i64 {
    const TYPE_NAME: &'static str = "i64";

    fn from_value(value: Value) -> ReflectResult<Self> {
        value.as_i64().ok_or_else(|| mismatch::<Self>(&value))
    }
}

impl FromValue for f64 {
    const TYPE_NAME: &'static str = "f64";

    fn from_value(value: Value) -> ReflectResult<Self> {
        value.as_f64().ok_or_else(|| mismatch::<Self>(&value))
    }
}

impl FromValue for String {
    const TYPE_NAME: &'static str = "string";

    fn from_value(value: Value) -> ReflectResult<Self> {
        match value {
            Value::Str(s) => Ok(s),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl FromValue for Vec<Value> {
    const TYPE_NAME: &'static str = "list";

    fn from_value(value: Value) -> ReflectResult<Self> {
        match value {
            Value::List(items) => Ok(items),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl FromValue for Arc<TaskHandle> {
    const TYPE_NAME: &'static str = "task";

    fn from_value(value: Value) -> ReflectResult<Self> {
        match value {
            Value::Task(handle) => Ok(handle),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl FromValue for () {
    const TYPE_NAME: &'static str = "null";

    fn from_value(value: Value) -> ReflectResult<Self> {
        match value {
            Value::Null => Ok(()),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}

impl FromValue for Value {
    const TYPE_NAME: &'static str = "value";

    fn from_value(value: Value) -> ReflectResult<Self> {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::from("x").type_name(), "string");
        assert_eq!(Value::from(1i32).type_name(), "i32");
        assert_eq!(Value::from(1i64).type_name(), "i64");
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Value::Null), "null");
        assert_eq!(format!("{}", Value::Bool(true)), "true");
        assert_eq!(format!("{}", Value::I32(42)), "42");
        let list = Value::List(vec![Value::I32(1), Value::from("a")]);
        assert_eq!(format!("{list}"), "[1, a]");
    }

    #[test]
    fn test_coercion_strictness() {
        // No widening from i32 to i64
        let err = i64::from_value(Value::I32(5)).unwrap_err();
        assert_eq!(
            err,
            ReflectError::TypeMismatch {
                member: String::new(),
                expected: "i64",
                actual: "i32".to_string(),
            }
        );
        assert_eq!(i32::from_value(Value::I32(5)).unwrap(), 5);
        assert_eq!(String::from_value(Value::from("hi")).unwrap(), "hi");
    }

    #[test]
    fn test_unit_only_from_null() {
        assert!(<()>::from_value(Value::Null).is_ok());
        assert!(<()>::from_value(Value::I32(0)).is_err());
    }

    #[test]
    fn test_task_equality_is_identity() {
        let a = Arc::new(TaskHandle::new());
        let b = Arc::new(TaskHandle::new());
        assert_eq!(Value::Task(a.clone()), Value::Task(a.clone()));
        assert_ne!(Value::Task(a), Value::Task(b));
    }
}
