//! Dynamic runtime values
//!
//! The tagged value type produced by the script runtime, together with the
//! capability interface the marshaling engine probes: type tests and total,
//! permissive conversion projections. Every value has a numeric projection
//! and a string projection, however degenerate (`false` -> 0, null -> "").

mod native;
mod string;

pub use native::{new_slot, CallbackHandle, Native, NativeObject, SlotRef};
pub use string::{DynString, StringRepr};

use crate::error::InteropResult;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A host closure a script value can point at
pub type ClosureFn = dyn Fn(&[Value]) -> InteropResult<Value> + Send + Sync;

/// Shared closure reference
pub type ClosureRef = Arc<ClosureFn>;

/// A callable dynamic value
#[derive(Clone)]
pub enum Callable {
    /// A function referenced by name, possibly not yet defined
    Named(String),
    /// A first-class closure
    Closure(ClosureRef),
    /// A method reference on a named receiver
    Method { receiver: String, name: String },
}

impl Callable {
    pub fn name(&self) -> String {
        match self {
            Callable::Named(name) => name.clone(),
            Callable::Closure(_) => "{closure}".to_owned(),
            Callable::Method { receiver, name } => format!("{receiver}::{name}"),
        }
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callable({})", self.name())
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Callable::Named(a), Callable::Named(b)) => a == b,
            (Callable::Closure(a), Callable::Closure(b)) => Arc::ptr_eq(a, b),
            (
                Callable::Method { receiver, name },
                Callable::Method {
                    receiver: r2,
                    name: n2,
                },
            ) => receiver == r2 && name == n2,
            _ => false,
        }
    }
}

/// Dynamic runtime value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null/unset
    Null,
    /// Boolean
    Bool(bool),
    /// 64-bit integer
    Int(i64),
    /// 64-bit floating point
    Float(f64),
    /// String in one of three representations
    Str(DynString),
    /// Ordered array
    Array(Vec<Value>),
    /// Object with named fields
    Object(BTreeMap<String, Value>),
    /// Callable value
    Callable(Callable),
    /// Previously-unmarshaled native object
    Native(NativeObject),
}

impl Value {
    /// Build a text string value
    pub fn text(s: impl Into<String>) -> Self {
        Value::Str(DynString::text(s))
    }

    /// Build a binary string value
    pub fn binary(bytes: impl Into<Vec<u8>>) -> Self {
        Value::Str(DynString::binary(bytes))
    }

    /// Build a legacy single-byte string value
    pub fn legacy(bytes: impl Into<Vec<u8>>) -> Self {
        Value::Str(DynString::legacy(bytes))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    pub fn is_int(&self) -> bool {
        matches!(self, Value::Int(_))
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::Str(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Callable(_))
    }

    /// Arrays and objects: the value kinds scalar strategies reject
    pub fn is_composite(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Object(_))
    }

    /// True for a string whose content parses as a number
    pub fn is_numeric_string(&self) -> bool {
        match self {
            Value::Str(s) => s.is_numeric(),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&DynString> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_native(&self) -> Option<&NativeObject> {
        match self {
            Value::Native(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_callable(&self) -> Option<&Callable> {
        match self {
            Value::Callable(c) => Some(c),
            _ => None,
        }
    }

    /// Total integer projection, matching permissive script semantics
    pub fn to_long(&self) -> i64 {
        match self {
            Value::Null => 0,
            Value::Bool(b) => i64::from(*b),
            Value::Int(n) => *n,
            Value::Float(f) => *f as i64,
            Value::Str(s) => s
                .parse_long()
                .or_else(|| s.parse_float().map(|f| f as i64))
                .unwrap_or(0),
            Value::Array(_) | Value::Object(_) | Value::Callable(_) | Value::Native(_) => 0,
        }
    }

    /// Total floating-point projection
    pub fn to_float(&self) -> f64 {
        match self {
            Value::Null => 0.0,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Int(n) => *n as f64,
            Value::Float(f) => *f,
            Value::Str(s) => s.parse_float().unwrap_or(0.0),
            Value::Array(_) | Value::Object(_) | Value::Callable(_) | Value::Native(_) => 0.0,
        }
    }

    /// Total boolean projection (script truthiness)
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::Array(a) => !a.is_empty(),
            Value::Object(_) | Value::Callable(_) | Value::Native(_) => true,
        }
    }

    /// Total string projection
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(n) => n.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Str(s) => s.to_text_lossy().0,
            Value::Array(_) => "Array".to_owned(),
            Value::Object(_) => "Object".to_owned(),
            Value::Callable(c) => c.name(),
            Value::Native(obj) => obj.type_name().to_owned(),
        }
    }

    /// Type name for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Callable(_) => "callable",
            Value::Native(_) => "native",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}
