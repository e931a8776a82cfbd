//! Native-side values produced by marshaling

use super::{Callable, Value};
use crate::env::Env;
use crate::error::{InteropError, InteropResult};
use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

/// Assignable storage location for a by-reference parameter.
/// Per-call state, discarded after dispatch.
pub type SlotRef = Rc<RefCell<Value>>;

/// Wrap a value in a fresh slot
pub fn new_slot(value: Value) -> SlotRef {
    Rc::new(RefCell::new(value))
}

/// A native object carried inside a dynamic value
///
/// Holds a previously-unmarshaled native value (a path handle, a host
/// object, ...) so scripts can pass it back into native calls unchanged.
#[derive(Clone)]
pub struct NativeObject {
    type_name: String,
    data: Arc<dyn Any + Send + Sync>,
}

impl NativeObject {
    pub fn new<T: Any + Send + Sync>(type_name: impl Into<String>, data: T) -> Self {
        NativeObject {
            type_name: type_name.into(),
            data: Arc::new(data),
        }
    }

    /// Wrap a filesystem path handle
    pub fn path(path: PathBuf) -> Self {
        Self::new("Path", path)
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn type_id(&self) -> TypeId {
        (*self.data).type_id()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.type_id() == TypeId::of::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.data.downcast_ref()
    }
}

impl fmt::Debug for NativeObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeObject({})", self.type_name)
    }
}

impl PartialEq for NativeObject {
    fn eq(&self, other: &Self) -> bool {
        // Identity comparison: two handles are equal when they wrap the
        // same native object
        Arc::ptr_eq(&self.data, &other.data)
    }
}

/// An invocable handle around a callable dynamic value
#[derive(Debug, Clone, PartialEq)]
pub struct CallbackHandle {
    target: Callable,
}

impl CallbackHandle {
    pub fn new(target: Callable) -> Self {
        CallbackHandle { target }
    }

    pub fn target(&self) -> &Callable {
        &self.target
    }

    /// Invoke the wrapped callable with dynamic arguments
    pub fn invoke(&self, env: &mut Env, args: &[Value]) -> InteropResult<Value> {
        match &self.target {
            Callable::Closure(f) => f(args),
            Callable::Named(name) => match env.lookup_function(name) {
                Some(f) => f(args),
                None => Err(InteropError::native_call(
                    name.clone(),
                    "call to undefined function",
                )),
            },
            Callable::Method { receiver, name } => Err(InteropError::native_call(
                format!("{receiver}::{name}"),
                "method callbacks require an object table",
            )),
        }
    }
}

/// A native value: the output of marshaling and the input of unmarshaling
#[derive(Debug, Clone)]
pub enum Native {
    Null,
    Bool(bool),
    Long(i64),
    Short(i16),
    Float(f64),
    Char(char),
    Text(String),
    Binary(Vec<u8>),
    Path(PathBuf),
    /// A resolved named constant
    Enum {
        class: String,
        name: String,
        ordinal: usize,
    },
    Callback(CallbackHandle),
    Object(NativeObject),
    /// Dynamic value passed through unconverted
    Value(Value),
    /// Assignable location for a by-reference parameter
    Ref(SlotRef),
}

impl Native {
    pub fn type_name(&self) -> &'static str {
        match self {
            Native::Null => "null",
            Native::Bool(_) => "bool",
            Native::Long(_) => "long",
            Native::Short(_) => "short",
            Native::Float(_) => "float",
            Native::Char(_) => "char",
            Native::Text(_) => "text",
            Native::Binary(_) => "binary",
            Native::Path(_) => "path",
            Native::Enum { .. } => "enum",
            Native::Callback(_) => "callback",
            Native::Object(_) => "object",
            Native::Value(_) => "value",
            Native::Ref(_) => "ref",
        }
    }
}

impl PartialEq for Native {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Native::Null, Native::Null) => true,
            (Native::Bool(a), Native::Bool(b)) => a == b,
            (Native::Long(a), Native::Long(b)) => a == b,
            (Native::Short(a), Native::Short(b)) => a == b,
            (Native::Float(a), Native::Float(b)) => a == b,
            (Native::Char(a), Native::Char(b)) => a == b,
            (Native::Text(a), Native::Text(b)) => a == b,
            (Native::Binary(a), Native::Binary(b)) => a == b,
            (Native::Path(a), Native::Path(b)) => a == b,
            (
                Native::Enum { class, name, .. },
                Native::Enum {
                    class: c2,
                    name: n2,
                    ..
                },
            ) => class == c2 && name == n2,
            (Native::Callback(a), Native::Callback(b)) => a == b,
            (Native::Object(a), Native::Object(b)) => a == b,
            (Native::Value(a), Native::Value(b)) => a == b,
            (Native::Ref(a), Native::Ref(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}
