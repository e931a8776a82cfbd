//! Conversion strategies between dynamic values and native types
//!
//! One immutable strategy per native parameter/return type. A strategy
//! scores how well a live value fits its target (`cost` - pure, total,
//! never an error), converts the value in (`marshal`), and converts native
//! results back out (`unmarshal`, when the direction exists). The overload
//! resolver probes every strategy against every argument, so `cost` must
//! be safe to call repeatedly and concurrently.

mod callback;
mod cost;
mod enums;
mod numeric;
mod object;
mod path;
mod string;

pub use callback::CallbackMarshal;
pub use cost::Cost;
pub use enums::{EnumClass, EnumMarshal};
pub use numeric::{BooleanMarshal, FloatMarshal, LongMarshal, ShortMarshal};
pub use object::{AnyMarshal, ObjectMarshal, ReferenceMarshal};
pub use path::PathMarshal;
pub use string::{BinaryMarshal, CharMarshal, TextMarshal};

use crate::env::Env;
use crate::error::{InteropError, InteropResult};
use crate::resolve::ExprHint;
use crate::value::{Native, SlotRef, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// The native type a strategy targets
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExpectedType {
    Bool,
    Long,
    Short,
    Float,
    Char,
    Text,
    Binary,
    Path,
    /// A named-constant class
    Enum(String),
    /// A boxed native object type
    Object(String),
    Callback,
    /// Unconverted dynamic value
    Any,
    /// Assignable by-reference location
    Reference,
}

impl fmt::Display for ExpectedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpectedType::Bool => write!(f, "bool"),
            ExpectedType::Long => write!(f, "long"),
            ExpectedType::Short => write!(f, "short"),
            ExpectedType::Float => write!(f, "float"),
            ExpectedType::Char => write!(f, "char"),
            ExpectedType::Text => write!(f, "text"),
            ExpectedType::Binary => write!(f, "binary"),
            ExpectedType::Path => write!(f, "path"),
            ExpectedType::Enum(name) => write!(f, "enum {name}"),
            ExpectedType::Object(name) => write!(f, "{name}"),
            ExpectedType::Callback => write!(f, "callback"),
            ExpectedType::Any => write!(f, "any"),
            ExpectedType::Reference => write!(f, "ref"),
        }
    }
}

/// A conversion strategy for one native target type
///
/// Implementations are stateless or hold fixed configuration only, and are
/// shared across concurrent calls behind `Arc`.
pub trait Marshal: Send + Sync {
    /// The native type this strategy converts to
    fn expected_type(&self) -> ExpectedType;

    /// Score how well `value` fits the target. Pure and total: a defined
    /// cost (possibly REJECT) for every value shape, never an error.
    fn cost(&self, value: &Value) -> Cost;

    /// Score an unevaluated argument from its static shape alone.
    /// `None` means the strategy needs the evaluated value.
    fn cost_hint(&self, _hint: ExprHint) -> Option<Cost> {
        None
    }

    /// Convert a dynamic value to the native target
    fn marshal(&self, env: &mut Env, value: &Value) -> InteropResult<Native>;

    /// Convert from an assignable location; only reference strategies
    /// support this direction
    fn marshal_ref(&self, _env: &mut Env, _slot: &SlotRef) -> InteropResult<Native> {
        Err(InteropError::unsupported_conversion(
            self.expected_type(),
            "marshal by reference",
        ))
    }

    /// Convert a native result back to a dynamic value. One-directional
    /// strategies keep the default, which reports a programming error.
    fn unmarshal(&self, _env: &mut Env, _native: Native) -> InteropResult<Value> {
        Err(InteropError::unsupported_conversion(
            self.expected_type(),
            "unmarshal",
        ))
    }

    /// True when the native side never mutates or aliases the value
    fn is_read_only(&self) -> bool {
        true
    }

    /// True when the parameter requires an assignable storage location
    fn is_reference(&self) -> bool {
        false
    }
}

/// Shared strategy reference
pub type MarshalRef = Arc<dyn Marshal>;

/// Immutable table of the primitive strategies
///
/// Built once at startup and injected wherever signatures are constructed.
/// Configured strategies (`ObjectMarshal`, `EnumMarshal`) are created
/// directly since they carry per-type state.
pub struct MarshalRegistry {
    table: HashMap<ExpectedType, MarshalRef>,
}

impl MarshalRegistry {
    /// Build the registry with every primitive strategy registered
    pub fn new() -> Self {
        let mut table: HashMap<ExpectedType, MarshalRef> = HashMap::new();
        let strategies: Vec<MarshalRef> = vec![
            Arc::new(BooleanMarshal),
            Arc::new(LongMarshal),
            Arc::new(ShortMarshal),
            Arc::new(FloatMarshal),
            Arc::new(CharMarshal),
            Arc::new(TextMarshal),
            Arc::new(BinaryMarshal),
            Arc::new(PathMarshal),
            Arc::new(CallbackMarshal),
            Arc::new(AnyMarshal),
            Arc::new(ReferenceMarshal),
        ];
        for strategy in strategies {
            table.insert(strategy.expected_type(), strategy);
        }
        MarshalRegistry { table }
    }

    pub fn get(&self, ty: &ExpectedType) -> Option<MarshalRef> {
        self.table.get(ty).cloned()
    }

    /// All registered strategies, for property sweeps
    pub fn strategies(&self) -> impl Iterator<Item = &MarshalRef> {
        self.table.values()
    }
}

impl Default for MarshalRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::DynString;
    use std::collections::BTreeMap;

    /// Every value shape the scoring sweep probes
    pub(crate) fn sample_values() -> Vec<Value> {
        vec![
            Value::Null,
            Value::Bool(true),
            Value::Bool(false),
            Value::Int(0),
            Value::Int(-7),
            Value::Float(3.5),
            Value::text(""),
            Value::text("x"),
            Value::text("42"),
            Value::text("hello"),
            Value::binary(vec![0x61]),
            Value::binary(vec![0xff, 0xfe]),
            Value::legacy(vec![0x61]),
            Value::Array(vec![Value::Int(1)]),
            Value::Object(BTreeMap::new()),
            Value::Callable(crate::value::Callable::Named("f".into())),
            Value::Native(crate::value::NativeObject::new("Thing", 1_u8)),
            Value::Str(DynString::text("3.25")),
        ]
    }

    #[test]
    fn test_registry_covers_primitives() {
        let registry = MarshalRegistry::new();
        for ty in [
            ExpectedType::Bool,
            ExpectedType::Long,
            ExpectedType::Short,
            ExpectedType::Float,
            ExpectedType::Char,
            ExpectedType::Text,
            ExpectedType::Binary,
            ExpectedType::Path,
            ExpectedType::Callback,
            ExpectedType::Any,
            ExpectedType::Reference,
        ] {
            assert!(registry.get(&ty).is_some(), "missing strategy for {ty}");
        }
    }

    #[test]
    fn test_exactness_invariant() {
        // A value already in the strategy's home representation is EXACT
        let registry = MarshalRegistry::new();
        let exact_pairs = [
            (ExpectedType::Bool, Value::Bool(true)),
            (ExpectedType::Long, Value::Int(3)),
            (ExpectedType::Float, Value::Float(3.0)),
            (ExpectedType::Text, Value::text("abc")),
            (ExpectedType::Binary, Value::binary(vec![1, 2])),
        ];
        for (ty, value) in exact_pairs {
            let strategy = registry.get(&ty).unwrap();
            assert_eq!(strategy.cost(&value), Cost::EXACT, "{ty}");
        }
    }

    #[test]
    fn test_cost_is_total_for_every_strategy() {
        // Totality: cost returns a defined value for every shape,
        // REJECT included, and never panics
        let registry = MarshalRegistry::new();
        for strategy in registry.strategies() {
            for value in sample_values() {
                let _ = strategy.cost(&value);
            }
        }
        let configured: Vec<MarshalRef> = vec![
            Arc::new(ObjectMarshal::of::<u32>("Counter")),
            Arc::new(EnumMarshal::new(Arc::new(EnumClass::new(
                "SortOrder",
                ["ASC", "DESC"],
            )))),
        ];
        for strategy in configured {
            for value in sample_values() {
                let _ = strategy.cost(&value);
            }
        }
    }

    #[test]
    fn test_cost_is_stable_across_probes() {
        // The resolver probes repeatedly; the score must not drift
        let registry = MarshalRegistry::new();
        for strategy in registry.strategies() {
            for value in sample_values() {
                assert_eq!(strategy.cost(&value), strategy.cost(&value));
            }
        }
    }
}
