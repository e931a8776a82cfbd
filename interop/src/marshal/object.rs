//! Boxed-object, pass-through, and by-reference strategies

use super::{Cost, ExpectedType, Marshal};
use crate::env::Env;
use crate::error::{InteropError, InteropResult};
use crate::value::{Native, SlotRef, Value};
use std::any::TypeId;

/// Boxed native-object target
///
/// Accepts a dynamic value that already carries a native object of the
/// exact expected type. A mismatch never aborts the call: `marshal` warns
/// through the environment and degrades to null, because dynamic calls are
/// expected to limp on rather than fail the whole call sequence.
pub struct ObjectMarshal {
    type_name: String,
    type_id: TypeId,
}

impl ObjectMarshal {
    /// Strategy for the native type `T`
    pub fn of<T: 'static>(type_name: impl Into<String>) -> Self {
        ObjectMarshal {
            type_name: type_name.into(),
            type_id: TypeId::of::<T>(),
        }
    }
}

impl Marshal for ObjectMarshal {
    fn expected_type(&self) -> ExpectedType {
        ExpectedType::Object(self.type_name.clone())
    }

    fn cost(&self, value: &Value) -> Cost {
        match value.as_native() {
            Some(obj) if obj.type_id() == self.type_id => Cost::EXACT,
            // Effectively a rejection, but still selectable as a last
            // resort so the marshal-time diagnostic can fire
            _ => Cost::FORCED.plus(40),
        }
    }

    fn marshal(&self, env: &mut Env, value: &Value) -> InteropResult<Native> {
        match value {
            Value::Null => Ok(Native::Null),
            Value::Native(obj) if obj.type_id() == self.type_id => {
                Ok(Native::Object(obj.clone()))
            }
            other => {
                env.warning(format!(
                    "'{other}' of type {} is an unexpected argument, expected {}",
                    other.type_name(),
                    self.type_name
                ));
                Ok(Native::Null)
            }
        }
    }

    fn unmarshal(&self, _env: &mut Env, native: Native) -> InteropResult<Value> {
        match native {
            Native::Object(obj) => Ok(Value::Native(obj)),
            Native::Null => Ok(Value::Null),
            _ => Err(InteropError::unsupported_conversion(
                self.expected_type(),
                "unmarshal a mismatched native value",
            )),
        }
    }

    fn is_read_only(&self) -> bool {
        // The native side may mutate the wrapped object
        false
    }
}

/// Pass-through target: the native side takes the dynamic value as-is
///
/// Scores NATURAL for everything so any typed strategy beats it.
pub struct AnyMarshal;

impl Marshal for AnyMarshal {
    fn expected_type(&self) -> ExpectedType {
        ExpectedType::Any
    }

    fn cost(&self, _value: &Value) -> Cost {
        Cost::NATURAL
    }

    fn marshal(&self, _env: &mut Env, value: &Value) -> InteropResult<Native> {
        Ok(Native::Value(value.clone()))
    }

    fn unmarshal(&self, _env: &mut Env, native: Native) -> InteropResult<Value> {
        // The generic return direction: project any native scalar back
        // into the dynamic world
        Ok(match native {
            Native::Null => Value::Null,
            Native::Bool(b) => Value::Bool(b),
            Native::Long(n) => Value::Int(n),
            Native::Short(n) => Value::Int(i64::from(n)),
            Native::Float(f) => Value::Float(f),
            Native::Char(c) => Value::text(c.to_string()),
            Native::Text(s) => Value::text(s),
            Native::Binary(b) => Value::binary(b),
            Native::Path(p) => Value::Native(crate::value::NativeObject::path(p)),
            Native::Enum { name, .. } => Value::text(name),
            Native::Object(obj) => Value::Native(obj),
            Native::Value(v) => v,
            Native::Callback(_) | Native::Ref(_) => {
                return Err(InteropError::unsupported_conversion(
                    self.expected_type(),
                    "unmarshal a callback or reference",
                ));
            }
        })
    }
}

/// By-reference parameter strategy
///
/// Requires a stable, assignable storage location; the resolver rejects
/// any candidate pairing this strategy with a non-assignable argument.
/// The value direction does not exist for it.
pub struct ReferenceMarshal;

impl Marshal for ReferenceMarshal {
    fn expected_type(&self) -> ExpectedType {
        ExpectedType::Reference
    }

    fn cost(&self, _value: &Value) -> Cost {
        // Any value shape fits; assignability is the resolver's check
        Cost::NATURAL
    }

    fn marshal(&self, _env: &mut Env, _value: &Value) -> InteropResult<Native> {
        Err(InteropError::unsupported_conversion(
            self.expected_type(),
            "marshal by value",
        ))
    }

    fn marshal_ref(&self, _env: &mut Env, slot: &SlotRef) -> InteropResult<Native> {
        Ok(Native::Ref(slot.clone()))
    }

    fn is_read_only(&self) -> bool {
        false
    }

    fn is_reference(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{new_slot, NativeObject};

    #[test]
    fn test_object_exact_for_matching_type() {
        let marshal = ObjectMarshal::of::<u32>("Counter");
        let matching = Value::Native(NativeObject::new("Counter", 7_u32));
        let wrong = Value::Native(NativeObject::new("Timer", 7_i64));
        assert_eq!(marshal.cost(&matching), Cost::EXACT);
        assert!(marshal.cost(&wrong) > Cost::FORCED);
        assert!(!marshal.cost(&wrong).is_reject());
    }

    #[test]
    fn test_object_mismatch_degrades_with_warning() {
        let marshal = ObjectMarshal::of::<u32>("Counter");
        let mut env = Env::new();
        let out = marshal.marshal(&mut env, &Value::text("nope")).unwrap();
        assert_eq!(out, Native::Null);
        assert_eq!(env.warnings().len(), 1);
        assert!(env.warnings()[0].contains("Counter"));
    }

    #[test]
    fn test_object_round_trip() {
        let marshal = ObjectMarshal::of::<u32>("Counter");
        let mut env = Env::new();
        let value = Value::Native(NativeObject::new("Counter", 7_u32));
        let native = marshal.marshal(&mut env, &value).unwrap();
        let back = marshal.unmarshal(&mut env, native).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_object_is_not_read_only() {
        assert!(!ObjectMarshal::of::<u32>("Counter").is_read_only());
    }

    #[test]
    fn test_any_passes_value_through() {
        let mut env = Env::new();
        let value = Value::Array(vec![Value::Int(1)]);
        let native = AnyMarshal.marshal(&mut env, &value).unwrap();
        assert_eq!(AnyMarshal.unmarshal(&mut env, native).unwrap(), value);
    }

    #[test]
    fn test_any_projects_native_scalars() {
        let mut env = Env::new();
        assert_eq!(
            AnyMarshal.unmarshal(&mut env, Native::Long(5)).unwrap(),
            Value::Int(5)
        );
        assert_eq!(
            AnyMarshal.unmarshal(&mut env, Native::Text("hi".into())).unwrap(),
            Value::text("hi")
        );
    }

    #[test]
    fn test_reference_needs_a_slot() {
        let mut env = Env::new();
        let err = ReferenceMarshal.marshal(&mut env, &Value::Int(1)).unwrap_err();
        assert!(matches!(err, InteropError::UnsupportedConversion { .. }));

        let slot = new_slot(Value::Int(1));
        let native = ReferenceMarshal.marshal_ref(&mut env, &slot).unwrap();
        match native {
            Native::Ref(s) => {
                *s.borrow_mut() = Value::Int(9);
                assert_eq!(*slot.borrow(), Value::Int(9));
            }
            other => panic!("expected a reference, got {other:?}"),
        }
    }

    #[test]
    fn test_reference_flags() {
        assert!(ReferenceMarshal.is_reference());
        assert!(!ReferenceMarshal.is_read_only());
    }
}
