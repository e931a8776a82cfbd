//! Callback/function-handle strategy

use super::{Cost, ExpectedType, Marshal};
use crate::env::Env;
use crate::error::InteropResult;
use crate::value::{Native, Value};

/// Invocable callback target
///
/// Wraps any callable dynamic value into a native handle; a bare string
/// becomes a late-bound named callback. One-directional: a native callback
/// handle has no dynamic projection, so `unmarshal` keeps the default
/// programming-error behavior.
pub struct CallbackMarshal;

impl Marshal for CallbackMarshal {
    fn expected_type(&self) -> ExpectedType {
        ExpectedType::Callback
    }

    fn cost(&self, value: &Value) -> Cost {
        match value {
            Value::Callable(_) => Cost::EXACT,
            // Cross-family: the name still has to be bound to a function
            Value::Str(_) => Cost::LOSSY,
            _ => Cost::REJECT,
        }
    }

    fn marshal(&self, env: &mut Env, value: &Value) -> InteropResult<Native> {
        match env.create_callback(value) {
            Some(handle) => Ok(Native::Callback(handle)),
            None => {
                env.warning(format!(
                    "{} value is not callable",
                    value.type_name()
                ));
                Ok(Native::Null)
            }
        }
    }
}
