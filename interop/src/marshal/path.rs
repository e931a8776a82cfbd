//! Filesystem-path strategy

use super::{Cost, ExpectedType, Marshal};
use crate::env::Env;
use crate::error::{InteropError, InteropResult};
use crate::value::{Native, NativeObject, Value};
use std::path::PathBuf;

/// Native path-handle target
///
/// A value already wrapping a path handle passes straight through; a
/// string is resolved against the caller's working directory. This
/// strategy does no I/O itself.
pub struct PathMarshal;

impl Marshal for PathMarshal {
    fn expected_type(&self) -> ExpectedType {
        ExpectedType::Path
    }

    fn cost(&self, value: &Value) -> Cost {
        match value {
            Value::Native(obj) if obj.is::<PathBuf>() => Cost::EXACT,
            Value::Str(_) => Cost::COERCIBLE,
            v if v.is_composite() => Cost::REJECT,
            _ => Cost::FORCED,
        }
    }

    fn marshal(&self, env: &mut Env, value: &Value) -> InteropResult<Native> {
        match value {
            Value::Native(obj) => match obj.downcast_ref::<PathBuf>() {
                Some(path) => Ok(Native::Path(path.clone())),
                None => {
                    env.warning(format!(
                        "{} is not a path handle",
                        obj.type_name()
                    ));
                    Ok(Native::Path(env.resolve_path("")))
                }
            },
            other => Ok(Native::Path(env.resolve_path(&other.to_text()))),
        }
    }

    fn unmarshal(&self, _env: &mut Env, native: Native) -> InteropResult<Value> {
        match native {
            Native::Path(path) => Ok(Value::Native(NativeObject::path(path))),
            Native::Null => Ok(Value::Null),
            _ => Err(InteropError::unsupported_conversion(
                self.expected_type(),
                "unmarshal a mismatched native value",
            )),
        }
    }
}
