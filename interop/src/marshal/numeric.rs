//! Strategies for the numeric and boolean native targets
//!
//! These are the permissive end of the family: every dynamic value has a
//! defined (if degenerate) numeric and boolean projection, so none of
//! these strategies ever scores REJECT.

use super::{Cost, ExpectedType, Marshal};
use crate::env::Env;
use crate::error::{InteropError, InteropResult};
use crate::resolve::ExprHint;
use crate::value::{Native, Value};

/// Native `bool` target
pub struct BooleanMarshal;

impl Marshal for BooleanMarshal {
    fn expected_type(&self) -> ExpectedType {
        ExpectedType::Bool
    }

    fn cost(&self, value: &Value) -> Cost {
        match value {
            Value::Bool(_) => Cost::EXACT,
            v if v.is_composite() => Cost::FORCED,
            _ => Cost::COERCIBLE,
        }
    }

    fn marshal(&self, _env: &mut Env, value: &Value) -> InteropResult<Native> {
        Ok(Native::Bool(value.is_truthy()))
    }

    fn unmarshal(&self, _env: &mut Env, native: Native) -> InteropResult<Value> {
        match native {
            Native::Bool(b) => Ok(Value::Bool(b)),
            Native::Null => Ok(Value::Null),
            other => Err(InteropError::unsupported_conversion(
                self.expected_type(),
                unexpected(other),
            )),
        }
    }
}

/// Native `i64` target
pub struct LongMarshal;

impl Marshal for LongMarshal {
    fn expected_type(&self) -> ExpectedType {
        ExpectedType::Long
    }

    fn cost(&self, value: &Value) -> Cost {
        match value {
            Value::Int(_) => Cost::EXACT,
            Value::Float(_) => Cost::COERCIBLE,
            v if v.is_numeric_string() => Cost::LOSSY,
            _ => Cost::FORCED,
        }
    }

    fn cost_hint(&self, hint: ExprHint) -> Option<Cost> {
        match hint {
            ExprHint::IntLiteral => Some(Cost::EXACT),
            ExprHint::FloatLiteral => Some(Cost::COERCIBLE),
            _ => None,
        }
    }

    fn marshal(&self, _env: &mut Env, value: &Value) -> InteropResult<Native> {
        Ok(Native::Long(value.to_long()))
    }

    fn unmarshal(&self, _env: &mut Env, native: Native) -> InteropResult<Value> {
        match native {
            Native::Long(n) => Ok(Value::Int(n)),
            Native::Short(n) => Ok(Value::Int(i64::from(n))),
            Native::Null => Ok(Value::Null),
            other => Err(InteropError::unsupported_conversion(
                self.expected_type(),
                unexpected(other),
            )),
        }
    }
}

/// Narrowing native `i16` target
///
/// Marshaling truncates silently, matching the script language's narrowing
/// semantics: a lossy, non-failing conversion.
pub struct ShortMarshal;

impl Marshal for ShortMarshal {
    fn expected_type(&self) -> ExpectedType {
        ExpectedType::Short
    }

    fn cost(&self, value: &Value) -> Cost {
        match value {
            Value::Int(_) => Cost::NATURAL,
            Value::Float(_) => Cost::COERCIBLE,
            v if v.is_numeric_string() => Cost::FORCED,
            _ => Cost::FORCED.plus(1),
        }
    }

    fn marshal(&self, _env: &mut Env, value: &Value) -> InteropResult<Native> {
        Ok(Native::Short(value.to_long() as i16))
    }

    fn unmarshal(&self, _env: &mut Env, native: Native) -> InteropResult<Value> {
        match native {
            Native::Short(n) => Ok(Value::Int(i64::from(n))),
            Native::Long(n) => Ok(Value::Int(n)),
            Native::Null => Ok(Value::Null),
            other => Err(InteropError::unsupported_conversion(
                self.expected_type(),
                unexpected(other),
            )),
        }
    }
}

/// Native `f64` target
pub struct FloatMarshal;

impl Marshal for FloatMarshal {
    fn expected_type(&self) -> ExpectedType {
        ExpectedType::Float
    }

    fn cost(&self, value: &Value) -> Cost {
        match value {
            Value::Float(_) => Cost::EXACT,
            Value::Int(_) => Cost::COERCIBLE,
            v if v.is_numeric_string() => Cost::LOSSY,
            _ => Cost::FORCED,
        }
    }

    fn cost_hint(&self, hint: ExprHint) -> Option<Cost> {
        match hint {
            ExprHint::FloatLiteral => Some(Cost::EXACT),
            ExprHint::IntLiteral => Some(Cost::COERCIBLE),
            _ => None,
        }
    }

    fn marshal(&self, _env: &mut Env, value: &Value) -> InteropResult<Native> {
        Ok(Native::Float(value.to_float()))
    }

    fn unmarshal(&self, _env: &mut Env, native: Native) -> InteropResult<Value> {
        match native {
            Native::Float(f) => Ok(Value::Float(f)),
            Native::Long(n) => Ok(Value::Float(n as f64)),
            Native::Short(n) => Ok(Value::Float(f64::from(n))),
            Native::Null => Ok(Value::Null),
            other => Err(InteropError::unsupported_conversion(
                self.expected_type(),
                unexpected(other),
            )),
        }
    }
}

/// Static direction label for unmarshal mismatches
fn unexpected(native: Native) -> &'static str {
    match native {
        Native::Callback(_) => "unmarshal a callback",
        Native::Ref(_) => "unmarshal a reference",
        _ => "unmarshal a mismatched native value",
    }
}
