//! Strategies for the string-family native targets
//!
//! Costs follow how far a value's actual string representation is from the
//! target's home representation: the home form is cheapest, a lossless
//! re-encode comes next, and a decode that can drop information is worse.
//! Composite values are the only rejections; other scalars are forcibly
//! stringified.

use super::{Cost, ExpectedType, Marshal};
use crate::env::Env;
use crate::error::{InteropError, InteropResult};
use crate::resolve::ExprHint;
use crate::value::{DynString, Native, Value};

/// Code-point-oriented native string target
pub struct TextMarshal;

impl Marshal for TextMarshal {
    fn expected_type(&self) -> ExpectedType {
        ExpectedType::Text
    }

    fn cost(&self, value: &Value) -> Cost {
        match value {
            Value::Str(DynString::Text(_)) => Cost::EXACT,
            // Legacy promotes losslessly, binary may hit invalid sequences
            Value::Str(DynString::Legacy(_)) => Cost::NATURAL,
            Value::Str(DynString::Binary(_)) => Cost::NATURAL.plus(2),
            v if v.is_composite() => Cost::REJECT,
            Value::Callable(_) | Value::Native(_) => Cost::FORCED.plus(1),
            _ => Cost::FORCED,
        }
    }

    fn cost_hint(&self, hint: ExprHint) -> Option<Cost> {
        match hint {
            ExprHint::StringLiteral => Some(Cost::EXACT),
            ExprHint::IntLiteral | ExprHint::FloatLiteral => Some(Cost::FORCED),
            ExprHint::Other => None,
        }
    }

    fn marshal(&self, env: &mut Env, value: &Value) -> InteropResult<Native> {
        let text = match value {
            Value::Str(s) => {
                let (text, lossy) = s.to_text_lossy();
                if lossy {
                    env.warning(format!(
                        "binary string is not valid text; {} replaced invalid sequences",
                        '\u{FFFD}'
                    ));
                }
                text
            }
            other => other.to_text(),
        };
        Ok(Native::Text(text))
    }

    fn unmarshal(&self, _env: &mut Env, native: Native) -> InteropResult<Value> {
        match native {
            Native::Text(s) => Ok(Value::text(s)),
            Native::Char(c) => Ok(Value::text(c.to_string())),
            Native::Long(n) => Ok(Value::text(n.to_string())),
            Native::Float(f) => Ok(Value::text(f.to_string())),
            Native::Bool(b) => Ok(Value::text(b.to_string())),
            Native::Null => Ok(Value::Null),
            other => Err(InteropError::unsupported_conversion(
                self.expected_type(),
                unexpected(&other),
            )),
        }
    }
}

/// Byte-oriented native string target
pub struct BinaryMarshal;

impl Marshal for BinaryMarshal {
    fn expected_type(&self) -> ExpectedType {
        ExpectedType::Binary
    }

    fn cost(&self, value: &Value) -> Cost {
        match value {
            Value::Str(DynString::Binary(_)) => Cost::EXACT,
            // Text re-encodes without loss; legacy needs a copy too but is
            // the older form
            Value::Str(DynString::Text(_)) => Cost::NATURAL,
            Value::Str(DynString::Legacy(_)) => Cost::NATURAL.plus(1),
            v if v.is_composite() => Cost::REJECT,
            _ => Cost::FORCED,
        }
    }

    fn cost_hint(&self, hint: ExprHint) -> Option<Cost> {
        match hint {
            ExprHint::StringLiteral => Some(Cost::NATURAL),
            _ => None,
        }
    }

    fn marshal(&self, _env: &mut Env, value: &Value) -> InteropResult<Native> {
        let bytes = match value {
            Value::Str(s) => s.to_bytes(),
            other => other.to_text().into_bytes(),
        };
        Ok(Native::Binary(bytes))
    }

    fn unmarshal(&self, _env: &mut Env, native: Native) -> InteropResult<Value> {
        match native {
            Native::Binary(bytes) => Ok(Value::binary(bytes)),
            Native::Text(s) => Ok(Value::binary(s.into_bytes())),
            Native::Null => Ok(Value::Null),
            other => Err(InteropError::unsupported_conversion(
                self.expected_type(),
                unexpected(&other),
            )),
        }
    }
}

/// Single-character native target
///
/// A text string of code-point length 1 is the natural fit. The same code
/// point held in a legacy or binary representation scores a strictly worse
/// tier; the two byte-oriented representations are not interchangeable
/// with text.
pub struct CharMarshal;

impl Marshal for CharMarshal {
    fn expected_type(&self) -> ExpectedType {
        ExpectedType::Char
    }

    fn cost(&self, value: &Value) -> Cost {
        match value {
            Value::Str(s @ DynString::Text(_)) if s.char_len() == 1 => Cost::NATURAL,
            Value::Str(s @ DynString::Legacy(_)) if s.char_len() == 1 => Cost::NATURAL.plus(1),
            Value::Str(s @ DynString::Binary(_)) if s.single_char().is_some() => Cost::COERCIBLE,
            // Anything with an integer projection converts as a char code
            Value::Int(_) | Value::Float(_) | Value::Bool(_) => Cost::COERCIBLE.plus(10),
            v if v.is_numeric_string() => Cost::COERCIBLE.plus(11),
            _ => Cost::FORCED,
        }
    }

    fn marshal(&self, env: &mut Env, value: &Value) -> InteropResult<Native> {
        if let Value::Str(s) = value {
            if let Some(c) = s.single_char() {
                return Ok(Native::Char(c));
            }
            if s.is_numeric() {
                return Ok(Native::Char(char_code(env, value.to_long())));
            }
            // Multi-character string: take the first character
            let (text, _) = s.to_text_lossy();
            return Ok(Native::Char(text.chars().next().unwrap_or('\0')));
        }
        Ok(Native::Char(char_code(env, value.to_long())))
    }

    fn unmarshal(&self, _env: &mut Env, native: Native) -> InteropResult<Value> {
        match native {
            Native::Char(c) => Ok(Value::text(c.to_string())),
            Native::Null => Ok(Value::Null),
            other => Err(InteropError::unsupported_conversion(
                self.expected_type(),
                unexpected(&other),
            )),
        }
    }
}

/// Interpret an integer projection as a character code
fn char_code(env: &mut Env, code: i64) -> char {
    match u32::try_from(code).ok().and_then(char::from_u32) {
        Some(c) => c,
        None => {
            env.warning(format!("{code} is not a valid character code"));
            '\u{FFFD}'
        }
    }
}

fn unexpected(native: &Native) -> &'static str {
    match native {
        Native::Callback(_) => "unmarshal a callback",
        Native::Ref(_) => "unmarshal a reference",
        _ => "unmarshal a mismatched native value",
    }
}
