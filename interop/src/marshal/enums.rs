//! Named-constant (enum) strategy

use super::{Cost, ExpectedType, Marshal};
use crate::env::Env;
use crate::error::{InteropError, InteropResult};
use crate::value::{Native, Value};
use std::sync::Arc;

/// A native enum class: an ordered set of named constants
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumClass {
    name: String,
    constants: Vec<String>,
}

impl EnumClass {
    pub fn new<I, S>(name: impl Into<String>, constants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        EnumClass {
            name: name.into(),
            constants: constants.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordinal of a constant by its symbolic name
    pub fn lookup(&self, name: &str) -> Option<usize> {
        self.constants.iter().position(|c| c == name)
    }

    pub fn constants(&self) -> &[String] {
        &self.constants
    }
}

/// Named-constant target
///
/// The one strategy whose marshal step has a hard failure mode: an
/// unmatched symbolic name has no sensible default. Cost never consults
/// the constant table; a bad name surfaces at marshal time as
/// `NoConstantMatch`.
pub struct EnumMarshal {
    class: Arc<EnumClass>,
}

impl EnumMarshal {
    pub fn new(class: Arc<EnumClass>) -> Self {
        EnumMarshal { class }
    }
}

impl Marshal for EnumMarshal {
    fn expected_type(&self) -> ExpectedType {
        ExpectedType::Enum(self.class.name.clone())
    }

    fn cost(&self, value: &Value) -> Cost {
        match value {
            Value::Str(_) => Cost::NATURAL,
            v if v.is_composite() || v.is_callable() => Cost::REJECT,
            _ => Cost::FORCED,
        }
    }

    fn marshal(&self, _env: &mut Env, value: &Value) -> InteropResult<Native> {
        let name = value.to_text();
        match self.class.lookup(&name) {
            Some(ordinal) => Ok(Native::Enum {
                class: self.class.name.clone(),
                name,
                ordinal,
            }),
            None => Err(InteropError::no_constant_match(&self.class.name, name)),
        }
    }

    fn unmarshal(&self, _env: &mut Env, native: Native) -> InteropResult<Value> {
        match native {
            Native::Enum { name, .. } => Ok(Value::text(name)),
            Native::Null => Ok(Value::Null),
            _ => Err(InteropError::unsupported_conversion(
                self.expected_type(),
                "unmarshal a mismatched native value",
            )),
        }
    }
}
