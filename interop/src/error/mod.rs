//! Error types for marshaling and overload resolution

use crate::marshal::ExpectedType;
use thiserror::Error;

/// Result type alias
pub type InteropResult<T> = std::result::Result<T, InteropError>;

/// Interop error
///
/// Cost computation never produces one of these; only `marshal`/`unmarshal`
/// and the resolver itself can fail.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InteropError {
    /// A one-directional strategy was driven in its unsupported direction.
    /// Signals a registration defect, not a user-data problem.
    #[error("unsupported conversion: {strategy} strategy cannot {direction}")]
    UnsupportedConversion {
        strategy: ExpectedType,
        direction: &'static str,
    },

    /// Named-constant marshal found no constant by the given symbolic name
    #[error("no constant named `{name}` in enum {class}")]
    NoConstantMatch { class: String, name: String },

    /// Every candidate signature scored REJECT for the call site
    #[error("no matching overload for {call_site} with {argc} argument(s)")]
    NoMatchingOverload { call_site: String, argc: usize },

    /// Failure propagated out of the native target itself
    #[error("{call_site}: {message}")]
    NativeCall { call_site: String, message: String },
}

impl InteropError {
    pub fn unsupported_conversion(strategy: ExpectedType, direction: &'static str) -> Self {
        Self::UnsupportedConversion {
            strategy,
            direction,
        }
    }

    pub fn no_constant_match(class: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NoConstantMatch {
            class: class.into(),
            name: name.into(),
        }
    }

    pub fn no_matching_overload(call_site: impl Into<String>, argc: usize) -> Self {
        Self::NoMatchingOverload {
            call_site: call_site.into(),
            argc,
        }
    }

    pub fn native_call(call_site: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NativeCall {
            call_site: call_site.into(),
            message: message.into(),
        }
    }
}
