//! Lume native interop engine
//!
//! Marshaling and overload resolution between dynamic Lume values and
//! statically-typed native functions: convert a dynamic value into a
//! concrete native parameter type, convert native results back, and score
//! how well a live value fits each candidate signature so overloaded
//! native calls deterministically pick the cheapest conversion.

pub mod env;
pub mod error;
pub mod marshal;
pub mod resolve;
pub mod value;

pub use env::Env;
pub use error::{InteropError, InteropResult};
pub use marshal::{Cost, ExpectedType, Marshal, MarshalRef, MarshalRegistry};
pub use resolve::{Argument, ExprHint, NativeFn, Overloads, Param, Signature};
pub use value::{DynString, Native, Value};
