//! Call-site arguments
//!
//! An argument is either an addressable slot (the caller's variable, for
//! by-reference parameters) or a lazy expression evaluated at most once.
//! Evaluation may have side effects, so the cached value is shared by
//! every candidate that probes it; no amount of cost probing evaluates an
//! expression twice.

use crate::env::Env;
use crate::value::{SlotRef, Value};

/// Static shape of an unevaluated argument expression
///
/// Lets a strategy answer a cost probe without forcing evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprHint {
    StringLiteral,
    IntLiteral,
    FloatLiteral,
    Other,
}

/// Deferred argument expression
pub type Thunk = Box<dyn FnOnce(&mut Env) -> Value>;

enum LazyState {
    Pending(Thunk),
    Ready(Value),
}

/// A lazily-evaluated argument with its static hint
pub struct LazyArg {
    state: LazyState,
    hint: ExprHint,
}

/// One call-site argument
pub enum Argument {
    /// The caller's variable: an assignable storage location
    Slot(SlotRef),
    /// An expression, evaluated at most once
    Lazy(LazyArg),
}

impl Argument {
    /// An already-evaluated value
    pub fn of(value: Value) -> Self {
        Argument::Lazy(LazyArg {
            state: LazyState::Ready(value),
            hint: ExprHint::Other,
        })
    }

    /// A deferred expression with its static shape
    pub fn lazy(hint: ExprHint, thunk: Thunk) -> Self {
        Argument::Lazy(LazyArg {
            state: LazyState::Pending(thunk),
            hint,
        })
    }

    /// An assignable location
    pub fn slot(slot: SlotRef) -> Self {
        Argument::Slot(slot)
    }

    /// The argument's value, evaluating the expression on first use only.
    /// A slot argument reads its current contents.
    pub fn value(&mut self, env: &mut Env) -> Value {
        match self {
            Argument::Slot(slot) => slot.borrow().clone(),
            Argument::Lazy(lazy) => {
                match std::mem::replace(&mut lazy.state, LazyState::Ready(Value::Null)) {
                    LazyState::Pending(thunk) => {
                        let value = thunk(env);
                        lazy.state = LazyState::Ready(value.clone());
                        value
                    }
                    LazyState::Ready(value) => {
                        lazy.state = LazyState::Ready(value.clone());
                        value
                    }
                }
            }
        }
    }

    /// The storage location, when the argument has one
    pub fn as_slot(&self) -> Option<&SlotRef> {
        match self {
            Argument::Slot(slot) => Some(slot),
            Argument::Lazy(_) => None,
        }
    }

    /// The static hint, only while the expression is still unevaluated
    pub fn hint(&self) -> Option<ExprHint> {
        match self {
            Argument::Lazy(LazyArg {
                state: LazyState::Pending(_),
                hint,
            }) => Some(*hint),
            _ => None,
        }
    }
}
