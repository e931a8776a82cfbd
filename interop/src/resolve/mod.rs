//! Overload resolution and dispatch
//!
//! For one call site with N arguments and a set of candidate native
//! signatures, score every candidate with the per-parameter strategy
//! costs, pick the cheapest, marshal the arguments exactly once through
//! the winner, invoke the native target, and unmarshal the result.

mod args;

pub use args::{Argument, ExprHint, LazyArg, Thunk};

use crate::env::Env;
use crate::error::{InteropError, InteropResult};
use crate::marshal::{Cost, MarshalRef};
use crate::value::{Native, Value};
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::debug;

/// The native function a signature dispatches to
pub type NativeFn = Arc<dyn Fn(&mut Env, &[Native]) -> InteropResult<Native> + Send + Sync>;

/// One declared parameter
pub struct Param {
    marshal: MarshalRef,
    optional: bool,
}

impl Param {
    pub fn required(marshal: MarshalRef) -> Self {
        Param {
            marshal,
            optional: false,
        }
    }

    /// An optional trailing parameter; a missing argument marshals from null
    pub fn optional(marshal: MarshalRef) -> Self {
        Param {
            marshal,
            optional: true,
        }
    }

    pub fn marshal(&self) -> &MarshalRef {
        &self.marshal
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }
}

/// One candidate native signature
///
/// Constructed once when the native surface is registered, immutable and
/// shared read-only afterward.
pub struct Signature {
    name: String,
    params: Vec<Param>,
    variadic: Option<MarshalRef>,
    ret: MarshalRef,
    callee: NativeFn,
}

impl std::fmt::Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.describe())
    }
}

impl Signature {
    pub fn new(
        name: impl Into<String>,
        params: Vec<Param>,
        ret: MarshalRef,
        callee: NativeFn,
    ) -> Self {
        Signature {
            name: name.into(),
            params,
            variadic: None,
            ret,
            callee,
        }
    }

    /// Accept extra arguments through the given strategy
    pub fn variadic(mut self, marshal: MarshalRef) -> Self {
        self.variadic = Some(marshal);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Minimum required argument count
    pub fn min_arity(&self) -> usize {
        self.params.iter().filter(|p| !p.optional).count()
    }

    /// Maximum argument count; unbounded for variadic signatures
    pub fn max_arity(&self) -> Option<usize> {
        if self.variadic.is_some() {
            None
        } else {
            Some(self.params.len())
        }
    }

    pub fn accepts_arity(&self, argc: usize) -> bool {
        argc >= self.min_arity() && self.max_arity().is_none_or(|max| argc <= max)
    }

    /// True when the parameter list has an optional or variadic tail
    pub fn has_tail(&self) -> bool {
        self.variadic.is_some() || self.params.iter().any(|p| p.optional)
    }

    /// Stringized signature for diagnostics: `name(type,type,...)`
    pub fn describe(&self) -> String {
        let mut out = String::new();
        let _ = write!(out, "{}(", self.name);
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            let _ = write!(out, "{}", param.marshal.expected_type());
        }
        if self.variadic.is_some() {
            if !self.params.is_empty() {
                out.push(',');
            }
            out.push_str("...");
        }
        out.push(')');
        out
    }

    /// Total cost of this candidate against the call-site arguments.
    /// A reference parameter without an assignable argument short-circuits
    /// the whole candidate to REJECT.
    fn total_cost(&self, env: &mut Env, args: &mut [Argument]) -> Cost {
        let mut total = Cost::EXACT;
        for (i, arg) in args.iter_mut().enumerate() {
            let marshal = match self.params.get(i) {
                Some(param) => &param.marshal,
                None => match &self.variadic {
                    Some(m) => m,
                    // Arity was filtered already; nothing sensible remains
                    None => return Cost::REJECT,
                },
            };
            if marshal.is_reference() && arg.as_slot().is_none() {
                return Cost::REJECT;
            }
            let cost = match arg.hint().and_then(|h| marshal.cost_hint(h)) {
                Some(cost) => cost,
                None => marshal.cost(&arg.value(env)),
            };
            total = total.saturating_add(cost);
            if total.is_reject() {
                return Cost::REJECT;
            }
        }
        total
    }

    /// Marshal every argument through this signature, invoke the native
    /// target, and unmarshal the result
    fn invoke(&self, env: &mut Env, args: &mut [Argument]) -> InteropResult<Value> {
        let mut natives = Vec::with_capacity(args.len().max(self.params.len()));
        for (i, param) in self.params.iter().enumerate() {
            let native = if param.marshal.is_reference() {
                let slot = args.get(i).and_then(Argument::as_slot).ok_or_else(|| {
                    InteropError::unsupported_conversion(
                        param.marshal.expected_type(),
                        "marshal a non-assignable argument",
                    )
                })?;
                param.marshal.marshal_ref(env, slot)?
            } else if i < args.len() {
                let value = args[i].value(env);
                param.marshal.marshal(env, &value)?
            } else {
                // Missing optional argument defaults to null
                param.marshal.marshal(env, &Value::Null)?
            };
            natives.push(native);
        }
        if let Some(variadic) = &self.variadic {
            for arg in args.iter_mut().skip(self.params.len()) {
                let value = arg.value(env);
                natives.push(variadic.marshal(env, &value)?);
            }
        }

        let result = match (self.callee)(env, &natives) {
            Ok(native) => native,
            Err(err @ InteropError::NativeCall { .. }) => return Err(err),
            Err(err) => {
                return Err(InteropError::native_call(self.describe(), err.to_string()));
            }
        };
        self.ret.unmarshal(env, result)
    }
}

/// All candidate signatures registered under one callable name
pub struct Overloads {
    name: String,
    candidates: Vec<Signature>,
}

impl Overloads {
    pub fn new(name: impl Into<String>) -> Self {
        Overloads {
            name: name.into(),
            candidates: Vec::new(),
        }
    }

    /// Register a candidate. Registration order is the final tie-break,
    /// so it must be fixed before traffic starts.
    pub fn register(&mut self, signature: Signature) {
        self.candidates.push(signature);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn candidates(&self) -> &[Signature] {
        &self.candidates
    }

    /// Pick the cheapest candidate for the call site.
    ///
    /// Tie-break: a candidate without an optional/variadic tail beats one
    /// with; remaining ties keep the earliest-registered candidate.
    pub fn select(&self, env: &mut Env, args: &mut [Argument]) -> InteropResult<&Signature> {
        let mut best: Option<(&Signature, Cost)> = None;
        for candidate in &self.candidates {
            if !candidate.accepts_arity(args.len()) {
                continue;
            }
            let cost = candidate.total_cost(env, args);
            debug!(
                target: "lume_interop",
                candidate = %candidate.describe(),
                %cost,
                "scored overload candidate"
            );
            if cost.is_reject() {
                continue;
            }
            best = match best {
                None => Some((candidate, cost)),
                Some((incumbent, incumbent_cost)) => {
                    if cost < incumbent_cost
                        || (cost == incumbent_cost
                            && incumbent.has_tail()
                            && !candidate.has_tail())
                    {
                        Some((candidate, cost))
                    } else {
                        Some((incumbent, incumbent_cost))
                    }
                }
            };
        }
        match best {
            Some((winner, cost)) => {
                debug!(
                    target: "lume_interop",
                    selected = %winner.describe(),
                    %cost,
                    "selected overload"
                );
                Ok(winner)
            }
            None => Err(InteropError::no_matching_overload(&self.name, args.len())),
        }
    }

    /// Resolve and call: the full path from call site to dynamic result
    pub fn dispatch(&self, env: &mut Env, args: &mut [Argument]) -> InteropResult<Value> {
        let winner = self.select(env, args)?;
        winner.invoke(env, args)
    }
}
