//! Integration tests for overload resolution and dispatch
//!
//! Exercises the full path: call-site arguments -> candidate scoring ->
//! selection -> marshal -> native call -> unmarshal, including the
//! reference short-circuit, the no-match failure, and the at-most-once
//! evaluation guarantee.

use lume_interop::env::Env;
use lume_interop::error::InteropError;
use lume_interop::marshal::{
    AnyMarshal, CallbackMarshal, Cost, EnumClass, EnumMarshal, ExpectedType, FloatMarshal,
    LongMarshal, Marshal, ObjectMarshal, PathMarshal, ReferenceMarshal, ShortMarshal, TextMarshal,
};
use lume_interop::resolve::{Argument, ExprHint, NativeFn, Overloads, Param, Signature};
use lume_interop::value::{Callable, ClosureRef, Native, NativeObject, new_slot, Value};
use lume_interop::InteropResult;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Native target that reports which overload ran
fn tagged(tag: &'static str) -> NativeFn {
    Arc::new(move |_env, _args| Ok(Native::Text(tag.to_owned())))
}

/// Native target that counts its invocations
fn counted(count: Arc<AtomicUsize>) -> NativeFn {
    Arc::new(move |_env, _args| {
        count.fetch_add(1, Ordering::SeqCst);
        Ok(Native::Null)
    })
}

/// Short strategy that counts marshal calls, to prove the losing
/// candidate is never converted
struct CountingShort {
    marshals: Arc<AtomicUsize>,
}

impl Marshal for CountingShort {
    fn expected_type(&self) -> ExpectedType {
        ShortMarshal.expected_type()
    }

    fn cost(&self, value: &Value) -> Cost {
        ShortMarshal.cost(value)
    }

    fn marshal(&self, env: &mut Env, value: &Value) -> InteropResult<Native> {
        self.marshals.fetch_add(1, Ordering::SeqCst);
        ShortMarshal.marshal(env, value)
    }
}

// ============================================
// Resolver correctness
// ============================================

#[test]
fn test_float_beats_narrowing_short_for_float_argument() {
    let marshals = Arc::new(AtomicUsize::new(0));
    let mut overloads = Overloads::new("f");
    overloads.register(Signature::new(
        "f",
        vec![Param::required(Arc::new(CountingShort {
            marshals: marshals.clone(),
        }))],
        Arc::new(TextMarshal),
        tagged("short"),
    ));
    overloads.register(Signature::new(
        "f",
        vec![Param::required(Arc::new(FloatMarshal))],
        Arc::new(TextMarshal),
        tagged("float"),
    ));

    let mut env = Env::new();
    let mut args = [Argument::of(Value::Float(3.0))];
    let out = overloads.dispatch(&mut env, &mut args).unwrap();

    // EXACT on the float target beats COERCIBLE on the narrowing one,
    // and the narrowing strategy is never asked to convert
    assert_eq!(out, Value::text("float"));
    assert_eq!(marshals.load(Ordering::SeqCst), 0);
}

#[test]
fn test_typed_candidate_beats_any() {
    let mut overloads = Overloads::new("f");
    overloads.register(Signature::new(
        "f",
        vec![Param::required(Arc::new(AnyMarshal))],
        Arc::new(TextMarshal),
        tagged("any"),
    ));
    overloads.register(Signature::new(
        "f",
        vec![Param::required(Arc::new(LongMarshal))],
        Arc::new(TextMarshal),
        tagged("long"),
    ));

    let mut env = Env::new();
    let mut args = [Argument::of(Value::Int(7))];
    assert_eq!(
        overloads.dispatch(&mut env, &mut args).unwrap(),
        Value::text("long")
    );
}

#[test]
fn test_char_candidate_wins_for_single_character_text() {
    let registry = lume_interop::MarshalRegistry::new();
    let mut overloads = Overloads::new("ord");
    overloads.register(Signature::new(
        "ord",
        vec![Param::required(registry.get(&ExpectedType::Long).unwrap())],
        Arc::new(TextMarshal),
        tagged("long"),
    ));
    overloads.register(Signature::new(
        "ord",
        vec![Param::required(registry.get(&ExpectedType::Char).unwrap())],
        Arc::new(TextMarshal),
        tagged("char"),
    ));

    let mut env = Env::new();
    let mut args = [Argument::of(Value::text("a"))];
    assert_eq!(
        overloads.dispatch(&mut env, &mut args).unwrap(),
        Value::text("char")
    );
}

// ============================================
// Reference parameters
// ============================================

fn string_or_ref() -> Overloads {
    let mut overloads = Overloads::new("g");
    overloads.register(Signature::new(
        "g",
        vec![Param::required(Arc::new(ReferenceMarshal))],
        Arc::new(AnyMarshal),
        Arc::new(|_env, args| {
            if let Some(Native::Ref(slot)) = args.first() {
                *slot.borrow_mut() = Value::text("written");
            }
            Ok(Native::Null)
        }),
    ));
    overloads.register(Signature::new(
        "g",
        vec![Param::required(Arc::new(TextMarshal))],
        Arc::new(TextMarshal),
        tagged("by-value"),
    ));
    overloads
}

#[test]
fn test_reference_candidate_rejected_for_literal_argument() {
    let overloads = string_or_ref();
    let mut env = Env::new();
    // A literal has no assignable location, so the reference overload is
    // REJECT even though its base cost beats the forced stringification
    let mut args = [Argument::of(Value::Int(5))];
    assert_eq!(
        overloads.dispatch(&mut env, &mut args).unwrap(),
        Value::text("by-value")
    );
}

#[test]
fn test_reference_candidate_writes_back_through_slot() {
    let overloads = string_or_ref();
    let mut env = Env::new();
    let slot = new_slot(Value::Int(5));
    let mut args = [Argument::slot(slot.clone())];
    overloads.dispatch(&mut env, &mut args).unwrap();
    assert_eq!(*slot.borrow(), Value::text("written"));
}

// ============================================
// No-match failure
// ============================================

#[test]
fn test_array_against_scalar_candidates_fails_without_native_call() {
    let called = Arc::new(AtomicUsize::new(0));
    let mut overloads = Overloads::new("h");
    overloads.register(Signature::new(
        "h",
        vec![Param::required(Arc::new(TextMarshal))],
        Arc::new(AnyMarshal),
        counted(called.clone()),
    ));
    overloads.register(Signature::new(
        "h",
        vec![Param::required(Arc::new(PathMarshal))],
        Arc::new(AnyMarshal),
        counted(called.clone()),
    ));
    overloads.register(Signature::new(
        "h",
        vec![Param::required(Arc::new(CallbackMarshal))],
        Arc::new(AnyMarshal),
        counted(called.clone()),
    ));

    let mut env = Env::new();
    let mut args = [Argument::of(Value::Array(vec![Value::Int(1)]))];
    let err = overloads.dispatch(&mut env, &mut args).unwrap_err();
    assert_eq!(err, InteropError::no_matching_overload("h", 1));
    assert_eq!(called.load(Ordering::SeqCst), 0);
}

// ============================================
// At-most-once evaluation
// ============================================

#[test]
fn test_side_effecting_argument_evaluates_once_across_candidates() {
    let mut overloads = Overloads::new("f");
    for (marshal, tag) in [
        (Arc::new(LongMarshal) as Arc<dyn Marshal>, "long"),
        (Arc::new(FloatMarshal) as Arc<dyn Marshal>, "float"),
        (Arc::new(TextMarshal) as Arc<dyn Marshal>, "text"),
    ] {
        overloads.register(Signature::new(
            "f",
            vec![Param::required(marshal)],
            Arc::new(TextMarshal),
            tagged(tag),
        ));
    }

    let evaluated = Arc::new(AtomicUsize::new(0));
    let seen = evaluated.clone();
    let mut args = [Argument::lazy(
        ExprHint::Other,
        Box::new(move |_env| {
            seen.fetch_add(1, Ordering::SeqCst);
            Value::Int(9)
        }),
    )];

    let mut env = Env::new();
    let out = overloads.dispatch(&mut env, &mut args).unwrap();
    assert_eq!(out, Value::text("long"));
    // Three candidates probed the cost and the winner marshaled, but the
    // expression ran exactly once
    assert_eq!(evaluated.load(Ordering::SeqCst), 1);
}

#[test]
fn test_string_literal_hint_resolves_without_evaluation_until_marshal() {
    let mut overloads = Overloads::new("f");
    overloads.register(Signature::new(
        "f",
        vec![Param::required(Arc::new(TextMarshal))],
        Arc::new(TextMarshal),
        Arc::new(|_env, args| Ok(args[0].clone())),
    ));

    let evaluated = Arc::new(AtomicUsize::new(0));
    let seen = evaluated.clone();
    let mut args = [Argument::lazy(
        ExprHint::StringLiteral,
        Box::new(move |_env| {
            seen.fetch_add(1, Ordering::SeqCst);
            Value::text("hello")
        }),
    )];

    let mut env = Env::new();
    let out = overloads.dispatch(&mut env, &mut args).unwrap();
    assert_eq!(out, Value::text("hello"));
    assert_eq!(evaluated.load(Ordering::SeqCst), 1);
}

// ============================================
// Optional and variadic tails
// ============================================

#[test]
fn test_missing_optional_defaults_to_null() {
    let mut overloads = Overloads::new("pad");
    overloads.register(Signature::new(
        "pad",
        vec![
            Param::required(Arc::new(TextMarshal)),
            Param::optional(Arc::new(LongMarshal)),
        ],
        Arc::new(TextMarshal),
        Arc::new(|_env, args| {
            let width = match args.get(1) {
                Some(Native::Long(n)) => *n,
                _ => -1,
            };
            Ok(Native::Text(format!("width={width}")))
        }),
    ));

    let mut env = Env::new();
    let mut args = [Argument::of(Value::text("x"))];
    let out = overloads.dispatch(&mut env, &mut args).unwrap();
    // Null's numeric projection is zero
    assert_eq!(out, Value::text("width=0"));
}

#[test]
fn test_variadic_extras_go_through_tail_strategy() {
    let mut overloads = Overloads::new("sum");
    overloads.register(
        Signature::new(
            "sum",
            vec![Param::required(Arc::new(LongMarshal))],
            Arc::new(LongMarshal),
            Arc::new(|_env, args| {
                let total = args
                    .iter()
                    .map(|n| match n {
                        Native::Long(n) => *n,
                        _ => 0,
                    })
                    .sum();
                Ok(Native::Long(total))
            }),
        )
        .variadic(Arc::new(LongMarshal)),
    );

    let mut env = Env::new();
    let mut args = [
        Argument::of(Value::Int(1)),
        Argument::of(Value::Int(2)),
        Argument::of(Value::text("3")),
    ];
    let out = overloads.dispatch(&mut env, &mut args).unwrap();
    assert_eq!(out, Value::Int(6));
}

// ============================================
// Configured strategies through dispatch
// ============================================

#[test]
fn test_enum_constant_resolves_and_unknown_name_fails() {
    let class = Arc::new(EnumClass::new("SortOrder", ["ASC", "DESC"]));
    let mut overloads = Overloads::new("set_order");
    overloads.register(Signature::new(
        "set_order",
        vec![Param::required(Arc::new(EnumMarshal::new(class)))],
        Arc::new(TextMarshal),
        Arc::new(|_env, args| match &args[0] {
            Native::Enum { name, ordinal, .. } => Ok(Native::Text(format!("{name}:{ordinal}"))),
            _ => Ok(Native::Null),
        }),
    ));

    let mut env = Env::new();
    let mut args = [Argument::of(Value::text("DESC"))];
    assert_eq!(
        overloads.dispatch(&mut env, &mut args).unwrap(),
        Value::text("DESC:1")
    );

    let mut args = [Argument::of(Value::text("SIDEWAYS"))];
    let err = overloads.dispatch(&mut env, &mut args).unwrap_err();
    assert_eq!(
        err,
        InteropError::no_constant_match("SortOrder", "SIDEWAYS")
    );
}

#[test]
fn test_path_argument_resolves_against_cwd() {
    let mut overloads = Overloads::new("open");
    overloads.register(Signature::new(
        "open",
        vec![Param::required(Arc::new(PathMarshal))],
        Arc::new(TextMarshal),
        Arc::new(|_env, args| match &args[0] {
            Native::Path(p) => Ok(Native::Text(p.display().to_string())),
            _ => Ok(Native::Null),
        }),
    ));

    let mut env = Env::with_cwd(PathBuf::from("/srv/app"));
    let mut args = [Argument::of(Value::text("data.txt"))];
    assert_eq!(
        overloads.dispatch(&mut env, &mut args).unwrap(),
        Value::text("/srv/app/data.txt")
    );
}

#[test]
fn test_callback_argument_is_invocable_from_native_code() {
    let mut overloads = Overloads::new("apply");
    overloads.register(Signature::new(
        "apply",
        vec![Param::required(Arc::new(CallbackMarshal))],
        Arc::new(AnyMarshal),
        Arc::new(|env, args| match &args[0] {
            Native::Callback(handle) => {
                let out = handle.invoke(env, &[Value::Int(20)])?;
                Ok(Native::Value(out))
            }
            _ => Ok(Native::Null),
        }),
    ));

    let f: ClosureRef = Arc::new(|args| Ok(Value::Int(args[0].to_long() + 1)));
    let mut env = Env::new();
    let mut args = [Argument::of(Value::Callable(Callable::Closure(f)))];
    assert_eq!(
        overloads.dispatch(&mut env, &mut args).unwrap(),
        Value::Int(21)
    );
}

#[test]
fn test_boxed_object_mismatch_degrades_with_warning() {
    let mut overloads = Overloads::new("tick");
    overloads.register(Signature::new(
        "tick",
        vec![Param::required(Arc::new(ObjectMarshal::of::<u32>("Counter")))],
        Arc::new(AnyMarshal),
        Arc::new(|_env, args| Ok(args[0].clone())),
    ));

    let mut env = Env::new();
    let mut args = [Argument::of(Value::text("not a counter"))];
    // The lone candidate is still selectable; the mismatch warns and
    // degrades to null instead of aborting the call
    let out = overloads.dispatch(&mut env, &mut args).unwrap();
    assert_eq!(out, Value::Null);
    assert_eq!(env.warnings().len(), 1);

    let mut args = [Argument::of(Value::Native(NativeObject::new(
        "Counter", 5_u32,
    )))];
    let out = overloads.dispatch(&mut env, &mut args).unwrap();
    assert!(matches!(out, Value::Native(_)));
}
