use std::cell::RefCell;
use std::rc::Rc;

use aisc_core::js::TypeTag;
use aisc_core::vm::RuntimeErrorKind;
use aisc_core::vm::host;
use aisc_core::vm::runtime::{assert_tag, get_index, get_prop, repr, set_index, set_prop};
use aisc_core::{AiscErrorExt, Level, Script, Value, run_source};

#[test]
fn repr_quotes_only_nested_strings() {
    assert_eq!(repr(&Value::str("hi")), "hi");
    let nested = Value::array(vec![Value::Num(1.0), Value::str("a\"b"), Value::Null]);
    assert_eq!(repr(&nested), "[ 1, \"a\\\"b\", null ]");
    let obj = Value::object([("k", Value::Bool(true)), ("s", Value::str("x"))]);
    assert_eq!(repr(&obj), "{ k: true, s: \"x\" }");
}

#[test]
fn repr_formats_numbers_like_the_target_language() {
    assert_eq!(repr(&Value::Num(3.0)), "3");
    assert_eq!(repr(&Value::Num(1.5)), "1.5");
    assert_eq!(repr(&Value::Num(-0.0)), "0");
    assert_eq!(repr(&Value::Num(f64::NAN)), "NaN");
}

#[test]
fn repr_stops_at_references_it_already_printed() {
    let inner = Value::array(vec![Value::Num(1.0)]);
    let outer = Value::array(vec![inner.clone(), inner]);
    assert_eq!(repr(&outer), "[ [ 1 ], ... ]");

    let cyclic = Value::array(Vec::new());
    if let Value::Arr(items) = &cyclic {
        items.borrow_mut().push(cyclic.clone());
    }
    assert_eq!(repr(&cyclic), "[ ... ]");
    if let Value::Arr(items) = &cyclic {
        items.borrow_mut().clear();
    }
}

#[test]
fn repr_hides_function_bodies() {
    let f = Value::native("f", |_, _| Ok(Value::Null));
    assert_eq!(repr(&f), "@(?) { ? }");
}

#[test]
fn get_prop_reads_maps_and_builtin_properties() {
    let obj = Value::object([("a", Value::Num(1.0))]);
    assert_eq!(get_prop(&obj, "a"), Value::Num(1.0));
    assert_eq!(get_prop(&obj, "missing"), Value::Null);
    assert_eq!(get_prop(&Value::str("héllo"), "len"), Value::Num(5.0));
    assert_eq!(get_prop(&Value::array(vec![Value::Null; 3]), "len"), Value::Num(3.0));
    assert_eq!(get_prop(&Value::Num(1.0), "len"), Value::Null);
}

#[test]
fn set_prop_requires_a_map() {
    let obj = Value::object([]);
    set_prop(&obj, "k", Value::Num(2.0), None).expect("maps accept new keys");
    assert_eq!(get_prop(&obj, "k"), Value::Num(2.0));

    let err = set_prop(&Value::Num(1.0), "k", Value::Null, Some((4, 2))).expect_err("numbers have no props");
    assert_eq!(err.kind, RuntimeErrorKind::TypeMismatch(TypeTag::Object));
    assert_eq!(err.pos, Some((4, 2)));
}

#[test]
fn index_access_checks_bounds_and_key_types() {
    let arr = Value::array(vec![Value::Num(10.0), Value::Num(20.0)]);
    assert_eq!(get_index(&arr, &Value::Num(1.0), None).expect("in range"), Value::Num(20.0));

    let err = get_index(&arr, &Value::Num(2.0), None).expect_err("past the end");
    assert_eq!(err.kind, RuntimeErrorKind::IndexOutOfRange);
    let err = get_index(&arr, &Value::Num(0.5), None).expect_err("fractional");
    assert_eq!(err.kind, RuntimeErrorKind::IndexOutOfRange);
    let err = get_index(&arr, &Value::str("0"), None).expect_err("string index on array");
    assert_eq!(err.kind, RuntimeErrorKind::TypeMismatch(TypeTag::Number));

    set_index(&arr, &Value::Num(0.0), Value::str("x"), None).expect("in range");
    assert_eq!(repr(&arr), "[ \"x\", 20 ]");

    let obj = Value::object([]);
    set_index(&obj, &Value::str("key"), Value::Bool(false), None).expect("string key");
    assert_eq!(get_index(&obj, &Value::str("key"), None).expect("present"), Value::Bool(false));
    assert_eq!(get_index(&obj, &Value::str("nope"), None).expect("absent"), Value::Null);
}

#[test]
fn index_access_on_scalars_names_the_target() {
    let err = get_index(&Value::Num(1.0), &Value::str("a"), Some((1, 0))).expect_err("not indexable");
    assert_eq!(err.kind, RuntimeErrorKind::InvalidTarget);
    assert_eq!(err.to_string(), "Cannot read prop (\"a\") of num.");
}

#[test]
fn assertions_accept_only_their_tag() {
    assert!(assert_tag(TypeTag::String, &Value::str(""), None).is_ok());
    assert!(assert_tag(TypeTag::Function, &Value::native("f", |_, _| Ok(Value::Null)), None).is_ok());
    let err = assert_tag(TypeTag::Array, &Value::object([]), Some((2, 4))).expect_err("map is not array");
    assert_eq!(err.to_string(), "Expect arr at 2:4");
}

fn run_with_preset(src: &str) -> (Result<Value, Box<dyn AiscErrorExt>>, Vec<String>) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    let emit = Value::native("emit", move |_, args| {
        sink.borrow_mut().push(repr(&args.first().cloned().unwrap_or(Value::Null)));
        Ok(Value::Null)
    });
    let bindings = host::preset().into_iter().chain([("emit", emit)]);
    let result = run_source(&Script::from_source("host.is", src), bindings);
    let emitted = log.borrow().clone();
    (result, emitted)
}

#[test]
fn host_preset_exposes_core_functions() {
    let src = "emit(Core:type([]))\nemit(Core:type(null))\nemit(Core:to_str([1, \"a\"]))\nemit(Core:range(1, 3))\nemit(Core:range(2, 0))";
    let (result, emitted) = run_with_preset(src);
    result.expect("script should run");
    assert_eq!(emitted, vec!["arr", "null", "[ 1, \"a\" ]", "[ 1, 2, 3 ]", "[ 2, 1, 0 ]"]);
}

#[test]
fn error_values_carry_name_and_info() {
    let src = "let e = Error:create(\"bad\", 7)\nemit(Core:type(e))\nemit(e.name)\nemit(e.info)";
    let (result, emitted) = run_with_preset(src);
    result.expect("script should run");
    assert_eq!(emitted, vec!["error", "bad", "7"]);
}

#[test]
fn abort_stops_the_program_with_its_message() {
    let (result, emitted) = run_with_preset("emit(1)\nCore:abort(\"stop here\")\nemit(2)");
    let err = result.expect_err("abort must fail");
    assert_eq!(err.level(), Level::Error);
    assert_eq!(err.message(), "stop here");
    assert_eq!(err.issuer(), "aisc.vm");
    assert_eq!(emitted, vec!["1"]);
}

#[test]
fn date_year_is_plausible() {
    let (result, emitted) = run_with_preset("emit(Date:year() > 2000)\nemit(Core:type(Date:now()))");
    result.expect("script should run");
    assert_eq!(emitted, vec!["true", "num"]);
}

#[test]
fn maps_keep_insertion_order_when_keys_are_overwritten() {
    let obj = Value::object([("a", Value::Num(1.0)), ("b", Value::Num(2.0))]);
    set_prop(&obj, "a", Value::Num(3.0), None).expect("maps accept updates");
    set_prop(&obj, "c", Value::Null, None).expect("maps accept new keys");
    assert_eq!(repr(&obj), "{ a: 3, b: 2, c: null }");
}
