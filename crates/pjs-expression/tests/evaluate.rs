//! Integration tests for snippet compilation and evaluation.

use pjs_expression::{
    evaluate, evaluate_reducer, BindingContext, EvalCause, ExprError, JsValue, ReducerContext, Snippet,
};
use serde_json::{json, Value};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn to_json(result: JsValue) -> Value {
    match result {
        JsValue::Json(v) => v,
        JsValue::Undefined | JsValue::NonFinite(_) => Value::Null,
    }
}

fn check(code: &str, expected: Value, data: Value) {
    init();
    let value = JsValue::Json(data);
    let result = evaluate(&Snippet::new(code), &BindingContext { value: &value, index: 0 })
        .unwrap_or_else(|e| panic!("evaluate({}) failed: {}", code, e));
    assert_eq!(to_json(result), expected, "snippet: {}", code);
}

fn check_explicit(code: &str, expected: Value, data: Value) {
    init();
    let value = JsValue::Json(data);
    let snippet = Snippet::new(code).with_explicit_binding(true);
    let result = evaluate(&snippet, &BindingContext { value: &value, index: 0 })
        .unwrap_or_else(|e| panic!("evaluate({}) failed: {}", code, e));
    assert_eq!(to_json(result), expected, "snippet: {}", code);
}

fn check_err(code: &str, data: Value) -> String {
    init();
    let value = JsValue::Json(data);
    evaluate(&Snippet::new(code), &BindingContext { value: &value, index: 0 })
        .err()
        .unwrap_or_else(|| panic!("expected error for {}", code))
        .to_string()
}

fn fold(code: &str, items: Value) -> Value {
    init();
    let sequence = JsValue::Json(items.clone());
    let items = match items {
        Value::Array(items) => items,
        other => panic!("not an array: {}", other),
    };
    let mut acc = JsValue::Json(items[0].clone());
    for (i, item) in items.iter().enumerate().skip(1) {
        let current = JsValue::Json(item.clone());
        acc = evaluate_reducer(
            code,
            &ReducerContext {
                previous: &acc,
                current: &current,
                index: i,
                sequence: &sequence,
            },
        )
        .unwrap_or_else(|e| panic!("fold({}) failed: {}", code, e));
    }
    to_json(acc)
}

// --------------------------------------------------------------- Implicit binding

#[test]
fn test_string_members_bind_to_the_record() {
    check("length", json!(3), json!("foo"));
    check("toUpperCase()", json!("FOO"), json!("foo"));
    check("trim().length", json!(1), json!("  a "));
    check("charAt(0) === 'f'", json!(true), json!("foo"));
    check("substr(1, 2)", json!("bc"), json!("abcd"));
    check("indexOf('c') > -1", json!(true), json!("abc"));
    check("split(',').length", json!(3), json!("a,b,c"));
    check("replace('a', 'b')", json!("bba"), json!("aba"));
}

#[test]
fn test_object_literal_keys_stay_keys() {
    check("{length: length}", json!({"length": 3}), json!("foo"));
    check("{length}", json!({"length": 3}), json!("foo"));
    check("{upper: toUpperCase(), n: length}", json!({"upper": "AB", "n": 2}), json!("ab"));
}

#[test]
fn test_object_records_expose_their_properties() {
    check("name", json!("x"), json!({"name": "x"}));
    check("age >= 18 ? 'adult' : 'minor'", json!("adult"), json!({"age": 30}));
    check("$.tags.join('|')", json!("a|b"), json!({"tags": ["a", "b"]}));
    check("{id, first: tags[0]}", json!({"id": 7, "first": "a"}), json!({"id": 7, "tags": ["a"]}));
}

#[test]
fn test_explicit_mode() {
    check_explicit("$.length", json!(3), json!("foo"));
    check_explicit("$.toUpperCase()", json!("FOO"), json!("foo"));
    check_explicit("$.name", json!("x"), json!({"name": "x"}));
    check_explicit("[$, i]", json!(["foo", 0]), json!("foo"));
}

// ------------------------------------------------------------------ Operators

#[test]
fn test_arithmetic_and_comparison() {
    check("$ * 2 + 1", json!(7), json!(3));
    check("$ + 1", json!("31"), json!("3"));
    check("+$ + 1", json!(4), json!("3"));
    check("$ / 2", json!(1.5), json!(3));
    check("'10' < '9'", json!(true), json!(null));
    check("10 < '9'", json!(false), json!(null));
    check("$ == '3'", json!(true), json!(3));
    check("$ === '3'", json!(false), json!(3));
}

#[test]
fn test_truthiness() {
    check("!!$", json!(false), json!(""));
    check("!!$", json!(true), json!([]));
    check("$ || 'default'", json!("default"), json!(0));
    check("$ && $.x", json!(null), json!(null));
}

#[test]
fn test_structural_equality() {
    check("$ === {a: [1, 2]}", json!(true), json!({"a": [1, 2]}));
    check("[1, 2] === [1, 2, 3]", json!(false), json!(null));
}

#[test]
fn test_regex_methods() {
    check("match('(\\\\d+)-(\\\\d+)')", json!(["10-20", "10", "20"]), json!("x10-20"));
    check("search('o+')", json!(1), json!("foo"));
    check("match('z')", json!(null), json!("foo"));
}

// --------------------------------------------------------------------- Reduce

#[test]
fn test_reducer_snippets() {
    assert_eq!(fold("prev + curr", json!([1, 2, 3])), json!(6));
    assert_eq!(fold("3 * array[i]", json!([1, 2, 3])), json!(9));
    assert_eq!(fold("previous > current ? previous : current", json!([4, 9, 2])), json!(9));
    assert_eq!(fold("prev.concat([curr])", json!([[1], 2, 3])), json!([1, 2, 3]));
}

// --------------------------------------------------------------------- Errors

#[test]
fn test_undefined_reference() {
    let err = check_err("nope + 1", json!("foo"));
    assert!(err.contains("nope is not defined"), "got: {}", err);
    assert!(err.contains("nope + 1"), "got: {}", err);
}

#[test]
fn test_syntax_errors() {
    for code in ["1 +", "(1", "{a 1}", "a = 1", "x => x", "function () {}"] {
        let err = check_err(code, json!(null));
        assert!(err.contains(code), "got: {}", err);
    }
}

#[test]
fn test_string_length_limit() {
    for code in ["repeat(1e19)", "padStart(Infinity)", "padEnd(1e15, '-')"] {
        let err = check_err(code, json!("ab"));
        assert!(err.contains("Invalid string length"), "got: {}", err);
    }
    check("repeat(2)", json!("abab"), json!("ab"));
}

#[test]
fn test_deep_nesting_is_a_syntax_error() {
    let code = format!("{}1{}", "(".repeat(50_000), ")".repeat(50_000));
    let err = check_err(&code, json!(null));
    assert!(err.contains("nested too deeply"), "got: {}", err);
}

#[test]
fn test_null_member_access() {
    let err = check_err("$.a.b", json!({}));
    assert!(err.contains("Cannot read properties of undefined (reading 'b')"), "got: {}", err);
}

#[test]
fn test_error_source_is_exposed() {
    let value = JsValue::from(1i64);
    let err = evaluate(&Snippet::new("$.x()"), &BindingContext { value: &value, index: 0 }).unwrap_err();
    assert_eq!(err.cause, EvalCause::Runtime(ExprError::NotAFunction("$.x".to_string())));
    assert!(std::error::Error::source(&err).is_some());
}
