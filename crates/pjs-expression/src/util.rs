//! Value coercions with JavaScript semantics.

use crate::error::ExprError;
use crate::types::JsValue;
use serde_json::Value;
use std::cmp::Ordering;

// ----------------------------------------------------------------- Type helpers

/// Returns what `typeof value` yields.
pub fn js_type(value: &JsValue) -> &'static str {
    match value {
        JsValue::Undefined => "undefined",
        JsValue::NonFinite(_) => "number",
        JsValue::Json(v) => match v {
            Value::Null => "object",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) | Value::Object(_) => "object",
        },
    }
}

/// True for `null` and `undefined`.
pub fn is_nullish(value: &JsValue) -> bool {
    matches!(value, JsValue::Undefined | JsValue::Json(Value::Null))
}

fn is_structured(value: &JsValue) -> bool {
    matches!(value, JsValue::Json(Value::Array(_)) | JsValue::Json(Value::Object(_)))
}

pub fn as_str(value: &JsValue) -> Result<&str, ExprError> {
    match value {
        JsValue::Json(Value::String(s)) => Ok(s.as_str()),
        other => Err(ExprError::InvalidArgument(format!(
            "expected a string receiver, got {}",
            js_type(other)
        ))),
    }
}

pub fn as_arr(value: &JsValue) -> Result<&Vec<Value>, ExprError> {
    match value {
        JsValue::Json(Value::Array(a)) => Ok(a),
        other => Err(ExprError::InvalidArgument(format!(
            "expected an array receiver, got {}",
            js_type(other)
        ))),
    }
}

/// Converts a value to a serde_json value (undefined/non-finite -> null).
pub fn jsvalue_to_json(v: JsValue) -> Value {
    match v {
        JsValue::Undefined | JsValue::NonFinite(_) => Value::Null,
        JsValue::Json(v) => v,
    }
}

// --------------------------------------------------------------- Number helpers

/// `Number(value)`.
pub fn to_number(value: &JsValue) -> f64 {
    match value {
        JsValue::Undefined => f64::NAN,
        JsValue::NonFinite(n) => *n,
        JsValue::Json(v) => match v {
            Value::Null => 0.0,
            Value::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
            Value::String(s) => string_to_number(s),
            Value::Array(_) | Value::Object(_) => string_to_number(&to_display_string(value)),
        },
    }
}

/// Numeric conversion of a string literal, as `Number("...")` does it.
pub fn string_to_number(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }
    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    let radix = match s.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return u64::from_str_radix(&s[2..], radix)
            .map(|n| n as f64)
            .unwrap_or(f64::NAN);
    }
    // Rust also accepts "inf" and "nan"; JavaScript does not.
    if !s
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
    {
        return f64::NAN;
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

/// `ToIntegerOrInfinity`: truncates, with `NaN` reading as zero.
pub fn to_integer(value: &JsValue) -> f64 {
    let n = to_number(value);
    if n.is_nan() {
        0.0
    } else {
        n.trunc()
    }
}

/// Resolves a possibly negative position against a length, clamping to `0..=len`.
pub fn relative_index(position: f64, len: usize) -> usize {
    if position < 0.0 {
        (len as f64 + position).max(0.0) as usize
    } else {
        position.min(len as f64) as usize
    }
}

/// Wraps an `f64`, storing integral values as JSON integers so they print
/// without a fractional part.
pub fn number_to_jsval(n: f64) -> JsValue {
    if !n.is_finite() {
        return JsValue::NonFinite(n);
    }
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        // -0 collapses to 0 here; JSON has no negative zero either.
        return JsValue::Json(Value::Number(serde_json::Number::from(n as i64)));
    }
    match serde_json::Number::from_f64(n) {
        Some(num) => JsValue::Json(Value::Number(num)),
        None => JsValue::NonFinite(n),
    }
}

/// `String(n)` for numbers.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    let abs = n.abs();
    if !(1e-6..1e21).contains(&abs) {
        let formatted = format!("{:e}", n);
        return match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => formatted,
        };
    }
    format!("{}", n)
}

// --------------------------------------------------------------- String helpers

/// `String(value)`.
pub fn to_display_string(value: &JsValue) -> String {
    match value {
        JsValue::Undefined => "undefined".to_string(),
        JsValue::NonFinite(n) => format_number(*n),
        JsValue::Json(v) => json_display_string(v),
    }
}

fn json_display_string(v: &Value) -> String {
    match v {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_i64() {
            Some(i) => i.to_string(),
            None => format_number(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => json_display_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

const INSPECT_DEPTH: usize = 2;

/// Structural display form, in the style of Node's `util.inspect`:
/// `{ a: 1, b: 'x' }`, `[ 1, 2 ]`, strings quoted.
pub fn inspect(value: &JsValue) -> String {
    match value {
        JsValue::Undefined => "undefined".to_string(),
        JsValue::NonFinite(n) => format_number(*n),
        JsValue::Json(v) => inspect_json(v, 0),
    }
}

fn inspect_json(v: &Value, depth: usize) -> String {
    match v {
        Value::String(s) => quote(s),
        Value::Array(items) => {
            if items.is_empty() {
                return "[]".to_string();
            }
            if depth > INSPECT_DEPTH {
                return "[Array]".to_string();
            }
            let parts: Vec<String> = items.iter().map(|item| inspect_json(item, depth + 1)).collect();
            format!("[ {} ]", parts.join(", "))
        }
        Value::Object(obj) => {
            if obj.is_empty() {
                return "{}".to_string();
            }
            if depth > INSPECT_DEPTH {
                return "[Object]".to_string();
            }
            let parts: Vec<String> = obj
                .iter()
                .map(|(k, v)| format!("{}: {}", inspect_key(k), inspect_json(v, depth + 1)))
                .collect();
            format!("{{ {} }}", parts.join(", "))
        }
        other => json_display_string(other),
    }
}

fn inspect_key(key: &str) -> String {
    if is_identifier(key) {
        key.to_string()
    } else {
        quote(key)
    }
}

fn quote(s: &str) -> String {
    let q = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(q);
    for c in s.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\\' => out.push_str("\\\\"),
            c if c == q => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(q);
    out
}

/// True if `s` is a valid identifier name.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if is_ident_start(c) => chars.all(is_ident_part),
        _ => false,
    }
}

pub fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

pub fn is_ident_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

// ------------------------------------------------------------ Boolean helpers

/// Returns true if a value is truthy.
pub fn is_truthy(value: &JsValue) -> bool {
    match value {
        JsValue::Undefined => false,
        JsValue::NonFinite(n) => !n.is_nan(),
        JsValue::Json(v) => match v {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        },
    }
}

// --------------------------------------------------------- Comparison helpers

/// `a === b`. Arrays and objects compare structurally.
pub fn strict_equals(a: &JsValue, b: &JsValue) -> bool {
    match (a, b) {
        (JsValue::Undefined, JsValue::Undefined) => true,
        (JsValue::Json(av), JsValue::Json(bv)) => json_strict_equals(av, bv),
        (JsValue::NonFinite(_), _) | (_, JsValue::NonFinite(_)) => {
            js_type(a) == "number" && js_type(b) == "number" && to_number(a) == to_number(b)
        }
        _ => false,
    }
}

fn json_strict_equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        // 1 and 1.0 are the same number.
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(arr_a), Value::Array(arr_b)) => {
            arr_a.len() == arr_b.len()
                && arr_a.iter().zip(arr_b).all(|(x, y)| json_strict_equals(x, y))
        }
        (Value::Object(obj_a), Value::Object(obj_b)) => {
            obj_a.len() == obj_b.len()
                && obj_a
                    .iter()
                    .all(|(key, val_a)| obj_b.get(key).is_some_and(|val_b| json_strict_equals(val_a, val_b)))
        }
        _ => false,
    }
}

/// `a == b`.
pub fn loose_equals(a: &JsValue, b: &JsValue) -> bool {
    let (a_nullish, b_nullish) = (is_nullish(a), is_nullish(b));
    if a_nullish || b_nullish {
        return a_nullish && b_nullish;
    }
    if js_type(a) == js_type(b) {
        return strict_equals(a, b);
    }
    match (is_structured(a), is_structured(b)) {
        (true, false) => loose_equals(&to_primitive(a), b),
        (false, true) => loose_equals(a, &to_primitive(b)),
        _ => to_number(a) == to_number(b),
    }
}

/// Arrays and objects become their display string; everything else is kept.
pub fn to_primitive(value: &JsValue) -> JsValue {
    if is_structured(value) {
        JsValue::from(to_display_string(value))
    } else {
        value.clone()
    }
}

/// Relational comparison behind `<`, `<=`, `>`, `>=`.
///
/// Two strings compare lexically, everything else numerically; `None` when
/// either side is `NaN`.
pub fn compare(a: &JsValue, b: &JsValue) -> Option<Ordering> {
    let (a, b) = (to_primitive(a), to_primitive(b));
    match (&a, &b) {
        (JsValue::Json(Value::String(x)), JsValue::Json(Value::String(y))) => Some(x.cmp(y)),
        _ => to_number(&a).partial_cmp(&to_number(&b)),
    }
}

// ------------------------------------------------------------ Arithmetic helpers

/// `a + b`: concatenation when either side is a string after `ToPrimitive`.
pub fn add(a: &JsValue, b: &JsValue) -> JsValue {
    let (a, b) = (to_primitive(a), to_primitive(b));
    if js_type(&a) == "string" || js_type(&b) == "string" {
        let mut s = to_display_string(&a);
        s.push_str(&to_display_string(&b));
        return JsValue::from(s);
    }
    number_to_jsval(to_number(&a) + to_number(&b))
}

// ------------------------------------------------------------ Property helpers

/// Parses a canonical array index key (`"0"`, `"12"`, never `"01"`).
pub fn array_index(key: &str) -> Option<usize> {
    if key.is_empty() || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    if !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn number_coercion_matches_host() {
        assert_eq!(to_number(&JsValue::from(" 2.5 ")), 2.5);
        assert_eq!(to_number(&JsValue::from("")), 0.0);
        assert_eq!(to_number(&JsValue::from("0x1F")), 31.0);
        assert!(to_number(&JsValue::from("inf")).is_nan());
        assert!(to_number(&JsValue::from("abc")).is_nan());
        assert_eq!(to_number(&JsValue::Json(json!(true))), 1.0);
        assert_eq!(to_number(&JsValue::Json(json!(null))), 0.0);
        assert!(to_number(&JsValue::Undefined).is_nan());
        assert_eq!(to_number(&JsValue::Json(json!([]))), 0.0);
        assert_eq!(to_number(&JsValue::Json(json!(["7"]))), 7.0);
        assert!(to_number(&JsValue::Json(json!({}))).is_nan());
    }

    #[test]
    fn formats_numbers_like_host() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn integral_results_are_stored_as_integers() {
        assert_eq!(number_to_jsval(6.0), JsValue::Json(json!(6)));
        assert_eq!(number_to_jsval(2.5), JsValue::Json(json!(2.5)));
        assert!(matches!(number_to_jsval(f64::NAN), JsValue::NonFinite(_)));
    }

    #[test]
    fn display_string() {
        assert_eq!(to_display_string(&JsValue::Json(json!([1, null, "a"]))), "1,,a");
        assert_eq!(to_display_string(&JsValue::Json(json!({"a": 1}))), "[object Object]");
        assert_eq!(to_display_string(&JsValue::Json(json!(2.5))), "2.5");
        assert_eq!(to_display_string(&JsValue::Undefined), "undefined");
    }

    #[test]
    fn inspect_form() {
        assert_eq!(inspect(&JsValue::Json(json!({"a": 1, "b": "x"}))), "{ a: 1, b: 'x' }");
        assert_eq!(inspect(&JsValue::Json(json!([1, 2]))), "[ 1, 2 ]");
        assert_eq!(inspect(&JsValue::Json(json!({"a-b": []}))), "{ 'a-b': [] }");
        assert_eq!(inspect(&JsValue::Json(json!("it's"))), "\"it's\"");
        assert_eq!(
            inspect(&JsValue::Json(json!({"a": {"b": {"c": {"d": 1}}}}))),
            "{ a: { b: { c: [Object] } } }"
        );
    }

    #[test]
    fn truthiness() {
        assert!(!is_truthy(&JsValue::Json(json!(""))));
        assert!(!is_truthy(&JsValue::Json(json!(0))));
        assert!(!is_truthy(&JsValue::NonFinite(f64::NAN)));
        assert!(is_truthy(&JsValue::Json(json!([]))));
        assert!(is_truthy(&JsValue::Json(json!("0"))));
    }

    #[test]
    fn equality() {
        assert!(strict_equals(&JsValue::Json(json!(1)), &JsValue::Json(json!(1.0))));
        assert!(!strict_equals(&JsValue::Json(json!(1)), &JsValue::Json(json!("1"))));
        assert!(loose_equals(&JsValue::Json(json!(1)), &JsValue::Json(json!("1"))));
        assert!(loose_equals(&JsValue::Json(json!(null)), &JsValue::Undefined));
        assert!(!loose_equals(&JsValue::Json(json!(0)), &JsValue::Json(json!(null))));
        assert!(loose_equals(&JsValue::Json(json!([2])), &JsValue::Json(json!(2))));
        assert!(!strict_equals(&JsValue::NonFinite(f64::NAN), &JsValue::NonFinite(f64::NAN)));
    }

    #[test]
    fn addition_and_comparison() {
        assert_eq!(add(&JsValue::from(1i64), &JsValue::from("2")), JsValue::from("12"));
        assert_eq!(add(&JsValue::from(1i64), &JsValue::Json(json!(true))), JsValue::from(2i64));
        assert_eq!(compare(&JsValue::from("10"), &JsValue::from("9")), Some(Ordering::Less));
        assert_eq!(compare(&JsValue::from("10"), &JsValue::from(9i64)), Some(Ordering::Greater));
        assert_eq!(compare(&JsValue::from("x"), &JsValue::from(9i64)), None);
    }

    #[test]
    fn array_index_keys() {
        assert_eq!(array_index("0"), Some(0));
        assert_eq!(array_index("12"), Some(12));
        assert_eq!(array_index("01"), None);
        assert_eq!(array_index("-1"), None);
        assert_eq!(array_index("length"), None);
    }
}
