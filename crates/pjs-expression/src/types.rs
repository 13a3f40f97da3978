use crate::error::ExprError;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// A value as seen by an expression: any JSON value, plus `undefined` and the
/// non-finite numbers that JSON cannot carry.
#[derive(Debug, Clone)]
pub enum JsValue {
    /// JavaScript `undefined`.
    Undefined,
    /// Any JSON-compatible value.
    Json(Value),
    /// `NaN`, `Infinity` or `-Infinity`.
    NonFinite(f64),
}

/// Shared `undefined`, handed out for missing method arguments.
pub static UNDEFINED: JsValue = JsValue::Undefined;

impl PartialEq for JsValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (JsValue::Undefined, JsValue::Undefined) => true,
            (JsValue::Json(a), JsValue::Json(b)) => a == b,
            (JsValue::NonFinite(a), JsValue::NonFinite(b)) => a == b || (a.is_nan() && b.is_nan()),
            _ => false,
        }
    }
}

impl From<Value> for JsValue {
    fn from(v: Value) -> Self {
        JsValue::Json(v)
    }
}

impl From<bool> for JsValue {
    fn from(b: bool) -> Self {
        JsValue::Json(Value::Bool(b))
    }
}

impl From<f64> for JsValue {
    fn from(n: f64) -> Self {
        crate::util::number_to_jsval(n)
    }
}

impl From<i64> for JsValue {
    fn from(n: i64) -> Self {
        JsValue::Json(Value::Number(serde_json::Number::from(n)))
    }
}

impl From<usize> for JsValue {
    fn from(n: usize) -> Self {
        JsValue::Json(Value::Number(serde_json::Number::from(n)))
    }
}

impl From<String> for JsValue {
    fn from(s: String) -> Self {
        JsValue::Json(Value::String(s))
    }
}

impl From<&str> for JsValue {
    fn from(s: &str) -> Self {
        JsValue::Json(Value::String(s.to_string()))
    }
}

/// The type of a member method implementation.
///
/// `this` is the receiver; missing arguments read as `undefined` and extra
/// arguments are ignored, as in JavaScript.
pub type MethodFn = fn(&JsValue, &[JsValue]) -> Result<JsValue, ExprError>;

/// A member method available on one receiver type.
#[derive(Debug)]
pub struct MethodDefinition {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub eval_fn: MethodFn,
}

/// Map of method name/alias -> definition.
pub type MethodMap = HashMap<String, Arc<MethodDefinition>>;

/// Builds a `MethodMap` from a list of method definitions.
pub fn methods_to_map(methods: Vec<Arc<MethodDefinition>>) -> MethodMap {
    let mut map = HashMap::new();
    for method in methods {
        map.insert(method.name.to_string(), Arc::clone(&method));
        for alias in method.aliases {
            map.insert(alias.to_string(), Arc::clone(&method));
        }
    }
    map
}

/// Returns argument `n`, or `undefined` when the caller passed fewer.
pub fn arg(args: &[JsValue], n: usize) -> &JsValue {
    args.get(n).unwrap_or(&UNDEFINED)
}
