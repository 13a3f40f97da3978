use crate::error::ExprError;
use crate::types::{arg, JsValue, MethodDefinition};
use crate::util;
use serde_json::Value;
use std::sync::Arc;

fn items(this: &JsValue) -> Result<&Vec<Value>, ExprError> {
    util::as_arr(this)
}

fn index_result(found: Option<usize>) -> JsValue {
    match found {
        Some(i) => JsValue::from(i),
        None => JsValue::from(-1i64),
    }
}

fn at(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    let arr = items(this)?;
    let i = util::to_integer(arg(args, 0));
    let i = if i < 0.0 { arr.len() as f64 + i } else { i };
    if i < 0.0 || i >= arr.len() as f64 {
        return Ok(JsValue::Undefined);
    }
    Ok(JsValue::Json(arr[i as usize].clone()))
}

/// Appends arguments; array arguments are spread one level.
fn concat(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    let mut out = items(this)?.clone();
    for a in args {
        match a {
            JsValue::Json(Value::Array(more)) => out.extend(more.iter().cloned()),
            other => out.push(util::jsvalue_to_json(other.clone())),
        }
    }
    Ok(JsValue::Json(Value::Array(out)))
}

fn includes(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    let arr = items(this)?;
    let needle = arg(args, 0);
    let from = util::relative_index(util::to_integer(arg(args, 1)), arr.len());
    let found = arr[from..].iter().any(|v| {
        let v = JsValue::Json(v.clone());
        // NaN never reaches an array, so SameValueZero reduces to ===.
        util::strict_equals(&v, needle)
    });
    Ok(JsValue::from(found))
}

fn index_of(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    let arr = items(this)?;
    let needle = arg(args, 0);
    let from = util::relative_index(util::to_integer(arg(args, 1)), arr.len());
    let found = arr
        .iter()
        .enumerate()
        .skip(from)
        .find(|(_, v)| util::strict_equals(&JsValue::Json((*v).clone()), needle))
        .map(|(i, _)| i);
    Ok(index_result(found))
}

fn last_index_of(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    let arr = items(this)?;
    if arr.is_empty() {
        return Ok(index_result(None));
    }
    let needle = arg(args, 0);
    let from = match arg(args, 1) {
        JsValue::Undefined => arr.len() - 1,
        f => {
            let f = util::to_integer(f);
            if f < 0.0 {
                let r = arr.len() as f64 + f;
                if r < 0.0 {
                    return Ok(index_result(None));
                }
                r as usize
            } else {
                (f as usize).min(arr.len() - 1)
            }
        }
    };
    let found = (0..=from)
        .rev()
        .find(|&i| util::strict_equals(&JsValue::Json(arr[i].clone()), needle));
    Ok(index_result(found))
}

fn join_items(arr: &[Value], sep: &str) -> String {
    arr.iter()
        .map(|v| match v {
            Value::Null => String::new(),
            other => util::to_display_string(&JsValue::Json(other.clone())),
        })
        .collect::<Vec<_>>()
        .join(sep)
}

fn join(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    let arr = items(this)?;
    let sep = match arg(args, 0) {
        JsValue::Undefined => ",".to_string(),
        s => util::to_display_string(s),
    };
    Ok(JsValue::from(join_items(arr, &sep)))
}

fn reverse(this: &JsValue, _args: &[JsValue]) -> Result<JsValue, ExprError> {
    let mut out = items(this)?.clone();
    out.reverse();
    Ok(JsValue::Json(Value::Array(out)))
}

fn slice(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    let arr = items(this)?;
    let start = util::relative_index(util::to_integer(arg(args, 0)), arr.len());
    let end = match arg(args, 1) {
        JsValue::Undefined => arr.len(),
        e => util::relative_index(util::to_integer(e), arr.len()),
    };
    let out = if start < end { arr[start..end].to_vec() } else { Vec::new() };
    Ok(JsValue::Json(Value::Array(out)))
}

fn to_string(this: &JsValue, _args: &[JsValue]) -> Result<JsValue, ExprError> {
    Ok(JsValue::from(join_items(items(this)?, ",")))
}

pub fn methods() -> Vec<Arc<MethodDefinition>> {
    vec![
        Arc::new(MethodDefinition { name: "at", aliases: &[], eval_fn: at }),
        Arc::new(MethodDefinition { name: "concat", aliases: &[], eval_fn: concat }),
        Arc::new(MethodDefinition { name: "includes", aliases: &[], eval_fn: includes }),
        Arc::new(MethodDefinition { name: "indexOf", aliases: &[], eval_fn: index_of }),
        Arc::new(MethodDefinition { name: "lastIndexOf", aliases: &[], eval_fn: last_index_of }),
        Arc::new(MethodDefinition { name: "join", aliases: &[], eval_fn: join }),
        Arc::new(MethodDefinition { name: "reverse", aliases: &[], eval_fn: reverse }),
        Arc::new(MethodDefinition { name: "slice", aliases: &[], eval_fn: slice }),
        Arc::new(MethodDefinition { name: "toString", aliases: &[], eval_fn: to_string }),
    ]
}
