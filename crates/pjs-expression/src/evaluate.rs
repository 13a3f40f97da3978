//! Tree-walking evaluation of a parsed [`Expr`].

use crate::ast::{BinaryOp, Expr, LogicalOp, UnaryOp};
use crate::error::ExprError;
use crate::eval_ctx::EvalCtx;
use crate::types::{JsValue, MethodMap};
use crate::util;
use serde_json::{Map, Value};

/// Evaluates `expr` against the scope and method tables in `ctx`.
pub fn eval_expr(expr: &Expr, ctx: &EvalCtx<'_>) -> Result<JsValue, ExprError> {
    match expr {
        Expr::Literal(v) => Ok(v.clone()),
        Expr::Ident(name) => ctx
            .vars
            .get(name)
            .ok_or_else(|| ExprError::UndefinedReference(name.clone())),
        Expr::Member { object, property } => {
            let base = eval_expr(object, ctx)?;
            get_property(&base, property, ctx)
        }
        Expr::Index { object, index } => {
            let base = eval_expr(object, ctx)?;
            let key = property_key(&eval_expr(index, ctx)?);
            get_property(&base, &key, ctx)
        }
        Expr::Call { callee, args } => eval_call(callee, args, ctx),
        Expr::Unary { op, operand } => eval_unary(*op, operand, ctx),
        Expr::Binary { op, left, right } => {
            let l = eval_expr(left, ctx)?;
            let r = eval_expr(right, ctx)?;
            Ok(eval_binary(*op, &l, &r))
        }
        Expr::Logical { op, left, right } => {
            let l = eval_expr(left, ctx)?;
            let short_circuit = match op {
                LogicalOp::And => !util::is_truthy(&l),
                LogicalOp::Or => util::is_truthy(&l),
                LogicalOp::Nullish => !util::is_nullish(&l),
            };
            if short_circuit {
                Ok(l)
            } else {
                eval_expr(right, ctx)
            }
        }
        Expr::Conditional {
            test,
            consequent,
            alternate,
        } => {
            if util::is_truthy(&eval_expr(test, ctx)?) {
                eval_expr(consequent, ctx)
            } else {
                eval_expr(alternate, ctx)
            }
        }
        Expr::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(util::jsvalue_to_json(eval_expr(item, ctx)?));
            }
            Ok(JsValue::Json(Value::Array(out)))
        }
        Expr::Object(entries) => {
            let mut out = Map::new();
            for (key, value) in entries {
                match eval_expr(value, ctx)? {
                    // JSON objects drop undefined members.
                    JsValue::Undefined => {
                        out.remove(key);
                    }
                    v => {
                        out.insert(key.clone(), util::jsvalue_to_json(v));
                    }
                }
            }
            Ok(JsValue::Json(Value::Object(out)))
        }
    }
}

/// Canonical property key for a computed member access.
fn property_key(index: &JsValue) -> String {
    match index {
        JsValue::Json(Value::Number(n)) => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f >= 0.0 => format!("{}", f as u64),
            _ => util::to_display_string(index),
        },
        other => util::to_display_string(other),
    }
}

fn methods_for<'t>(value: &JsValue, ctx: &'t EvalCtx<'_>) -> Option<&'t MethodMap> {
    match value {
        JsValue::Json(Value::String(_)) => Some(&ctx.methods.string),
        JsValue::Json(Value::Array(_)) => Some(&ctx.methods.array),
        JsValue::Json(Value::Number(_)) | JsValue::NonFinite(_) => Some(&ctx.methods.number),
        _ => None,
    }
}

/// Reads `base[key]`.
///
/// Methods are not first-class values: naming one without calling it is an
/// error rather than a function object.
pub fn get_property(base: &JsValue, key: &str, ctx: &EvalCtx<'_>) -> Result<JsValue, ExprError> {
    let found = match base {
        JsValue::Undefined | JsValue::Json(Value::Null) => {
            return Err(ExprError::NullProperty {
                base: if matches!(base, JsValue::Undefined) { "undefined" } else { "null" },
                property: key.to_string(),
            })
        }
        JsValue::Json(Value::String(s)) => {
            if key == "length" {
                Some(JsValue::from(s.chars().count()))
            } else {
                util::array_index(key)
                    .map(|i| s.chars().nth(i).map(|c| JsValue::from(c.to_string())).unwrap_or(JsValue::Undefined))
            }
        }
        JsValue::Json(Value::Array(items)) => {
            if key == "length" {
                Some(JsValue::from(items.len()))
            } else {
                util::array_index(key)
                    .map(|i| items.get(i).cloned().map(JsValue::Json).unwrap_or(JsValue::Undefined))
            }
        }
        JsValue::Json(Value::Object(obj)) => obj.get(key).cloned().map(JsValue::Json),
        _ => None,
    };
    if let Some(v) = found {
        return Ok(v);
    }
    let is_method = methods_for(base, ctx).is_some_and(|m| m.contains_key(key))
        || matches!(key, "toString" | "valueOf");
    if is_method {
        return Err(ExprError::UncalledMethod(key.to_string()));
    }
    Ok(JsValue::Undefined)
}

fn eval_call(callee: &Expr, args: &[Expr], ctx: &EvalCtx<'_>) -> Result<JsValue, ExprError> {
    let (receiver, name) = match callee {
        Expr::Member { object, property } => (eval_expr(object, ctx)?, property.clone()),
        Expr::Index { object, index } => {
            let receiver = eval_expr(object, ctx)?;
            let key = property_key(&eval_expr(index, ctx)?);
            (receiver, key)
        }
        other => {
            // Evaluated first so an unknown name reports as undefined.
            eval_expr(other, ctx)?;
            return Err(ExprError::NotAFunction(describe(other)));
        }
    };

    if util::is_nullish(&receiver) {
        return Err(ExprError::NullProperty {
            base: if matches!(receiver, JsValue::Undefined) { "undefined" } else { "null" },
            property: name,
        });
    }

    let mut arg_values = Vec::with_capacity(args.len());
    for a in args {
        arg_values.push(eval_expr(a, ctx)?);
    }

    if let Some(method) = methods_for(&receiver, ctx).and_then(|m| m.get(name.as_str())) {
        return (method.eval_fn)(&receiver, &arg_values);
    }
    match name.as_str() {
        "toString" => Ok(JsValue::from(util::to_display_string(&receiver))),
        "valueOf" => Ok(receiver),
        _ => Err(ExprError::NotAFunction(describe(callee))),
    }
}

/// Source-like rendering of a callee, for error messages.
fn describe(expr: &Expr) -> String {
    match expr {
        Expr::Ident(name) => name.clone(),
        Expr::Member { object, property } => format!("{}.{}", describe(object), property),
        Expr::Index { object, .. } => format!("{}[...]", describe(object)),
        Expr::Call { callee, .. } => format!("{}(...)", describe(callee)),
        Expr::Literal(v) => util::inspect(v),
        _ => "expression".to_string(),
    }
}

fn eval_unary(op: UnaryOp, operand: &Expr, ctx: &EvalCtx<'_>) -> Result<JsValue, ExprError> {
    if let (UnaryOp::Typeof, Expr::Ident(name)) = (op, operand) {
        if !ctx.vars.has(name) {
            return Ok(JsValue::from("undefined"));
        }
    }
    let v = eval_expr(operand, ctx)?;
    Ok(match op {
        UnaryOp::Not => JsValue::from(!util::is_truthy(&v)),
        UnaryOp::Neg => JsValue::from(-util::to_number(&v)),
        UnaryOp::Plus => JsValue::from(util::to_number(&v)),
        UnaryOp::Typeof => JsValue::from(util::js_type(&v)),
    })
}

/// Applies a binary operator with JavaScript coercion rules.
pub fn eval_binary(op: BinaryOp, l: &JsValue, r: &JsValue) -> JsValue {
    use std::cmp::Ordering::{Equal, Greater, Less};

    let num = |f: fn(f64, f64) -> f64| JsValue::from(f(util::to_number(l), util::to_number(r)));
    match op {
        BinaryOp::Add => util::add(l, r),
        BinaryOp::Sub => num(|a, b| a - b),
        BinaryOp::Mul => num(|a, b| a * b),
        BinaryOp::Div => num(|a, b| a / b),
        BinaryOp::Rem => num(|a, b| a % b),
        BinaryOp::Pow => num(f64::powf),
        BinaryOp::Eq => JsValue::from(util::loose_equals(l, r)),
        BinaryOp::NotEq => JsValue::from(!util::loose_equals(l, r)),
        BinaryOp::StrictEq => JsValue::from(util::strict_equals(l, r)),
        BinaryOp::StrictNotEq => JsValue::from(!util::strict_equals(l, r)),
        BinaryOp::Lt => JsValue::from(matches!(util::compare(l, r), Some(Less))),
        BinaryOp::Le => JsValue::from(matches!(util::compare(l, r), Some(Less | Equal))),
        BinaryOp::Gt => JsValue::from(matches!(util::compare(l, r), Some(Greater))),
        BinaryOp::Ge => JsValue::from(matches!(util::compare(l, r), Some(Greater | Equal))),
    }
}
