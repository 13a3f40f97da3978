use crate::error::ExprError;
use crate::types::{arg, JsValue, MethodDefinition};
use crate::util;
use std::sync::Arc;

fn receiver(this: &JsValue) -> Result<f64, ExprError> {
    match util::js_type(this) {
        "number" => Ok(util::to_number(this)),
        other => Err(ExprError::InvalidArgument(format!(
            "expected a number receiver, got {}",
            other
        ))),
    }
}

fn to_fixed(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    let n = receiver(this)?;
    let digits = util::to_integer(arg(args, 0));
    if !(0.0..=100.0).contains(&digits) {
        return Err(ExprError::InvalidArgument(
            "toFixed() digits argument must be between 0 and 100".to_string(),
        ));
    }
    if !n.is_finite() || n.abs() >= 1e21 {
        return Ok(JsValue::from(util::format_number(n)));
    }
    Ok(JsValue::from(format!("{:.*}", digits as usize, n)))
}

fn to_radix_string(n: f64, radix: u32) -> String {
    let negative = n < 0.0;
    let mut int = n.abs().trunc();
    let mut frac = n.abs().fract();
    let mut digits = Vec::new();
    if int == 0.0 {
        digits.push('0');
    }
    while int >= 1.0 {
        let d = (int % radix as f64) as u32;
        digits.push(std::char::from_digit(d, radix).unwrap_or('0'));
        int = (int / radix as f64).trunc();
    }
    digits.reverse();
    let mut out: String = digits.into_iter().collect();
    if frac > 0.0 {
        out.push('.');
        for _ in 0..20 {
            if frac == 0.0 {
                break;
            }
            frac *= radix as f64;
            let d = frac.trunc() as u32;
            out.push(std::char::from_digit(d, radix).unwrap_or('0'));
            frac -= d as f64;
        }
    }
    if negative {
        out.insert(0, '-');
    }
    out
}

/// `toString(radix?)`, radix 2 through 36.
fn to_string(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    let n = receiver(this)?;
    let radix = match arg(args, 0) {
        JsValue::Undefined => 10.0,
        r => util::to_integer(r),
    };
    if !(2.0..=36.0).contains(&radix) {
        return Err(ExprError::InvalidArgument(
            "toString() radix must be between 2 and 36".to_string(),
        ));
    }
    if radix == 10.0 || !n.is_finite() {
        return Ok(JsValue::from(util::format_number(n)));
    }
    Ok(JsValue::from(to_radix_string(n, radix as u32)))
}

fn value_of(this: &JsValue, _args: &[JsValue]) -> Result<JsValue, ExprError> {
    Ok(JsValue::from(receiver(this)?))
}

pub fn methods() -> Vec<Arc<MethodDefinition>> {
    vec![
        Arc::new(MethodDefinition { name: "toFixed", aliases: &[], eval_fn: to_fixed }),
        Arc::new(MethodDefinition { name: "toString", aliases: &[], eval_fn: to_string }),
        Arc::new(MethodDefinition { name: "valueOf", aliases: &[], eval_fn: value_of }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_and_radix() {
        assert_eq!(to_fixed(&JsValue::from(2.345), &[JsValue::from(1i64)]).unwrap(), JsValue::from("2.3"));
        assert_eq!(to_fixed(&JsValue::from(7i64), &[]).unwrap(), JsValue::from("7"));
        assert_eq!(to_string(&JsValue::from(255i64), &[JsValue::from(16i64)]).unwrap(), JsValue::from("ff"));
        assert_eq!(to_string(&JsValue::from(-5i64), &[JsValue::from(2i64)]).unwrap(), JsValue::from("-101"));
        assert_eq!(to_string(&JsValue::from(1.5), &[]).unwrap(), JsValue::from("1.5"));
        assert!(to_string(&JsValue::from(1i64), &[JsValue::from(1i64)]).is_err());
        assert!(to_fixed(&JsValue::from("x"), &[]).is_err());
    }
}
