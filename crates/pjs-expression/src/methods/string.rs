//! String methods. Positions count Unicode scalar values.

use crate::error::ExprError;
use crate::types::{arg, JsValue, MethodDefinition};
use crate::util;
use regex::Regex;
use serde_json::Value;
use std::cmp::Ordering;
use std::sync::Arc;

/// Longest string a method may build, in characters (V8's limit).
const MAX_STRING_LENGTH: usize = (1 << 29) - 24;

fn invalid_length() -> ExprError {
    ExprError::InvalidArgument("Invalid string length".to_string())
}

fn chars(this: &JsValue) -> Result<Vec<char>, ExprError> {
    Ok(util::as_str(this)?.chars().collect())
}

fn string_arg(args: &[JsValue], n: usize) -> String {
    util::to_display_string(arg(args, n))
}

/// Index of `needle` in `hay` at or after `from`.
fn find_chars(hay: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.is_empty() {
        return Some(from.min(hay.len()));
    }
    if needle.len() > hay.len() {
        return None;
    }
    (from..=hay.len() - needle.len()).find(|&i| hay[i..i + needle.len()] == *needle)
}

fn rfind_chars(hay: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.len() > hay.len() {
        return None;
    }
    let last = (hay.len() - needle.len()).min(from);
    (0..=last).rev().find(|&i| hay[i..i + needle.len()] == *needle)
}

fn regex_arg(args: &[JsValue]) -> Result<Regex, ExprError> {
    let pattern = match arg(args, 0) {
        JsValue::Undefined => String::new(),
        other => util::to_display_string(other),
    };
    Regex::new(&pattern).map_err(|e| ExprError::InvalidRegex(e.to_string()))
}

fn char_index(s: &str, byte_offset: usize) -> usize {
    s[..byte_offset].chars().count()
}

fn at(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    let s = chars(this)?;
    let i = util::to_integer(arg(args, 0));
    let i = if i < 0.0 { s.len() as f64 + i } else { i };
    if i < 0.0 || i >= s.len() as f64 {
        return Ok(JsValue::Undefined);
    }
    Ok(JsValue::from(s[i as usize].to_string()))
}

fn char_at(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    let s = chars(this)?;
    let i = util::to_integer(arg(args, 0));
    if i < 0.0 || i >= s.len() as f64 {
        return Ok(JsValue::from(""));
    }
    Ok(JsValue::from(s[i as usize].to_string()))
}

fn char_code_at(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    let s = chars(this)?;
    let i = util::to_integer(arg(args, 0));
    if i < 0.0 || i >= s.len() as f64 {
        return Ok(JsValue::NonFinite(f64::NAN));
    }
    Ok(JsValue::from(s[i as usize] as u32 as i64))
}

fn code_point_at(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    let s = chars(this)?;
    let i = util::to_integer(arg(args, 0));
    if i < 0.0 || i >= s.len() as f64 {
        return Ok(JsValue::Undefined);
    }
    Ok(JsValue::from(s[i as usize] as u32 as i64))
}

fn concat(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    let mut s = util::as_str(this)?.to_string();
    for a in args {
        s.push_str(&util::to_display_string(a));
    }
    Ok(JsValue::from(s))
}

fn ends_with(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    let s = chars(this)?;
    let search: Vec<char> = string_arg(args, 0).chars().collect();
    let end = match arg(args, 1) {
        JsValue::Undefined => s.len(),
        pos => util::relative_index(util::to_integer(pos).max(0.0), s.len()),
    };
    Ok(JsValue::from(s[..end].ends_with(&search)))
}

fn includes(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    let s = chars(this)?;
    let search: Vec<char> = string_arg(args, 0).chars().collect();
    let from = util::relative_index(util::to_integer(arg(args, 1)).max(0.0), s.len());
    Ok(JsValue::from(find_chars(&s, &search, from).is_some()))
}

fn index_of(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    let s = chars(this)?;
    let search: Vec<char> = string_arg(args, 0).chars().collect();
    let from = util::relative_index(util::to_integer(arg(args, 1)).max(0.0), s.len());
    Ok(match find_chars(&s, &search, from) {
        Some(i) => JsValue::from(i),
        None => JsValue::from(-1i64),
    })
}

fn last_index_of(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    let s = chars(this)?;
    let search: Vec<char> = string_arg(args, 0).chars().collect();
    let from = match util::to_number(arg(args, 1)) {
        n if n.is_nan() => s.len(),
        n => util::relative_index(n.trunc().max(0.0), s.len()),
    };
    Ok(match rfind_chars(&s, &search, from) {
        Some(i) => JsValue::from(i),
        None => JsValue::from(-1i64),
    })
}

fn locale_compare(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    let s = util::as_str(this)?;
    let other = string_arg(args, 0);
    Ok(JsValue::from(match s.cmp(other.as_str()) {
        Ordering::Less => -1i64,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }))
}

/// `match(pattern)`: the first match and its groups, or `null`.
fn match_(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    let s = util::as_str(this)?;
    let re = regex_arg(args)?;
    Ok(match re.captures(s) {
        Some(caps) => JsValue::Json(Value::Array(
            caps.iter()
                .map(|m| m.map(|m| Value::String(m.as_str().to_string())).unwrap_or(Value::Null))
                .collect(),
        )),
        None => JsValue::Json(Value::Null),
    })
}

fn search(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    let s = util::as_str(this)?;
    let re = regex_arg(args)?;
    Ok(match re.find(s) {
        Some(m) => JsValue::from(char_index(s, m.start())),
        None => JsValue::from(-1i64),
    })
}

fn pad(this: &JsValue, args: &[JsValue], at_start: bool) -> Result<JsValue, ExprError> {
    let s = util::as_str(this)?;
    let len = s.chars().count();
    let target = util::to_integer(arg(args, 0));
    let filler = match arg(args, 1) {
        JsValue::Undefined => " ".to_string(),
        other => util::to_display_string(other),
    };
    if target <= len as f64 || filler.is_empty() {
        return Ok(JsValue::from(s));
    }
    if target > MAX_STRING_LENGTH as f64 {
        return Err(invalid_length());
    }
    let fill: String = filler.chars().cycle().take(target as usize - len).collect();
    Ok(JsValue::from(if at_start {
        format!("{}{}", fill, s)
    } else {
        format!("{}{}", s, fill)
    }))
}

fn pad_end(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    pad(this, args, false)
}

fn pad_start(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    pad(this, args, true)
}

fn repeat(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    let s = util::as_str(this)?;
    let count = util::to_integer(arg(args, 0));
    if count < 0.0 || count.is_infinite() {
        return Err(ExprError::InvalidArgument(format!(
            "Invalid count value: {}",
            util::format_number(count)
        )));
    }
    match s.chars().count().checked_mul(count as usize) {
        Some(total) if total <= MAX_STRING_LENGTH => Ok(JsValue::from(s.repeat(count as usize))),
        _ => Err(invalid_length()),
    }
}

fn replace(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    let s = util::as_str(this)?;
    let pattern = string_arg(args, 0);
    let replacement = string_arg(args, 1);
    Ok(JsValue::from(s.replacen(pattern.as_str(), &replacement, 1)))
}

fn replace_all(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    let s = util::as_str(this)?;
    let pattern = string_arg(args, 0);
    let replacement = string_arg(args, 1);
    if pattern.is_empty() {
        // An empty pattern matches between every character.
        let mut out = replacement.clone();
        for c in s.chars() {
            out.push(c);
            out.push_str(&replacement);
        }
        return Ok(JsValue::from(out));
    }
    Ok(JsValue::from(s.replace(pattern.as_str(), &replacement)))
}

fn slice(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    let s = chars(this)?;
    let start = util::relative_index(util::to_integer(arg(args, 0)), s.len());
    let end = match arg(args, 1) {
        JsValue::Undefined => s.len(),
        e => util::relative_index(util::to_integer(e), s.len()),
    };
    if start >= end {
        return Ok(JsValue::from(""));
    }
    Ok(JsValue::from(s[start..end].iter().collect::<String>()))
}

fn split(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    let s = util::as_str(this)?;
    let limit = match arg(args, 1) {
        JsValue::Undefined => usize::MAX,
        l => util::to_integer(l).max(0.0) as usize,
    };
    let parts: Vec<String> = match arg(args, 0) {
        JsValue::Undefined => vec![s.to_string()],
        sep => {
            let sep = util::to_display_string(sep);
            if sep.is_empty() {
                s.chars().map(|c| c.to_string()).collect()
            } else {
                s.split(sep.as_str()).map(str::to_string).collect()
            }
        }
    };
    Ok(JsValue::Json(Value::Array(
        parts.into_iter().take(limit).map(Value::String).collect(),
    )))
}

fn starts_with(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    let s = chars(this)?;
    let search: Vec<char> = string_arg(args, 0).chars().collect();
    let from = util::relative_index(util::to_integer(arg(args, 1)).max(0.0), s.len());
    Ok(JsValue::from(s[from..].starts_with(&search)))
}

/// `substr(start, length)`: start may be negative, length defaults to the rest.
fn substr(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    let s = chars(this)?;
    let start = util::relative_index(util::to_integer(arg(args, 0)), s.len());
    let count = match arg(args, 1) {
        JsValue::Undefined => s.len() - start,
        l => util::to_integer(l).max(0.0).min((s.len() - start) as f64) as usize,
    };
    Ok(JsValue::from(s[start..start + count].iter().collect::<String>()))
}

/// `substring(start, end)`: negatives clamp to zero and the bounds swap if reversed.
fn substring(this: &JsValue, args: &[JsValue]) -> Result<JsValue, ExprError> {
    let s = chars(this)?;
    let clamp = |v: &JsValue| util::to_integer(v).max(0.0).min(s.len() as f64) as usize;
    let start = clamp(arg(args, 0));
    let end = match arg(args, 1) {
        JsValue::Undefined => s.len(),
        e => clamp(e),
    };
    let (from, to) = if start <= end { (start, end) } else { (end, start) };
    Ok(JsValue::from(s[from..to].iter().collect::<String>()))
}

fn to_lower_case(this: &JsValue, _args: &[JsValue]) -> Result<JsValue, ExprError> {
    Ok(JsValue::from(util::as_str(this)?.to_lowercase()))
}

fn to_upper_case(this: &JsValue, _args: &[JsValue]) -> Result<JsValue, ExprError> {
    Ok(JsValue::from(util::as_str(this)?.to_uppercase()))
}

fn to_string(this: &JsValue, _args: &[JsValue]) -> Result<JsValue, ExprError> {
    Ok(JsValue::from(util::as_str(this)?))
}

fn trim(this: &JsValue, _args: &[JsValue]) -> Result<JsValue, ExprError> {
    Ok(JsValue::from(util::as_str(this)?.trim()))
}

fn trim_start(this: &JsValue, _args: &[JsValue]) -> Result<JsValue, ExprError> {
    Ok(JsValue::from(util::as_str(this)?.trim_start()))
}

fn trim_end(this: &JsValue, _args: &[JsValue]) -> Result<JsValue, ExprError> {
    Ok(JsValue::from(util::as_str(this)?.trim_end()))
}

pub fn methods() -> Vec<Arc<MethodDefinition>> {
    vec![
        Arc::new(MethodDefinition { name: "at", aliases: &[], eval_fn: at }),
        Arc::new(MethodDefinition { name: "charAt", aliases: &[], eval_fn: char_at }),
        Arc::new(MethodDefinition { name: "charCodeAt", aliases: &[], eval_fn: char_code_at }),
        Arc::new(MethodDefinition { name: "codePointAt", aliases: &[], eval_fn: code_point_at }),
        Arc::new(MethodDefinition { name: "concat", aliases: &[], eval_fn: concat }),
        Arc::new(MethodDefinition { name: "endsWith", aliases: &[], eval_fn: ends_with }),
        Arc::new(MethodDefinition { name: "includes", aliases: &[], eval_fn: includes }),
        Arc::new(MethodDefinition { name: "indexOf", aliases: &[], eval_fn: index_of }),
        Arc::new(MethodDefinition { name: "lastIndexOf", aliases: &[], eval_fn: last_index_of }),
        Arc::new(MethodDefinition { name: "localeCompare", aliases: &[], eval_fn: locale_compare }),
        Arc::new(MethodDefinition { name: "match", aliases: &[], eval_fn: match_ }),
        Arc::new(MethodDefinition { name: "padEnd", aliases: &[], eval_fn: pad_end }),
        Arc::new(MethodDefinition { name: "padStart", aliases: &[], eval_fn: pad_start }),
        Arc::new(MethodDefinition { name: "repeat", aliases: &[], eval_fn: repeat }),
        Arc::new(MethodDefinition { name: "replace", aliases: &[], eval_fn: replace }),
        Arc::new(MethodDefinition { name: "replaceAll", aliases: &[], eval_fn: replace_all }),
        Arc::new(MethodDefinition { name: "search", aliases: &[], eval_fn: search }),
        Arc::new(MethodDefinition { name: "slice", aliases: &[], eval_fn: slice }),
        Arc::new(MethodDefinition { name: "split", aliases: &[], eval_fn: split }),
        Arc::new(MethodDefinition { name: "startsWith", aliases: &[], eval_fn: starts_with }),
        Arc::new(MethodDefinition { name: "substr", aliases: &[], eval_fn: substr }),
        Arc::new(MethodDefinition { name: "substring", aliases: &[], eval_fn: substring }),
        Arc::new(MethodDefinition { name: "toLowerCase", aliases: &["toLocaleLowerCase"], eval_fn: to_lower_case }),
        Arc::new(MethodDefinition { name: "toUpperCase", aliases: &["toLocaleUpperCase"], eval_fn: to_upper_case }),
        Arc::new(MethodDefinition { name: "toString", aliases: &["valueOf"], eval_fn: to_string }),
        Arc::new(MethodDefinition { name: "trim", aliases: &[], eval_fn: trim }),
        Arc::new(MethodDefinition { name: "trimStart", aliases: &["trimLeft"], eval_fn: trim_start }),
        Arc::new(MethodDefinition { name: "trimEnd", aliases: &["trimRight"], eval_fn: trim_end }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(f: crate::types::MethodFn, this: &str, args: &[JsValue]) -> JsValue {
        f(&JsValue::from(this), args).unwrap()
    }

    #[test]
    fn positions() {
        assert_eq!(call(index_of, "foobar", &["b".into()]), JsValue::from(3i64));
        assert_eq!(call(index_of, "foobar", &["z".into()]), JsValue::from(-1i64));
        assert_eq!(call(last_index_of, "abab", &["b".into()]), JsValue::from(3i64));
        assert_eq!(call(char_at, "héllo", &[JsValue::from(1i64)]), JsValue::from("é"));
        assert_eq!(call(char_at, "abc", &[JsValue::from(9i64)]), JsValue::from(""));
        assert_eq!(call(at, "abc", &[JsValue::from(-1i64)]), JsValue::from("c"));
    }

    #[test]
    fn slicing() {
        assert_eq!(call(slice, "foobar", &[JsValue::from(1i64), JsValue::from(-2i64)]), JsValue::from("oob"));
        assert_eq!(call(substr, "foobar", &[JsValue::from(-3i64), JsValue::from(2i64)]), JsValue::from("ba"));
        assert_eq!(call(substring, "foobar", &[JsValue::from(4i64), JsValue::from(1i64)]), JsValue::from("oob"));
        assert_eq!(call(substr, "foo", &[JsValue::from(1i64)]), JsValue::from("oo"));
    }

    #[test]
    fn split_and_replace() {
        assert_eq!(call(split, "a,b,c", &[",".into()]), JsValue::Json(json!(["a", "b", "c"])));
        assert_eq!(call(split, "abc", &["".into(), JsValue::from(2i64)]), JsValue::Json(json!(["a", "b"])));
        assert_eq!(call(replace, "a.a.a", &[".".into(), "-".into()]), JsValue::from("a-a.a"));
        assert_eq!(call(replace_all, "a.a.a", &[".".into(), "-".into()]), JsValue::from("a-a-a"));
    }

    #[test]
    fn regular_expressions() {
        assert_eq!(
            call(match_, "key=42", &[r"(\w+)=(\d+)".into()]),
            JsValue::Json(json!(["key=42", "key", "42"]))
        );
        assert_eq!(call(match_, "abc", &[r"\d".into()]), JsValue::Json(json!(null)));
        assert_eq!(call(search, "héllo", &["l+".into()]), JsValue::from(2i64));
        assert!(matches!(
            match_(&JsValue::from("x"), &["(".into()]),
            Err(ExprError::InvalidRegex(_))
        ));
    }

    #[test]
    fn padding_and_case() {
        assert_eq!(call(pad_start, "7", &[JsValue::from(3i64), "0".into()]), JsValue::from("007"));
        assert_eq!(call(pad_end, "ab", &[JsValue::from(5i64), "xy".into()]), JsValue::from("abxyx"));
        assert_eq!(call(to_upper_case, "foo", &[]), JsValue::from("FOO"));
        assert_eq!(call(trim, "  x ", &[]), JsValue::from("x"));
    }

    #[test]
    fn oversized_results_are_rejected() {
        let too_long = |r: Result<JsValue, ExprError>| {
            matches!(r, Err(ExprError::InvalidArgument(ref m)) if m == "Invalid string length")
        };
        let ab = JsValue::from("ab");
        assert!(too_long(repeat(&ab, &[JsValue::from(1e19)])));
        assert!(too_long(repeat(&ab, &[JsValue::from(MAX_STRING_LENGTH as i64)])));
        assert!(too_long(pad_start(&ab, &[JsValue::NonFinite(f64::INFINITY)])));
        assert!(too_long(pad_end(&ab, &[JsValue::from(1e15), "x".into()])));
        assert!(matches!(repeat(&ab, &[JsValue::NonFinite(f64::INFINITY)]), Err(ExprError::InvalidArgument(_))));

        assert_eq!(call(repeat, "", &[JsValue::from(1e19)]), JsValue::from(""));
        assert_eq!(call(repeat, "ab", &[JsValue::from(3i64)]), JsValue::from("ababab"));
        assert_eq!(call(pad_start, "ab", &[JsValue::from(1e15), "".into()]), JsValue::from("ab"));
    }

    #[test]
    fn non_string_receiver_is_rejected() {
        assert!(trim(&JsValue::from(1i64), &[]).is_err());
    }
}
