//! Named reductions usable as a reduce expression.

use crate::error::PipelineError;
use pjs_expression::util::{to_display_string, to_number};
use pjs_expression::JsValue;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Length,
    Min,
    Max,
    Sum,
    Avg,
    Concat,
}

impl Builtin {
    pub const ALL: [Builtin; 6] = [
        Builtin::Length,
        Builtin::Min,
        Builtin::Max,
        Builtin::Sum,
        Builtin::Avg,
        Builtin::Concat,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Length => "length",
            Builtin::Min => "min",
            Builtin::Max => "max",
            Builtin::Sum => "sum",
            Builtin::Avg => "avg",
            Builtin::Concat => "concat",
        }
    }

    /// Matches the whole expression; `sum ` or `Sum` is not a builtin.
    pub fn from_name(name: &str) -> Option<Builtin> {
        Builtin::ALL.into_iter().find(|b| b.name() == name)
    }

    /// Applies the reduction to decoded records (`null` for the sentinel).
    ///
    /// `length` of nothing is `0`; every other builtin needs at least one
    /// element. `sum` and `concat` fold without a seed, so a lone element
    /// comes back as it is.
    pub fn apply(self, items: &[Value]) -> Result<JsValue, PipelineError> {
        if self == Builtin::Length {
            return Ok(JsValue::from(items.len()));
        }
        if items.is_empty() {
            return Err(PipelineError::empty_sequence(self.name()));
        }
        if let [only] = items {
            if matches!(self, Builtin::Sum | Builtin::Concat) {
                return Ok(JsValue::Json(only.clone()));
            }
        }
        Ok(match self {
            Builtin::Length => JsValue::from(items.len()),
            Builtin::Min => JsValue::from(extremum(items, |curr, best| curr < best)),
            Builtin::Max => JsValue::from(extremum(items, |curr, best| curr > best)),
            Builtin::Sum => JsValue::from(sum(items)),
            Builtin::Avg => JsValue::from(sum(items) / items.len() as f64),
            Builtin::Concat => JsValue::from(items.iter().map(text).collect::<String>()),
        })
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Builtin {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Builtin::from_name(s).ok_or_else(|| PipelineError::Config(format!("unknown builtin `{}`", s)))
    }
}

/// `Number(x)`; `null` reads as 0.
fn number(v: &Value) -> f64 {
    to_number(&JsValue::Json(v.clone()))
}

/// `String(x)`; `null` reads as "null".
fn text(v: &Value) -> String {
    to_display_string(&JsValue::Json(v.clone()))
}

/// Keeps the first element unless a later one compares strictly better, so
/// a `NaN` first element sticks and later ones are skipped.
fn extremum(items: &[Value], better: fn(f64, f64) -> bool) -> f64 {
    let mut best = number(&items[0]);
    for item in &items[1..] {
        let curr = number(item);
        if better(curr, best) {
            best = curr;
        }
    }
    best
}

fn sum(items: &[Value]) -> f64 {
    items.iter().map(number).sum()
}
