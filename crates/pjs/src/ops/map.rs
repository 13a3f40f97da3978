use crate::error::PipelineError;
use crate::operator::{Operator, Sink};
use crate::sentinel::Record;
use pjs_expression::util::inspect;
use pjs_expression::{BindingContext, CompiledExpression, JsValue, Snippet};
use serde_json::Value;

/// Replaces every record with the value of its expression.
pub struct MapOp {
    expr: CompiledExpression,
    index: usize,
}

impl MapOp {
    pub fn new(snippet: &Snippet) -> Result<Self, PipelineError> {
        log::debug!("map `{}`", snippet.code);
        Ok(MapOp {
            expr: CompiledExpression::compile(snippet)?,
            index: 0,
        })
    }
}

/// Strings verbatim, everything else in structural display form.
fn display(value: &JsValue) -> String {
    match value {
        JsValue::Json(Value::String(s)) => s.clone(),
        other => inspect(other),
    }
}

impl Operator for MapOp {
    fn name(&self) -> &'static str {
        "map"
    }

    fn transform(&mut self, record: Record, out: &mut dyn Sink) -> Result<(), PipelineError> {
        let index = self.index;
        self.index += 1;
        let value = record.into_js();
        let result = self.expr.evaluate(&BindingContext { value: &value, index })?;
        let record = if self.expr.snippet().output_as_text {
            Record::text(format!("{}\n", display(&result)))
        } else {
            Record::from_js(result)
        };
        out.push(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(snippet: Snippet, input: Vec<Record>) -> Vec<Record> {
        let mut op = MapOp::new(&snippet).unwrap();
        let mut out = Vec::new();
        for r in input {
            op.transform(r, &mut out).unwrap();
        }
        out
    }

    #[test]
    fn null_results_are_records() {
        let out = run(Snippet::new("null"), vec![Record::text("a"), Record::text("b")]);
        assert_eq!(out, vec![Record::Null, Record::Null]);
    }

    #[test]
    fn text_output_uses_display_form() {
        let out = run(
            Snippet::new("[$, i]").with_output_as_text(true),
            vec![Record::text("a"), Record::Value(json!(null))],
        );
        assert_eq!(out, vec![Record::text("[ 'a', 0 ]\n"), Record::text("[ null, 1 ]\n")]);

        let out = run(Snippet::new("{n: length}").with_output_as_text(true), vec![Record::text("ab")]);
        assert_eq!(out, vec![Record::text("{ n: 2 }\n")]);
    }
}
