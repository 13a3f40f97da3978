use crate::error::PipelineError;
use crate::operator::{Operator, Sink};
use crate::sentinel::Record;
use pjs_expression::util::{is_truthy, to_display_string};
use pjs_expression::{BindingContext, CompiledExpression, Snippet};

/// Forwards the records whose predicate is truthy.
pub struct FilterOp {
    expr: CompiledExpression,
    index: usize,
}

impl FilterOp {
    pub fn new(snippet: &Snippet) -> Result<Self, PipelineError> {
        log::debug!("filter `{}`", snippet.code);
        Ok(FilterOp {
            expr: CompiledExpression::compile(snippet)?,
            index: 0,
        })
    }
}

impl Operator for FilterOp {
    fn name(&self) -> &'static str {
        "filter"
    }

    fn transform(&mut self, record: Record, out: &mut dyn Sink) -> Result<(), PipelineError> {
        let index = self.index;
        self.index += 1;
        let value = record.into_js();
        let keep = is_truthy(&self.expr.evaluate(&BindingContext { value: &value, index })?);
        log::trace!("filter #{}: {}", index, if keep { "kept" } else { "dropped" });
        if !keep {
            return Ok(());
        }
        let record = if self.expr.snippet().output_as_text {
            Record::text(format!("{}\n", to_display_string(&value)))
        } else {
            Record::from_js(value)
        };
        out.push(record)
    }
}
