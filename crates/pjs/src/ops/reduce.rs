use crate::builtins::Builtin;
use crate::error::PipelineError;
use crate::operator::{Operator, Sink};
use crate::sentinel::{decode, Record};
use pjs_expression::util::to_display_string;
use pjs_expression::{CompiledReducer, JsValue, ReducerContext};
use serde_json::Value;

enum Reduction {
    Builtin(Builtin),
    Fold(CompiledReducer),
}

/// Buffers every record and emits one folded result at end of input.
pub struct ReduceOp {
    reduction: Reduction,
    output_as_text: bool,
    accumulator: Vec<Value>,
}

impl ReduceOp {
    /// `expression` is either a [`Builtin`] name or a fold step over
    /// `prev` and `curr`.
    pub fn new(expression: &str, output_as_text: bool) -> Result<Self, PipelineError> {
        let reduction = match Builtin::from_name(expression) {
            Some(builtin) => Reduction::Builtin(builtin),
            None => Reduction::Fold(CompiledReducer::compile(expression)?),
        };
        log::debug!("reduce `{}`", expression);
        Ok(ReduceOp {
            reduction,
            output_as_text,
            accumulator: Vec::new(),
        })
    }

    fn reduce(&self, items: Vec<Value>) -> Result<JsValue, PipelineError> {
        let reducer = match &self.reduction {
            Reduction::Builtin(builtin) => {
                log::debug!("reduce: builtin {} over {} records", builtin, items.len());
                return builtin.apply(&items);
            }
            Reduction::Fold(reducer) => reducer,
        };
        log::debug!("reduce: folding {} records", items.len());
        let Some(first) = items.first() else {
            return Err(PipelineError::empty_sequence("reduce"));
        };
        let mut previous = JsValue::Json(first.clone());
        let sequence = JsValue::Json(Value::Array(items.clone()));
        for (index, item) in items.into_iter().enumerate().skip(1) {
            let current = JsValue::Json(item);
            previous = reducer.evaluate(&ReducerContext {
                previous: &previous,
                current: &current,
                index,
                sequence: &sequence,
            })?;
        }
        Ok(previous)
    }
}

impl Operator for ReduceOp {
    fn name(&self) -> &'static str {
        "reduce"
    }

    fn transform(&mut self, record: Record, _out: &mut dyn Sink) -> Result<(), PipelineError> {
        self.accumulator.push(decode(record));
        Ok(())
    }

    fn flush(&mut self, out: &mut dyn Sink) -> Result<(), PipelineError> {
        let items = std::mem::take(&mut self.accumulator);
        let result = self.reduce(items)?;
        let record = if self.output_as_text {
            Record::text(format!("{}\n", to_display_string(&result)))
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

    fn run(expression: &str, text: bool, input: Value) -> Result<Vec<Record>, PipelineError> {
        let mut op = ReduceOp::new(expression, text)?;
        let mut out = Vec::new();
        if let Value::Array(items) = input {
            for item in items {
                op.transform(Record::from(item), &mut out)?;
                assert!(out.is_empty());
            }
        }
        op.flush(&mut out)?;
        Ok(out)
    }

    #[test]
    fn custom_folds() {
        assert_eq!(run("prev + curr", false, json!([1, 2, 3])).unwrap(), vec![Record::Value(json!(6))]);
        assert_eq!(run("3 * array[i]", false, json!([1, 2, 3])).unwrap(), vec![Record::Value(json!(9))]);
        assert_eq!(run("prev + curr", false, json!(["a"])).unwrap(), vec![Record::text("a")]);
    }

    #[test]
    fn sentinel_elements_fold_as_null() {
        assert_eq!(run("prev === null ? curr : prev", false, json!([null, 4])).unwrap(), vec![Record::Value(json!(4))]);
        assert_eq!(run("null", false, json!([1, 2])).unwrap(), vec![Record::Null]);
    }

    #[test]
    fn text_output() {
        assert_eq!(run("sum", true, json!(["1", "2"])).unwrap(), vec![Record::text("3\n")]);
        assert_eq!(run("null", true, json!([1, 2])).unwrap(), vec![Record::text("null\n")]);
    }

    #[test]
    fn empty_input() {
        assert!(matches!(run("prev + curr", false, json!([])), Err(PipelineError::EmptySequence { .. })));
        assert!(matches!(run("min", false, json!([])), Err(PipelineError::EmptySequence { .. })));
        assert_eq!(run("length", false, json!([])).unwrap(), vec![Record::Value(json!(0))]);
    }
}
