//! The five streaming operators and their factories.

mod filter;
mod ignore_blank;
mod map;
mod reduce;
mod serialize;

pub use filter::FilterOp;
pub use ignore_blank::IgnoreBlankOp;
pub use map::MapOp;
pub use reduce::ReduceOp;
pub use serialize::{to_document, SerializeOp};

use crate::error::PipelineError;
use pjs_expression::Snippet;

fn snippet(code: &str, output_as_text: bool, explicit_binding: bool) -> Snippet {
    Snippet::new(code)
        .with_output_as_text(output_as_text)
        .with_explicit_binding(explicit_binding)
}

pub fn make_filter(code: &str, output_as_text: bool, explicit_binding: bool) -> Result<FilterOp, PipelineError> {
    FilterOp::new(&snippet(code, output_as_text, explicit_binding))
}

pub fn make_map(code: &str, output_as_text: bool, explicit_binding: bool) -> Result<MapOp, PipelineError> {
    MapOp::new(&snippet(code, output_as_text, explicit_binding))
}

pub fn make_reduce(expression: &str, output_as_text: bool) -> Result<ReduceOp, PipelineError> {
    ReduceOp::new(expression, output_as_text)
}

pub fn make_ignore_blank(ignore_all_blanks: bool) -> IgnoreBlankOp {
    IgnoreBlankOp::new(ignore_all_blanks)
}

pub fn make_serialize(stream_array_mode: bool) -> SerializeOp {
    SerializeOp::new(stream_array_mode)
}
