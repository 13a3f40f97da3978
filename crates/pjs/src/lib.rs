//! Record-stream operators driven by pjs expression snippets.
//!
//! Records flow through push [`Operator`]s: filter and map evaluate a
//! snippet per record, reduce buffers everything and folds it at end of
//! input, and the blank-line and serialization stages shape text output.
//! A literal `null` travels as [`Record::Null`], so it is never confused
//! with end of stream.
//!
//! # Example
//!
//! ```
//! use pjs::{source, Pipeline, PipelineConfig, Record};
//!
//! let config = PipelineConfig {
//!     filter: Some("length === 3".into()),
//!     map: Some("toUpperCase()".into()),
//!     ..Default::default()
//! };
//! let mut pipeline = config.build().unwrap();
//! let mut out = Vec::new();
//! let lines = source::split_lines("a\nfoo\nbar\n");
//! pipeline.run(lines.into_iter().map(Ok::<_, std::convert::Infallible>), &mut out).unwrap();
//!
//! assert_eq!(out, vec![Record::text("FOO"), Record::text("BAR")]);
//! ```

pub mod builtins;
pub mod config;
pub mod error;
pub mod operator;
pub mod ops;
pub mod pipeline;
pub mod sentinel;
pub mod source;

pub use builtins::Builtin;
pub use config::PipelineConfig;
pub use error::PipelineError;
pub use operator::{Operator, Sink, WriteSink};
pub use ops::{make_filter, make_ignore_blank, make_map, make_reduce, make_serialize};
pub use pipeline::Pipeline;
pub use sentinel::{decode, encode, Record};
