//! Null-sentinel codec.
//!
//! A literal `null` is ordinary data in a record stream, so it travels as
//! [`Record::Null`] rather than as a bare `Value::Null`. End of stream is a
//! separate signal ([`Operator::flush`](crate::operator::Operator::flush)),
//! never a value.

use pjs_expression::JsValue;
use serde_json::Value;

/// One unit of data flowing through a pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    /// Any non-null value.
    Value(Value),
    /// A legitimate `null`.
    Null,
}

/// Replaces a real `null` with the sentinel; every other value is kept as is.
pub fn encode(value: Value) -> Record {
    match value {
        Value::Null => Record::Null,
        other => Record::Value(other),
    }
}

/// Replaces the sentinel with a real `null`.
pub fn decode(record: Record) -> Value {
    match record {
        Record::Value(v) => v,
        Record::Null => Value::Null,
    }
}

impl Record {
    pub fn is_null(&self) -> bool {
        matches!(self, Record::Null)
    }

    /// Borrowing form of [`decode`]; `None` for the sentinel.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Record::Value(v) => Some(v),
            Record::Null => None,
        }
    }

    /// Encodes an evaluation result. `undefined` and non-finite numbers have
    /// no JSON form and become the sentinel.
    pub fn from_js(value: JsValue) -> Record {
        match value {
            JsValue::Json(v) => encode(v),
            JsValue::Undefined | JsValue::NonFinite(_) => Record::Null,
        }
    }

    /// The value a snippet sees for this record.
    pub fn into_js(self) -> JsValue {
        JsValue::Json(decode(self))
    }

    /// Text record, as produced by the text-output modes.
    pub fn text(s: impl Into<String>) -> Record {
        Record::Value(Value::String(s.into()))
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        encode(value)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        decode(record)
    }
}
