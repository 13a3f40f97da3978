//! Record sources.

use crate::sentinel::Record;
use serde_json::Value;
use std::convert::Infallible;
use std::io::{self, BufRead};

/// Splits text on `\n` into text records. A trailing terminator leaves one
/// blank record at the end, for [`IgnoreBlankOp`](crate::ops::IgnoreBlankOp)
/// to drop.
pub fn split_lines(text: &str) -> Vec<Record> {
    text.split('\n').map(Record::text).collect()
}

/// Infallible source over in-memory values; `null` becomes the sentinel.
pub fn from_values<I>(values: I) -> impl Iterator<Item = Result<Record, Infallible>>
where
    I: IntoIterator<Item = Value>,
{
    values.into_iter().map(|v| Ok(Record::from(v)))
}

/// Streams `\n`-separated lines from a reader, with the same trailing-blank
/// behavior as [`split_lines`]. Invalid UTF-8 is an error.
pub struct Lines<R> {
    reader: R,
    buf: Vec<u8>,
    done: bool,
}

impl<R: BufRead> Lines<R> {
    pub fn new(reader: R) -> Self {
        Lines {
            reader,
            buf: Vec::new(),
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for Lines<R> {
    type Item = io::Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        self.buf.clear();
        if let Err(err) = self.reader.read_until(b'\n', &mut self.buf) {
            self.done = true;
            return Some(Err(err));
        }
        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
        } else {
            self.done = true;
        }
        match String::from_utf8(std::mem::take(&mut self.buf)) {
            Ok(line) => Some(Ok(Record::text(line))),
            Err(err) => {
                self.done = true;
                Some(Err(io::Error::new(io::ErrorKind::InvalidData, err)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn texts(items: &[&str]) -> Vec<Record> {
        items.iter().map(|s| Record::text(*s)).collect()
    }

    #[test]
    fn splitting_keeps_the_trailing_blank() {
        assert_eq!(split_lines("a\n\nc\n"), texts(&["a", "", "c", ""]));
        assert_eq!(split_lines(""), texts(&[""]));
    }

    #[test]
    fn reader_lines_match_split_lines() {
        for text in ["a\n\nc\n", "a\nb", "", "\n"] {
            let lines: Vec<Record> = Lines::new(text.as_bytes()).map(Result::unwrap).collect();
            assert_eq!(lines, split_lines(text), "text: {:?}", text);
        }
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        let bytes: &[u8] = b"ok\n\xff\n";
        let items: Vec<_> = Lines::new(bytes).collect();
        assert!(items[0].is_ok());
        assert_eq!(items[1].as_ref().unwrap_err().kind(), io::ErrorKind::InvalidData);
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn values_encode_null() {
        let records: Vec<Record> = from_values(vec![json!(1), json!(null)]).map(Result::unwrap).collect();
        assert_eq!(records, vec![Record::Value(json!(1)), Record::Null]);
    }
}
