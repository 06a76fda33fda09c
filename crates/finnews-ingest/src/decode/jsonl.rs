//! JSONL record source
//!
//! One JSON object per line. Blank lines are ignored; lines that do not hold a
//! JSON object are skipped and counted. Read failures are returned as errors.

use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::warn;

use crate::error::{IngestError, Result};

/// One already-structured external record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    /// 1-based line in the originating file, if any
    pub line_no: Option<u64>,
    pub fields: Map<String, Value>,
}

impl RawRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self {
            line_no: None,
            fields,
        }
    }

    pub fn at_line(mut self, line_no: u64) -> Self {
        self.line_no = Some(line_no);
        self
    }

    /// Wrap a JSON value; only objects are records
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self::new(fields)),
            _ => None,
        }
    }
}

/// Iterator over the records of a JSONL stream
pub struct JsonlRecords<R> {
    reader: R,
    buf: String,
    line_no: u64,
    malformed: u64,
}

impl JsonlRecords<BufReader<File>> {
    /// Open a JSONL file, failing with [`IngestError::InputNotFound`] if absent
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(IngestError::InputNotFound(path.display().to_string()));
        }
        Ok(Self::new(BufReader::new(File::open(path)?)))
    }
}

impl<R: BufRead> JsonlRecords<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
            line_no: 0,
            malformed: 0,
        }
    }

    /// Lines skipped so far because they were not JSON objects
    pub fn malformed_lines(&self) -> u64 {
        self.malformed
    }

    pub fn lines_read(&self) -> u64 {
        self.line_no
    }
}

impl<R: BufRead> Iterator for JsonlRecords<R> {
    type Item = Result<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => self.line_no += 1,
                Err(e) => return Some(Err(e.into())),
            }

            let line = self.buf.trim_start_matches('\u{FEFF}').trim();
            if line.is_empty() {
                continue;
            }

            match serde_json::from_str::<Value>(line) {
                Ok(Value::Object(fields)) => {
                    return Some(Ok(RawRecord::new(fields).at_line(self.line_no)));
                }
                Ok(other) => {
                    self.malformed += 1;
                    warn!(
                        line_no = self.line_no,
                        kind = json_kind(&other),
                        "skipping line: not a JSON object"
                    );
                }
                Err(e) => {
                    self.malformed += 1;
                    warn!(line_no = self.line_no, error = %e, "skipping malformed JSON line");
                }
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Cursor;

    #[test]
    fn test_reads_objects_with_line_numbers() {
        let input = "{\"url\": \"https://a\"}\n\n   \n{\"url\": \"https://b\"}\n";
        let records: Vec<_> = JsonlRecords::new(Cursor::new(input))
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].line_no, Some(1));
        assert_eq!(records[0].fields["url"], json!("https://a"));
        assert_eq!(records[1].line_no, Some(4));
    }

    #[test]
    fn test_counts_malformed_and_non_object_lines() {
        let input = "{\"url\": \"https://a\"}\n{not json\n[1, 2]\n42\n\"text\"\n{\"url\": \"https://b\"}";
        let mut source = JsonlRecords::new(Cursor::new(input));
        let records: Vec<_> = source.by_ref().collect::<Result<_>>().unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].line_no, Some(6));
        assert_eq!(source.malformed_lines(), 4);
        assert_eq!(source.lines_read(), 6);
    }

    #[test]
    fn test_handles_crlf_and_leading_bom() {
        let input = "\u{FEFF}{\"title\": \"one\"}\r\n{\"title\": \"two\"}\r\n";
        let records: Vec<_> = JsonlRecords::new(Cursor::new(input))
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].fields["title"], json!("one"));
    }

    #[test]
    fn test_invalid_utf8_is_an_error() {
        let input: &[u8] = b"{\"title\": \"ok\"}\n\xff\xfe\n";
        let results: Vec<_> = JsonlRecords::new(input).collect();

        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(IngestError::Io(_))));
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonlRecords::open(&dir.path().join("absent.jsonl"))
            .err()
            .unwrap();
        assert!(matches!(err, IngestError::InputNotFound(_)));
    }

    #[test]
    fn test_from_value_only_accepts_objects() {
        assert!(RawRecord::from_value(json!({"a": 1})).is_some());
        assert!(RawRecord::from_value(json!([1])).is_none());
        assert!(RawRecord::from_value(json!(null)).is_none());
    }
}
