//! Record to `Document` decoding

use chrono::{DateTime, Utc};
use finnews_common::{Document, Meta};
use serde_json::{json, Map, Value};
use tracing::debug;

use super::jsonl::RawRecord;
use super::timestamp::TimestampPolicy;

/// Keys consulted for the body text, in order of preference
pub const BODY_FIELDS: [&str; 4] = ["text", "raw_text", "content", "body"];

/// Turns raw records into documents.
///
/// The clock is sampled once, when the decoder is created, and every document
/// of the batch shares it as `fetched_at` and `processed_at`.
#[derive(Debug, Clone)]
pub struct RecordDecoder {
    batch_started_at: DateTime<Utc>,
    policy: TimestampPolicy,
}

impl RecordDecoder {
    pub fn new(policy: TimestampPolicy) -> Self {
        Self::with_clock(Utc::now(), policy)
    }

    /// Decoder with a pinned batch start
    pub fn with_clock(batch_started_at: DateTime<Utc>, policy: TimestampPolicy) -> Self {
        Self {
            batch_started_at,
            policy,
        }
    }

    pub fn batch_started_at(&self) -> DateTime<Utc> {
        self.batch_started_at
    }

    /// Decode one record; never fails, missing fields become empty strings
    pub fn decode(&self, record: RawRecord) -> Document {
        let fields = &record.fields;
        let mut meta = Meta::new();

        if let Some(line_no) = record.line_no {
            meta.insert("line_no".to_string(), json!(line_no));
        }

        let (body_field, raw_text) = match body(fields) {
            Some((key, value)) => (Some(key), coerce_string(Some(value))),
            None => (None, String::new()),
        };
        if let Some(key) = body_field.filter(|key| *key != BODY_FIELDS[0]) {
            meta.insert("body_field".to_string(), json!(key));
        }

        let published_raw = fields.get("published_at").filter(|v| !v.is_null());
        let published_at = published_raw.and_then(|value| self.policy.resolve(value));
        if let (Some(raw), None) = (published_raw, published_at) {
            debug!(line_no = ?record.line_no, value = %raw, "unusable published_at");
            meta.insert("published_at_raw".to_string(), raw.clone());
        }

        Document {
            source: coerce_string(fields.get("source")),
            url: coerce_string(fields.get("url")),
            title: coerce_string(fields.get("title")),
            raw_text,
            published_at,
            fetched_at: self.batch_started_at,
            processed_at: self.batch_started_at,
            meta,
        }
    }

    /// Lazily decode a sequence of records
    pub fn decode_all<'a, I>(&'a self, records: I) -> impl Iterator<Item = Document> + 'a
    where
        I: IntoIterator<Item = RawRecord>,
        I::IntoIter: 'a,
    {
        records.into_iter().map(move |record| self.decode(record))
    }
}

impl Default for RecordDecoder {
    fn default() -> Self {
        Self::new(TimestampPolicy::default())
    }
}

fn body(fields: &Map<String, Value>) -> Option<(&'static str, &Value)> {
    BODY_FIELDS
        .iter()
        .find_map(|&key| fields.get(key).filter(|v| !v.is_null()).map(|v| (key, v)))
}

/// String view of a JSON value, trimmed
fn coerce_string(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string().trim().to_string(),
    }
}
