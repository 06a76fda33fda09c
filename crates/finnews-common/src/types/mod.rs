//! Common types used across finnews

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::Result;

/// Auxiliary key/value data attached to a document (provenance, diagnostics).
///
/// A `BTreeMap` keeps keys sorted, and `serde_json` object values are sorted
/// too, so serializing the same logical content always yields the same text.
pub type Meta = BTreeMap<String, serde_json::Value>;

/// One decoded news item.
///
/// `url` is the dedup key: at most one stored row exists per url.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Short identifier of the origin feed (e.g. "cbr")
    pub source: String,

    /// Canonical identifying url
    pub url: String,

    /// Headline
    pub title: String,

    /// Body text prior to normalization
    pub raw_text: String,

    /// Publication instant with the offset it was published in, if known
    pub published_at: Option<DateTime<FixedOffset>>,

    /// Assigned by the decoder at batch start
    pub fetched_at: DateTime<Utc>,

    /// Assigned by the decoder at batch start
    pub processed_at: DateTime<Utc>,

    #[serde(default)]
    pub meta: Meta,
}

impl Document {
    /// Deterministic JSON encoding of `meta` (sorted keys, compact)
    pub fn meta_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.meta)?)
    }
}

/// Outcome counters for one ingestion batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestResult {
    pub inserted: u64,
    pub skipped_duplicates: u64,
    pub skipped_invalid: u64,
}

impl IngestResult {
    /// Number of documents the batch looked at
    pub fn total(&self) -> u64 {
        self.inserted + self.skipped_duplicates + self.skipped_invalid
    }
}

impl std::fmt::Display for IngestResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Inserted={} SkippedDuplicates={} SkippedInvalid={}",
            self.inserted, self.skipped_duplicates, self.skipped_invalid
        )
    }
}
