//! Record decoding
//!
//! - `jsonl`: line-delimited JSON record source
//! - `record`: raw record to `Document` conversion
//! - `timestamp`: `published_at` resolution policy

pub mod jsonl;
pub mod record;
pub mod timestamp;

pub use jsonl::{JsonlRecords, RawRecord};
pub use record::{RecordDecoder, BODY_FIELDS};
pub use timestamp::{EpochUnit, NaiveTimestamps, TimestampPolicy};
