//! Ingestion orchestration
//!
//! Composes the decoder and the store and reports the batch outcome together
//! with the store's total row count.

use finnews_common::IngestResult;
use serde::Serialize;
use std::io::BufRead;
use std::path::Path;
use tracing::{info, instrument};

use crate::decode::{JsonlRecords, RawRecord, RecordDecoder, TimestampPolicy};
use crate::error::Result;
use crate::storage::DocumentStore;

/// Outcome of one ingestion run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    #[serde(flatten)]
    pub result: IngestResult,

    /// Input lines dropped before decoding
    pub malformed_records: u64,

    /// Rows in the store after the batch
    pub total_documents: u64,
}

impl std::fmt::Display for IngestReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} SkippedMalformed={} TotalInDB={}",
            self.result, self.malformed_records, self.total_documents
        )
    }
}

/// Ingest already-structured records
pub fn ingest_records<I>(
    store: &DocumentStore,
    decoder: &RecordDecoder,
    records: I,
) -> Result<IngestReport>
where
    I: IntoIterator<Item = RawRecord>,
{
    let result = store.ingest_documents(decoder.decode_all(records))?;

    Ok(IngestReport {
        result,
        malformed_records: 0,
        total_documents: store.count_documents()?,
    })
}

/// Ingest every record of a JSONL source.
///
/// A read error aborts the batch; nothing from it is kept.
pub fn ingest_jsonl<R: BufRead>(
    store: &DocumentStore,
    decoder: &RecordDecoder,
    mut records: JsonlRecords<R>,
) -> Result<IngestReport> {
    let documents = records
        .by_ref()
        .map(|record| record.map(|record| decoder.decode(record)));
    let result = store.try_ingest_documents(documents)?;

    let report = IngestReport {
        result,
        malformed_records: records.malformed_lines(),
        total_documents: store.count_documents()?,
    };

    info!(
        lines = records.lines_read(),
        malformed = report.malformed_records,
        total_documents = report.total_documents,
        "Ingestion finished"
    );
    Ok(report)
}

/// Ingest JSONL from any buffered reader
pub fn ingest_reader<R: BufRead>(
    store: &DocumentStore,
    decoder: &RecordDecoder,
    reader: R,
) -> Result<IngestReport> {
    ingest_jsonl(store, decoder, JsonlRecords::new(reader))
}

/// Ingest a JSONL file with a decoder started now
#[instrument(skip(store), fields(db = %store.db_path().display()))]
pub fn ingest_jsonl_file(
    store: &DocumentStore,
    path: &Path,
    policy: TimestampPolicy,
) -> Result<IngestReport> {
    let records = JsonlRecords::open(path)?;
    let decoder = RecordDecoder::new(policy);

    ingest_jsonl(store, &decoder, records)
}
