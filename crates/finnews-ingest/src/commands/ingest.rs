//! `finnews-ingest ingest` command implementation

use std::path::Path;
use tracing::info;

use super::{display_path, open_store};
use crate::config::IngestConfig;
use crate::decode::{JsonlRecords, RecordDecoder};
use crate::error::Result;
use crate::pipeline::{self, IngestReport};

/// Ingest a JSONL file and print the report to stdout
pub fn run(config: &IngestConfig, input: &Path, json: bool) -> Result<()> {
    // The input is checked before the database is touched
    let records = JsonlRecords::open(input)?;
    let store = open_store(config)?;
    let decoder = RecordDecoder::new(config.timestamp_policy);

    info!(
        input = %input.display(),
        db = %store.db_path().display(),
        batch_started_at = %decoder.batch_started_at(),
        "Starting ingestion"
    );

    let report = pipeline::ingest_jsonl(&store, &decoder, records)?;
    println!("{}", render(&report, &display_path(store.db_path()), json)?);

    Ok(())
}

fn render(report: &IngestReport, db: &Path, json: bool) -> Result<String> {
    if json {
        let mut value = serde_json::to_value(report)?;
        value["db"] = serde_json::Value::String(db.display().to_string());
        Ok(serde_json::to_string(&value)?)
    } else {
        Ok(format!("{} DB={}", report, db.display()))
    }
}
