//! Finnews Ingest Library
//!
//! Ingests news documents from line-delimited JSON into a local SQLite store
//! with url-based deduplication.
//!
//! # Pipeline
//!
//! - **Decode**: JSONL lines become [`RawRecord`]s, then [`Document`]s
//!   ([`decode`])
//! - **Validate**: cheap structural gate ([`validate`])
//! - **Normalize**: canonical `norm_text` ([`normalize`])
//! - **Store**: one transaction per batch, duplicates skipped ([`storage`])
//! - **Report**: [`IngestReport`] with the batch counters and the row total
//!   ([`pipeline`])
//!
//! # Example
//!
//! ```no_run
//! use finnews_ingest::{pipeline, DocumentStore, TimestampPolicy};
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let store = DocumentStore::new("data/documents.db");
//!     store.init_schema()?;
//!
//!     let report = pipeline::ingest_jsonl_file(
//!         &store,
//!         Path::new("news.jsonl"),
//!         TimestampPolicy::default(),
//!     )?;
//!     println!("{}", report);
//!     Ok(())
//! }
//! ```
//!
//! [`Document`]: finnews_common::Document
#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod commands;
pub mod config;
pub mod decode;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod storage;
pub mod validate;

// Re-export commonly used types
pub use config::IngestConfig;
pub use decode::{EpochUnit, JsonlRecords, NaiveTimestamps, RawRecord, RecordDecoder, TimestampPolicy};
pub use error::{IngestError, Result};
pub use normalize::{normalize, normalize_text};
pub use pipeline::IngestReport;
pub use storage::{DocumentStore, StoredDocument};
pub use validate::{is_valid, Rejection, ValidationRules};

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Finnews - news document ingestion
#[derive(Parser, Debug)]
#[command(name = "finnews-ingest")]
#[command(author, version, about = "Ingest news documents into a local SQLite store", long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// SQLite database path (overrides FINNEWS_DB_PATH; default: data/documents.db)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest a JSONL file of news records
    Ingest {
        /// Input file, one JSON object per line
        input: PathBuf,

        /// Offset-less timestamps: "utc", "reject" or an offset like "+03:00"
        #[arg(long)]
        naive_timestamps: Option<NaiveTimestamps>,

        /// Unit of numeric timestamps: "seconds" or "milliseconds"
        #[arg(long)]
        epoch_unit: Option<EpochUnit>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create the database and schema
    Init,

    /// Show the number of stored documents
    Count {
        /// Also list counts per source
        #[arg(long)]
        by_source: bool,
    },
}

impl Cli {
    /// Layer command-line flags over `config`
    pub fn apply_to(&self, mut config: IngestConfig) -> IngestConfig {
        if let Some(db) = &self.db {
            config.db_path = db.clone();
        }

        if let Commands::Ingest {
            naive_timestamps,
            epoch_unit,
            ..
        } = &self.command
        {
            if let Some(naive) = naive_timestamps {
                config.timestamp_policy.naive = *naive;
            }
            if let Some(unit) = epoch_unit {
                config.timestamp_policy.epoch_unit = *unit;
            }
        }

        config
    }
}
