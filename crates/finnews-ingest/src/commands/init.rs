//! `finnews-ingest init` command implementation

use super::{display_path, open_store};
use crate::config::IngestConfig;
use crate::error::Result;

/// Create the database and schema
pub fn run(config: &IngestConfig) -> Result<()> {
    let store = open_store(config)?;
    println!("Initialized DB={}", display_path(store.db_path()).display());
    Ok(())
}
