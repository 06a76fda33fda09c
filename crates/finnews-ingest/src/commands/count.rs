//! `finnews-ingest count` command implementation

use super::{display_path, open_store};
use crate::config::IngestConfig;
use crate::error::Result;

/// Print the number of stored documents, optionally per source
pub fn run(config: &IngestConfig, by_source: bool) -> Result<()> {
    let store = open_store(config)?;

    if by_source {
        for (source, count) in store.count_by_source()? {
            println!("{}\t{}", source, count);
        }
    }

    println!(
        "TotalInDB={} DB={}",
        store.count_documents()?,
        display_path(store.db_path()).display()
    );
    Ok(())
}
