//! Command implementations for the `finnews-ingest` binary

pub mod count;
pub mod ingest;
pub mod init;

use std::path::{Path, PathBuf};

use crate::config::IngestConfig;
use crate::error::Result;
use crate::storage::DocumentStore;

/// Create the database directory if needed and make sure the schema exists
pub(crate) fn open_store(config: &IngestConfig) -> Result<DocumentStore> {
    if let Some(parent) = config.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let store = DocumentStore::new(&config.db_path).with_rules(config.validation.clone());
    store.init_schema()?;
    Ok(store)
}

/// Absolute path for display, falling back to the configured one
pub(crate) fn display_path(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_open_store_creates_directory_and_schema() {
        let dir = tempfile::tempdir().unwrap();
        let config = IngestConfig {
            db_path: dir.path().join("nested/data/documents.db"),
            ..Default::default()
        };

        let store = open_store(&config).unwrap();

        assert!(config.db_path.exists());
        assert_eq!(store.count_documents().unwrap(), 0);
        assert!(display_path(&config.db_path).is_absolute());
    }
}
