//! SQLite schema for the document store

use crate::error::Result;
use rusqlite::Connection;

/// Insert that leaves an existing row with the same url untouched
pub(crate) const INSERT_DOCUMENT: &str = r#"
    INSERT INTO documents (
        source, url, title, raw_text, norm_text,
        published_at, fetched_at, processed_at, meta_json
    )
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
    ON CONFLICT(url) DO NOTHING
"#;

/// Create the documents table and its index if missing.
///
/// Safe to run on every start.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS documents (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            source TEXT NOT NULL,
            url TEXT NOT NULL UNIQUE,
            title TEXT NOT NULL,
            raw_text TEXT NOT NULL,
            norm_text TEXT NOT NULL,

            -- RFC 3339, UTC
            published_at TEXT NULL,
            fetched_at TEXT NOT NULL,
            processed_at TEXT NOT NULL,

            meta_json TEXT NOT NULL  -- JSON, sorted keys
        )
        "#,
        [],
    )?;

    conn.execute(
        r#"
        CREATE INDEX IF NOT EXISTS ix_documents_source_published_at
        ON documents(source, published_at)
        "#,
        [],
    )?;

    Ok(())
}
