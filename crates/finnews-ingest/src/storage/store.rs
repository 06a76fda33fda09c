//! SQLite-backed document store
//!
//! Each operation opens its own connection. A batch runs in one transaction
//! that is committed once at the end; dropping it early (an error from the
//! input) rolls the whole batch back.

use chrono::{DateTime, TimeZone, Utc};
use finnews_common::{Document, IngestResult};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema;
use crate::error::Result;
use crate::normalize::normalize_text;
use crate::validate::ValidationRules;

/// A persisted row, as stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDocument {
    pub id: i64,
    pub source: String,
    pub url: String,
    pub title: String,
    pub raw_text: String,
    pub norm_text: String,
    pub published_at: Option<String>,
    pub fetched_at: String,
    pub processed_at: String,
    pub meta_json: String,
}

/// Document store over a single SQLite file
#[derive(Debug, Clone)]
pub struct DocumentStore {
    db_path: PathBuf,
    rules: ValidationRules,
}

impl DocumentStore {
    /// Store at `db_path`; the parent directory must already exist
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            rules: ValidationRules::default(),
        }
    }

    pub fn with_rules(mut self, rules: ValidationRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn open_connection(&self) -> Result<Connection> {
        let conn = Connection::open(&self.db_path)?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(conn)
    }

    /// Ensure the table and index exist
    pub fn init_schema(&self) -> Result<()> {
        let conn = self.open_connection()?;
        schema::init_schema(&conn)?;

        debug!(db = %self.db_path.display(), "Document store schema initialized");
        Ok(())
    }

    /// Insert a batch of documents, skipping invalid ones and known urls
    pub fn ingest_documents<I>(&self, documents: I) -> Result<IngestResult>
    where
        I: IntoIterator<Item = Document>,
    {
        self.try_ingest_documents(documents.into_iter().map(Ok))
    }

    /// Like [`ingest_documents`](Self::ingest_documents) over a fallible
    /// source; the first `Err` aborts and rolls back the batch
    pub fn try_ingest_documents<I>(&self, documents: I) -> Result<IngestResult>
    where
        I: IntoIterator<Item = Result<Document>>,
    {
        let mut conn = self.open_connection()?;
        let tx = conn.transaction()?;
        let mut result = IngestResult::default();

        {
            let mut insert = tx.prepare(schema::INSERT_DOCUMENT)?;

            for document in documents {
                let document = document?;

                if let Err(rejection) = self.rules.check(&document) {
                    debug!(
                        url = %document.url,
                        line_no = ?document.meta.get("line_no"),
                        %rejection,
                        "Skipping invalid document"
                    );
                    result.skipped_invalid += 1;
                    continue;
                }

                let norm_text = normalize_text(&document.raw_text);
                let meta_json = document.meta_json()?;

                let outcome = insert.execute(params![
                    document.source,
                    document.url,
                    document.title,
                    document.raw_text,
                    norm_text,
                    document.published_at.as_ref().map(stored_instant),
                    stored_instant(&document.fetched_at),
                    stored_instant(&document.processed_at),
                    meta_json,
                ]);

                match outcome {
                    Ok(0) => {
                        debug!(url = %document.url, "Skipping duplicate url");
                        result.skipped_duplicates += 1;
                    }
                    Ok(_) => result.inserted += 1,
                    Err(rusqlite::Error::SqliteFailure(err, msg))
                        if err.code == ErrorCode::ConstraintViolation =>
                    {
                        warn!(
                            url = %document.url,
                            error = msg.as_deref().unwrap_or("constraint violation"),
                            "Skipping document rejected by the store"
                        );
                        result.skipped_invalid += 1;
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }

        tx.commit()?;

        info!(
            documents = result.total(),
            inserted = result.inserted,
            skipped_duplicates = result.skipped_duplicates,
            skipped_invalid = result.skipped_invalid,
            "Batch committed"
        );
        Ok(result)
    }

    /// Total number of stored documents
    pub fn count_documents(&self) -> Result<u64> {
        let conn = self.open_connection()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Document counts per source, ordered by source
    pub fn count_by_source(&self) -> Result<Vec<(String, u64)>> {
        let conn = self.open_connection()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT source, COUNT(*)
            FROM documents
            GROUP BY source
            ORDER BY source
            "#,
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
    }

    /// Stored row for `url`, if any
    pub fn get_by_url(&self, url: &str) -> Result<Option<StoredDocument>> {
        let conn = self.open_connection()?;

        let row = conn
            .query_row(
                r#"
                SELECT id, source, url, title, raw_text, norm_text,
                       published_at, fetched_at, processed_at, meta_json
                FROM documents
                WHERE url = ?1
                "#,
                params![url],
                |row| {
                    Ok(StoredDocument {
                        id: row.get(0)?,
                        source: row.get(1)?,
                        url: row.get(2)?,
                        title: row.get(3)?,
                        raw_text: row.get(4)?,
                        norm_text: row.get(5)?,
                        published_at: row.get(6)?,
                        fetched_at: row.get(7)?,
                        processed_at: row.get(8)?,
                        meta_json: row.get(9)?,
                    })
                },
            )
            .optional()?;

        Ok(row)
    }
}

/// UTC instant with an explicit `+00:00` offset
fn stored_instant<Tz: TimeZone>(dt: &DateTime<Tz>) -> String {
    dt.with_timezone(&Utc).to_rfc3339()
}
