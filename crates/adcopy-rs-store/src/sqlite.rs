//! SQLite-backed generation log.

use crate::error::StoreError;
use crate::model::{DEFAULT_TONE, GenerationRecord, HistoryQuery, fold_product};
use crate::store::RecordStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info};
use parking_lot::Mutex;
use rusqlite::{Connection, params};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS generations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    product TEXT NOT NULL CHECK (length(product) > 0),
    product_folded TEXT NOT NULL,
    tone TEXT NOT NULL,
    generated_text TEXT NOT NULL CHECK (length(generated_text) > 0),
    created_at_us INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS generations_recent_idx
    ON generations (created_at_us DESC, id DESC);
";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Parsed database connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseUrl {
    /// Private in-memory database, lost on drop.
    Memory,
    /// Database file on disk.
    File(PathBuf),
}

impl DatabaseUrl {
    /// Parse `sqlite::memory:`, `sqlite://<path>`, `sqlite:<path>` or a bare path.
    pub fn parse(url: &str) -> Result<Self, StoreError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(StoreError::Unconfigured("database url is empty".to_string()));
        }
        let rest = if let Some(rest) = url.strip_prefix("sqlite://") {
            rest
        } else if let Some(rest) = url.strip_prefix("sqlite:") {
            rest
        } else if let Some((scheme, _)) = url.split_once("://") {
            return Err(StoreError::Unconfigured(format!(
                "unsupported database scheme '{scheme}' (only sqlite is supported)"
            )));
        } else {
            url
        };
        let rest = rest.split_once('?').map_or(rest, |(path, _)| path);
        match rest {
            "" => Err(StoreError::Unconfigured(format!(
                "database url '{url}' has no path"
            ))),
            ":memory:" | "memory:" => Ok(Self::Memory),
            path => Ok(Self::File(PathBuf::from(path))),
        }
    }
}

/// Record store backed by a single SQLite connection.
///
/// The connection lock is held for one statement at a time on a blocking
/// worker thread; atomicity of each insert comes from SQLite itself.
#[derive(Clone)]
pub struct SqliteRecordStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteRecordStore {
    /// Open the database named by a connection string.
    pub fn open(url: &str) -> Result<Self, StoreError> {
        match DatabaseUrl::parse(url)? {
            DatabaseUrl::Memory => Self::open_in_memory(),
            DatabaseUrl::File(path) => Self::open_path(path),
        }
    }

    /// Open or create a database file.
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|err| {
            StoreError::Unavailable(format!("failed to open {}: {err}", path.display()))
        })?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        info!("opened sqlite generation log (path={})", path.display());
        Self::initialize(conn)
    }

    /// Create a private in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;
        info!("opened in-memory generation log");
        Self::initialize(conn)
    }

    fn initialize(conn: Connection) -> Result<Self, StoreError> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run blocking database work off the async executor.
    async fn with_conn<T, F>(&self, work: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock();
            work(&conn)
        })
        .await
        .map_err(|err| StoreError::Unavailable(format!("store worker failed: {err}")))?
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn insert(
        &self,
        product: &str,
        tone: &str,
        generated_text: &str,
    ) -> Result<GenerationRecord, StoreError> {
        if product.trim().is_empty() {
            return Err(StoreError::InvalidArgument("product must not be empty".to_string()));
        }
        if generated_text.trim().is_empty() {
            return Err(StoreError::InvalidArgument(
                "generated text must not be empty".to_string(),
            ));
        }
        let product = product.to_string();
        let tone = if tone.trim().is_empty() {
            DEFAULT_TONE.to_string()
        } else {
            tone.to_string()
        };
        let generated_text = generated_text.to_string();

        let record = self
            .with_conn(move |conn| {
                let created_at = now_micros()?;
                conn.execute(
                    "INSERT INTO generations
                        (product, product_folded, tone, generated_text, created_at_us)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        product,
                        fold_product(&product),
                        tone,
                        generated_text,
                        created_at.timestamp_micros()
                    ],
                )?;
                Ok(GenerationRecord {
                    id: conn.last_insert_rowid(),
                    product,
                    tone,
                    generated_text,
                    created_at,
                })
            })
            .await?;
        debug!(
            "inserted generation record (id={}, tone={}, text_len={})",
            record.id,
            record.tone,
            record.generated_text.len()
        );
        Ok(record)
    }

    async fn list(&self, query: &HistoryQuery) -> Result<Vec<GenerationRecord>, StoreError> {
        query.validate()?;
        let filter = query.folded_product();
        let (limit, offset) = (query.limit, query.offset);
        let filtered = filter.is_some();

        let records = self
            .with_conn(move |conn| {
                let mut stmt = conn.prepare_cached(
                    "SELECT id, product, tone, generated_text, created_at_us
                     FROM generations
                     WHERE ?1 IS NULL OR instr(product_folded, ?1) > 0
                     ORDER BY created_at_us DESC, id DESC
                     LIMIT ?2 OFFSET ?3",
                )?;
                let rows = stmt.query_map(params![filter, limit, offset], |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, i64>(4)?,
                    ))
                })?;
                let mut records = Vec::new();
                for row in rows {
                    let (id, product, tone, generated_text, created_at_us) = row?;
                    records.push(GenerationRecord {
                        id,
                        product,
                        tone,
                        generated_text,
                        created_at: from_micros(created_at_us)?,
                    });
                }
                Ok(records)
            })
            .await?;
        debug!(
            "listed generation records (limit={}, offset={}, filtered={}, returned={})",
            limit,
            offset,
            filtered,
            records.len()
        );
        Ok(records)
    }
}

/// Current time truncated to the stored microsecond precision.
fn now_micros() -> Result<DateTime<Utc>, StoreError> {
    from_micros(Utc::now().timestamp_micros())
}

fn from_micros(micros: i64) -> Result<DateTime<Utc>, StoreError> {
    DateTime::from_timestamp_micros(micros)
        .ok_or_else(|| StoreError::Unavailable(format!("timestamp out of range: {micros}")))
}

#[cfg(test)]
mod tests {
    use super::{DatabaseUrl, SqliteRecordStore};
    use crate::{HistoryQuery, RecordStore, StoreError};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn parses_supported_urls() {
        assert_eq!(DatabaseUrl::parse("sqlite::memory:").unwrap(), DatabaseUrl::Memory);
        assert_eq!(DatabaseUrl::parse(":memory:").unwrap(), DatabaseUrl::Memory);
        assert_eq!(
            DatabaseUrl::parse("sqlite:///var/lib/adcopy.db").unwrap(),
            DatabaseUrl::File(PathBuf::from("/var/lib/adcopy.db"))
        );
        assert_eq!(
            DatabaseUrl::parse("sqlite:data/ads.db?mode=rwc").unwrap(),
            DatabaseUrl::File(PathBuf::from("data/ads.db"))
        );
        assert_eq!(
            DatabaseUrl::parse("ads.db").unwrap(),
            DatabaseUrl::File(PathBuf::from("ads.db"))
        );
    }

    #[test]
    fn rejects_unsupported_scheme() {
        let err = DatabaseUrl::parse("postgres://user@localhost/ads").unwrap_err();
        match err {
            StoreError::Unconfigured(message) => assert!(message.contains("postgres")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(
            DatabaseUrl::parse("  ").unwrap_err(),
            StoreError::Unconfigured(_)
        ));
        assert!(matches!(
            DatabaseUrl::parse("sqlite://").unwrap_err(),
            StoreError::Unconfigured(_)
        ));
    }

    #[tokio::test]
    async fn insert_assigns_ids_and_defaults_tone() {
        let store = SqliteRecordStore::open_in_memory().expect("store");
        let first = store.insert("ProconAI", "", "Buy now").await.expect("insert");
        let second = store.insert("Acme", "bold", "Act fast").await.expect("insert");
        assert_eq!(first.id, 1);
        assert_eq!(first.tone, "friendly");
        assert_eq!(second.id, 2);
        assert!(second.created_at >= first.created_at);
    }

    #[tokio::test]
    async fn insert_stores_product_and_tone_verbatim() {
        let store = SqliteRecordStore::open_in_memory().expect("store");
        let record = store
            .insert(" ProconAI ", " confident", "Buy now")
            .await
            .expect("insert");
        assert_eq!(record.product, " ProconAI ");
        assert_eq!(record.tone, " confident");

        let listed = store
            .list(&HistoryQuery::first(10).product("procon"))
            .await
            .expect("list");
        assert_eq!(listed, vec![record]);
    }

    #[tokio::test]
    async fn insert_rejects_empty_fields() {
        let store = SqliteRecordStore::open_in_memory().expect("store");
        let err = store.insert("  ", "friendly", "text").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidArgument(_)), "{err:?}");
        let err = store.insert("ProconAI", "friendly", " ").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidArgument(_)), "{err:?}");
        let all = store.list(&HistoryQuery::first(10)).await.expect("list");
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn listed_records_match_inserted_records() {
        let store = SqliteRecordStore::open_in_memory().expect("store");
        let inserted = store
            .insert("ProconAI", "confident", "Buy ProconAI now!")
            .await
            .expect("insert");
        let listed = store.list(&HistoryQuery::first(10)).await.expect("list");
        assert_eq!(listed, vec![inserted]);
    }

    #[tokio::test]
    async fn file_store_persists_across_reopen() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("ads.db");
        let url = format!("sqlite://{}", path.display());
        {
            let store = SqliteRecordStore::open(&url).expect("store");
            store.insert("ProconAI", "warm", "Hello").await.expect("insert");
        }
        let store = SqliteRecordStore::open(&url).expect("reopen");
        let next = store.insert("Acme", "warm", "Again").await.expect("insert");
        assert_eq!(next.id, 2);
        let listed = store.list(&HistoryQuery::first(10)).await.expect("list");
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[1].product, "ProconAI");
    }

    #[test]
    fn open_reports_unreachable_path() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("missing-dir").join("ads.db");
        let err = SqliteRecordStore::open_path(&path).err().expect("error");
        assert!(matches!(err, StoreError::Unavailable(_)), "{err:?}");
    }
}
