use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{error, info};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};

use crate::error_handling::types::StorageError;
use crate::storage::store_trait::PdfStore;
use crate::storage::types::{CapturedPdf, NewCapture};

/// Schema version recorded in `PRAGMA user_version` after migration.
const SCHEMA_VERSION: i32 = 1;

// Internal row mapping to avoid manual try_get
#[derive(Debug, sqlx::FromRow)]
struct PdfRow {
    id: i64,
    payload: Vec<u8>,
    source_url: String,
    display_name: Option<String>,
    captured_at: String,
}

impl PdfRow {
    fn into_record(self) -> Result<CapturedPdf, StorageError> {
        let captured_at = DateTime::parse_from_rfc3339(&self.captured_at)
            .map_err(|_| StorageError::ReadFailed)?
            .with_timezone(&Utc);
        Ok(CapturedPdf {
            id: self.id,
            payload: self.payload,
            source_url: self.source_url,
            display_name: self.display_name,
            captured_at,
        })
    }
}

/// SQLite-backed `PdfStore`.
///
/// Records survive process restarts within one database file. The schema is
/// versioned through `PRAGMA user_version`; [`SqliteStore::open`] runs an
/// idempotent migration before first use so the record container exists
/// without erasing rows written by a compatible earlier version.
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Default database filename used in the application's working directory
    pub const DEFAULT_DB_FILE: &'static str = "pdfsieve.sqlite3";

    /// Opens (or creates) the database at `path` and migrates its schema.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path_ref = path.as_ref();
        if let Some(parent) = path_ref.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    error!("Failed to create database dir {}: {}", parent.display(), e);
                    StorageError::ConnectionFailed
                })?;
            }
        }
        let opts = SqliteConnectOptions::from_str("sqlite://")
            .map_err(|_| StorageError::ConnectionFailed)?
            .filename(path_ref)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .map_err(|e| {
                error!("Failed to open database {}: {}", path_ref.display(), e);
                StorageError::ConnectionFailed
            })?;
        Self::migrate(&pool).await?;
        Ok(Self { pool })
    }

    /// One-shot schema upgrade, safe to run on every open.
    async fn migrate(pool: &Pool<Sqlite>) -> Result<(), StorageError> {
        let version: i32 = sqlx::query_scalar("PRAGMA user_version")
            .fetch_one(pool)
            .await
            .map_err(|_| StorageError::MigrationFailed)?;
        if version >= SCHEMA_VERSION {
            return Ok(());
        }
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS pdfs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                payload BLOB NOT NULL,
                source_url TEXT NOT NULL,
                display_name TEXT,
                captured_at TEXT NOT NULL
            );",
        )
        .execute(pool)
        .await
        .map_err(|e| {
            error!("Schema migration failed: {}", e);
            StorageError::MigrationFailed
        })?;
        sqlx::query(&format!("PRAGMA user_version = {}", SCHEMA_VERSION))
            .execute(pool)
            .await
            .map_err(|_| StorageError::MigrationFailed)?;
        info!("Database schema migrated to version {}", SCHEMA_VERSION);
        Ok(())
    }
}

#[async_trait]
impl PdfStore for SqliteStore {
    async fn append(&self, capture: NewCapture) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO pdfs (payload, source_url, display_name, captured_at)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&capture.payload)
        .bind(&capture.source_url)
        .bind(&capture.display_name)
        .bind(capture.captured_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to append capture from {}: {}", capture.source_url, e);
            StorageError::WriteFailed
        })?;
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<CapturedPdf>, StorageError> {
        let rows: Vec<PdfRow> = sqlx::query_as(
            "SELECT id, payload, source_url, display_name, captured_at
             FROM pdfs ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to read captures: {}", e);
            StorageError::ReadFailed
        })?;
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(row.into_record()?);
        }
        Ok(out)
    }

    async fn clear_all(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM pdfs")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to clear captures: {}", e);
                StorageError::WriteFailed
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn capture(payload: &[u8], url: &str, name: Option<&str>) -> NewCapture {
        NewCapture {
            payload: payload.to_vec(),
            source_url: url.into(),
            display_name: name.map(Into::into),
            captured_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn append_assigns_ids_in_insertion_order() {
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::open(dir.path().join("test.sqlite3"))
            .await
            .unwrap();
        store
            .append(capture(b"%PDF-1.7 a", "https://a.example/a.pdf", Some("a")))
            .await
            .unwrap();
        store
            .append(capture(b"%PDF-1.7 b", "https://b.example/b.pdf", None))
            .await
            .unwrap();

        let all = store.read_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].id < all[1].id);
        assert_eq!(all[0].payload, b"%PDF-1.7 a");
        assert_eq!(all[0].display_name.as_deref(), Some("a"));
        assert_eq!(all[1].display_name, None);
    }

    #[tokio::test]
    async fn clear_all_removes_every_record() {
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::open(dir.path().join("test.sqlite3"))
            .await
            .unwrap();
        store
            .append(capture(b"x", "https://x.example/", None))
            .await
            .unwrap();
        store.clear_all().await.unwrap();
        assert!(store.read_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn records_survive_reopen_and_migration_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.sqlite3");
        {
            let store = SqliteStore::open(&path).await.unwrap();
            store
                .append(capture(b"kept", "https://keep.example/doc", Some("kept")))
                .await
                .unwrap();
        }
        // Second open re-runs the migration path against an existing schema.
        let store = SqliteStore::open(&path).await.unwrap();
        let all = store.read_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].payload, b"kept");
    }
}
