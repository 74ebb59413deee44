use bahasa_srs_core::{CoreError, KeyValueStore};
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::future::Future;
use std::path::Path;
use tokio::runtime::{Builder, Runtime};
use tracing::{info, warn};

/// Key-value store over an embedded SQLite database.
///
/// The pool is async; a private single-threaded runtime drives it so callers
/// see plain blocking calls. Must not be used from inside another tokio
/// runtime.
pub struct SqliteStore {
    rt: Runtime,
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn open_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let rt = runtime()?;
        let opts = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true);
        let pool = rt
            .block_on(SqlitePoolOptions::new().max_connections(5).connect_with(opts))
            .map_err(|_| CoreError::Storage("sqlite connect"))?;
        let store = Self { rt, pool };
        store.ensure_schema()?;
        info!(path = %path.as_ref().display(), "opened sqlite store");
        Ok(store)
    }

    pub fn open_memory() -> Result<Self, CoreError> {
        let rt = runtime()?;
        // Each connection to :memory: is its own database, so keep one.
        let pool = rt
            .block_on(
                SqlitePoolOptions::new()
                    .max_connections(1)
                    .connect("sqlite::memory:"),
            )
            .map_err(|_| CoreError::Storage("sqlite connect"))?;
        let store = Self { rt, pool };
        store.ensure_schema()?;
        Ok(store)
    }

    fn ensure_schema(&self) -> Result<(), CoreError> {
        const STMT: &str = r#"
        CREATE TABLE IF NOT EXISTS kv (
          key         TEXT PRIMARY KEY,
          value       TEXT NOT NULL,
          updated_at  TEXT NOT NULL
        )
        "#;
        self.block_on(sqlx::query(STMT).execute(&self.pool))
            .map(|_| ())
            .map_err(|e| storage_err("sqlite schema", e))
    }

    fn block_on<F: Future>(&self, fut: F) -> F::Output {
        self.rt.block_on(fut)
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        let row = self
            .block_on(
                sqlx::query("SELECT value FROM kv WHERE key=?")
                    .bind(key)
                    .fetch_optional(&self.pool),
            )
            .map_err(|e| storage_err("read kv", e))?;
        row.map(|r| r.try_get::<String, _>("value"))
            .transpose()
            .map_err(|e| storage_err("decode kv", e))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        self.block_on(
            sqlx::query(
                "INSERT INTO kv (key,value,updated_at) VALUES (?,?,?) \
                 ON CONFLICT(key) DO UPDATE SET value=excluded.value, updated_at=excluded.updated_at",
            )
            .bind(key)
            .bind(value)
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool),
        )
        .map(|_| ())
        .map_err(|e| storage_err("write kv", e))
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        self.block_on(
            sqlx::query("DELETE FROM kv WHERE key=?")
                .bind(key)
                .execute(&self.pool),
        )
        .map(|_| ())
        .map_err(|e| storage_err("delete kv", e))
    }
}

impl Drop for SqliteStore {
    fn drop(&mut self) {
        self.rt.block_on(self.pool.close());
    }
}

fn runtime() -> Result<Runtime, CoreError> {
    Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|_| CoreError::Storage("tokio runtime"))
}

fn storage_err(what: &'static str, e: sqlx::Error) -> CoreError {
    warn!(error = %e, "{what} failed");
    CoreError::Storage(what)
}
