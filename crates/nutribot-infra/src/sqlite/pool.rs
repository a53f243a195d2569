//! Split read/write SQLite pool for the chat store.
//!
//! SQLite serializes writers, so a turn append never runs concurrently
//! with another write anyway; giving the writer a single connection makes
//! that explicit and keeps `SQLITE_BUSY` out of the write path. Reads
//! dominate this workload (every inbound message re-reads its full
//! session history, and the per-user history listing issues one turn
//! query per session), so those go to a wider read-only pool running
//! against the WAL.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

/// Upper bound for concurrent history reads.
const READER_CONNECTIONS: u32 = 8;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Paired pools over one SQLite file: `reader` for session/turn SELECTs,
/// `writer` for appends, edits, and deletes.
#[derive(Clone)]
pub struct DatabasePool {
    pub reader: SqlitePool,
    pub writer: SqlitePool,
}

impl DatabasePool {
    /// Open (or create) the database and bring the schema up to date.
    ///
    /// Migrations run on the writer before the reader pool opens, so a
    /// fresh data directory has `chat_sessions` and `chat_turns` in place
    /// before any query can hit them. Both pools share WAL mode, enforced
    /// foreign keys (turn rows cascade with their session), and the busy
    /// timeout.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let opts = SqliteConnectOptions::from_str(database_url)?
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(BUSY_TIMEOUT)
            .create_if_missing(true);

        let writer = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts.clone())
            .await?;

        sqlx::migrate!("../../migrations").run(&writer).await?;

        let reader = SqlitePoolOptions::new()
            .max_connections(READER_CONNECTIONS)
            .connect_with(opts.read_only(true))
            .await?;

        Ok(Self { reader, writer })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn open_pool(name: &str) -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join(name);
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    #[tokio::test]
    async fn test_migrations_create_chat_tables() {
        let pool = open_pool("test.db").await;

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name != '_sqlx_migrations' ORDER BY name",
        )
        .fetch_all(&pool.reader)
        .await
        .unwrap();

        let table_names: Vec<&str> = tables.iter().map(|t| t.0.as_str()).collect();
        assert!(table_names.contains(&"chat_sessions"), "chat_sessions table missing");
        assert!(table_names.contains(&"chat_turns"), "chat_turns table missing");
    }

    #[tokio::test]
    async fn test_pool_wal_mode() {
        let pool = open_pool("test_wal.db").await;

        let result: (String,) = sqlx::query_as("PRAGMA journal_mode")
            .fetch_one(&pool.writer)
            .await
            .unwrap();

        assert_eq!(result.0.to_lowercase(), "wal");
    }

    #[tokio::test]
    async fn test_pool_foreign_keys_enforced() {
        let pool = open_pool("test_fk.db").await;

        let result: (i32,) = sqlx::query_as("PRAGMA foreign_keys")
            .fetch_one(&pool.writer)
            .await
            .unwrap();

        assert_eq!(result.0, 1, "foreign keys should be enabled");
    }

    #[tokio::test]
    async fn test_reader_pool_rejects_writes() {
        let pool = open_pool("test_ro.db").await;

        let result = sqlx::query(
            "INSERT INTO chat_sessions (id, user_id, created_at) VALUES ('x', 'guest', 'now')",
        )
        .execute(&pool.reader)
        .await;

        assert!(result.is_err(), "reader pool accepted a write");
    }
}
