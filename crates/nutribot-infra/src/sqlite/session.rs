//! SQLite session store implementation.
//!
//! Implements `SessionStore` from `nutribot-core` using sqlx with split
//! read/write pools: raw queries, private Row structs, reader for SELECTs
//! and writer for mutations.

use chrono::{DateTime, Utc};
use nutribot_core::chat::store::SessionStore;
use nutribot_types::chat::{Sender, Session, SessionHistory, Turn};
use nutribot_types::error::StoreError;
use sqlx::Row;
use tracing::warn;
use uuid::Uuid;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `SessionStore`.
pub struct SqliteSessionStore {
    pool: DatabasePool,
}

impl SqliteSessionStore {
    /// Create a new store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    async fn load_turns(&self, session_id: &str) -> Result<Vec<Turn>, StoreError> {
        let rows = sqlx::query("SELECT * FROM chat_turns WHERE session_id = ? ORDER BY seq ASC")
            .bind(session_id)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let mut turns = Vec::with_capacity(rows.len());
        for row in &rows {
            let turn_row =
                TurnRow::from_row(row).map_err(|e| StoreError::Query(e.to_string()))?;
            turns.push(turn_row.into_turn()?);
        }

        Ok(turns)
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

/// Internal row type for mapping SQLite rows to domain Session.
struct SessionRow {
    id: String,
    user_id: String,
    created_at: String,
}

impl SessionRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_session(self) -> Result<Session, StoreError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| StoreError::Query(format!("invalid session id: {e}")))?;
        let created_at = parse_datetime(&self.created_at)?;

        Ok(Session {
            id,
            user_id: self.user_id,
            created_at,
        })
    }
}

/// Internal row type for mapping SQLite rows to domain Turn.
struct TurnRow {
    id: String,
    session_id: String,
    sender: String,
    message: String,
    created_at: String,
}

impl TurnRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            session_id: row.try_get("session_id")?,
            sender: row.try_get("sender")?,
            message: row.try_get("message")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_turn(self) -> Result<Turn, StoreError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| StoreError::Query(format!("invalid turn id: {e}")))?;
        let session_id = Uuid::parse_str(&self.session_id)
            .map_err(|e| StoreError::Query(format!("invalid session_id: {e}")))?;
        let sender: Sender = self
            .sender
            .parse()
            .map_err(|e: String| StoreError::Query(e))?;
        let created_at = parse_datetime(&self.created_at)?;

        Ok(Turn {
            id,
            session_id,
            sender,
            message: self.message,
            created_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

// ---------------------------------------------------------------------------
// SessionStore implementation
// ---------------------------------------------------------------------------

impl SessionStore for SqliteSessionStore {
    async fn load(&self, session_id: &Uuid) -> Result<Vec<Turn>, StoreError> {
        self.load_turns(&session_id.to_string()).await
    }

    async fn append(
        &self,
        session_id: &Uuid,
        user_id: &str,
        turns: &[Turn],
    ) -> Result<(), StoreError> {
        // Upsert the session row; user_id only sticks on first creation.
        sqlx::query(
            r#"INSERT INTO chat_sessions (id, user_id, created_at) VALUES (?, ?, ?)
               ON CONFLICT(id) DO NOTHING"#,
        )
        .bind(session_id.to_string())
        .bind(user_id)
        .bind(format_datetime(&Utc::now()))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        for turn in turns {
            sqlx::query(
                r#"INSERT INTO chat_turns (id, session_id, sender, message, created_at)
                   VALUES (?, ?, ?, ?, ?)"#,
            )
            .bind(turn.id.to_string())
            .bind(session_id.to_string())
            .bind(turn.sender.to_string())
            .bind(&turn.message)
            .bind(format_datetime(&turn.created_at))
            .execute(&self.pool.writer)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;
        }

        Ok(())
    }

    async fn clear(&self, session_id: &Uuid) -> Result<(), StoreError> {
        let exists = sqlx::query("SELECT id FROM chat_sessions WHERE id = ?")
            .bind(session_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        if exists.is_none() {
            return Err(StoreError::NotFound);
        }

        sqlx::query("DELETE FROM chat_turns WHERE session_id = ?")
            .bind(session_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(())
    }

    async fn delete(&self, session_id: &Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM chat_sessions WHERE id = ?")
            .bind(session_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    async fn edit(
        &self,
        session_id: &Uuid,
        old_text: &str,
        new_text: &str,
    ) -> Result<(), StoreError> {
        // First match in insertion order only; duplicates later in the
        // session are left alone.
        let result = sqlx::query(
            r#"UPDATE chat_turns SET message = ?
               WHERE seq = (
                   SELECT seq FROM chat_turns
                   WHERE session_id = ? AND message = ?
                   ORDER BY seq ASC LIMIT 1
               )"#,
        )
        .bind(new_text)
        .bind(session_id.to_string())
        .bind(old_text)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<SessionHistory>, StoreError> {
        let rows = sqlx::query(
            "SELECT * FROM chat_sessions WHERE user_id = ? ORDER BY created_at ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        let mut histories = Vec::with_capacity(rows.len());
        for row in &rows {
            let session_row =
                SessionRow::from_row(row).map_err(|e| StoreError::Query(e.to_string()))?;
            let raw_id = session_row.id.clone();
            let session = match session_row.into_session() {
                Ok(session) => session,
                Err(e) => {
                    // A row with an unusable id is skipped, not surfaced.
                    warn!(session_id = %raw_id, error = %e, "Skipping session with unusable id");
                    continue;
                }
            };
            let turns = self.load_turns(&raw_id).await?;
            histories.push(SessionHistory { session, turns });
        }

        Ok(histories)
    }
}
