//! SessionStore trait definition.
//!
//! Persistence port for chat sessions and their turns. The concrete
//! implementation lives in nutribot-infra (`SqliteSessionStore`).
//! Uses native async fn in traits (RPITIT, Rust 2024 edition).

use nutribot_types::chat::{SessionHistory, Turn};
use nutribot_types::error::StoreError;
use uuid::Uuid;

/// Repository trait for session and turn persistence.
///
/// Session id generation happens in the chat service; the store only sees
/// ids. A session row comes into existence on the first `append` -- loading
/// an unknown session is not an error, it is simply an empty history.
pub trait SessionStore: Send + Sync {
    /// Load all turns for a session in insertion order.
    ///
    /// Returns an empty vec for an unknown session.
    fn load(
        &self,
        session_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<Turn>, StoreError>> + Send;

    /// Append turns to a session, creating the session row if needed.
    ///
    /// `user_id` is only written on first creation; later appends never
    /// change the owner. Turn order within the slice is preserved.
    fn append(
        &self,
        session_id: &Uuid,
        user_id: &str,
        turns: &[Turn],
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Empty a session's turn list, keeping the session row and its owner.
    ///
    /// Fails with `StoreError::NotFound` if the session does not exist.
    fn clear(
        &self,
        session_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Remove a session and all its turns permanently.
    ///
    /// Fails with `StoreError::NotFound` if the session does not exist.
    fn delete(
        &self,
        session_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Replace the text of the first turn whose message exactly equals
    /// `old_text`, leaving sender and timestamp unchanged.
    ///
    /// Fails with `StoreError::NotFound` if no turn matches.
    fn edit(
        &self,
        session_id: &Uuid,
        old_text: &str,
        new_text: &str,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// List all sessions owned by `user_id`, each with its full turn list.
    ///
    /// Sessions whose stored id cannot be parsed are skipped and logged,
    /// not returned.
    fn list_by_user(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<SessionHistory>, StoreError>> + Send;
}
