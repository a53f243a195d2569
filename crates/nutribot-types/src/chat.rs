//! Chat session and turn types for Nutribot.
//!
//! These types model a conversation thread between a user and the bot:
//! a session identified by a UUID, owned by a user id, holding an ordered
//! sequence of turns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Originator of a conversation turn.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (sender IN ('user', 'bot'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Bot => write!(f, "bot"),
        }
    }
}

impl FromStr for Sender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Sender::User),
            "bot" => Ok(Sender::Bot),
            other => Err(format!("invalid sender: '{other}'")),
        }
    }
}

/// A chat session between a user and the bot.
///
/// Sessions are created lazily: a session row exists only once the first
/// turn pair has been appended. `user_id` is fixed at creation and defaults
/// to `"guest"` for anonymous callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

/// The anonymous placeholder owner for sessions without a user id.
pub const ANONYMOUS_USER: &str = "guest";

/// A single turn within a chat session.
///
/// Turns are insertion-ordered within their session and immutable once
/// written, except for the text-replacing edit operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub id: Uuid,
    pub session_id: Uuid,
    pub sender: Sender,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Turn {
    /// Build a new turn for a session, timestamped now.
    pub fn new(session_id: Uuid, sender: Sender, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            session_id,
            sender,
            message: message.into(),
            created_at: Utc::now(),
        }
    }
}

/// A session together with its full turn list, as returned by the
/// per-user history listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionHistory {
    pub session: Session,
    pub turns: Vec<Turn>,
}
