//! Chat endpoint handlers.
//!
//! Handlers are generic over the session store and completion client so
//! integration tests can inject fakes without touching the Gemini API.

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use nutribot_core::chat::store::SessionStore;
use nutribot_core::llm::client::CompletionClient;
use nutribot_types::chat::{ANONYMOUS_USER, SessionHistory};

use crate::http::error::AppError;
use crate::state::AppState;

/// Request body for `POST /chat/`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    pub user_id: Option<String>,
    pub session_id: Option<String>,
}

/// Response body for `POST /chat/`.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub session_id: Uuid,
}

/// Response body for `POST /chat/new`.
#[derive(Debug, Serialize)]
pub struct NewChatResponse {
    pub session_id: Uuid,
}

/// Generic `{"message": ...}` acknowledgement body.
#[derive(Debug, Serialize)]
pub struct StatusMessage {
    pub message: String,
}

/// Request body for `PUT /chat/edit`.
#[derive(Debug, Deserialize)]
pub struct EditRequest {
    pub session_id: Option<String>,
    pub old_message: Option<String>,
    pub new_message: Option<String>,
}

/// Response body for `GET /chat/history/{user_id}`.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub chat_sessions: Vec<HistoryEntry>,
}

#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    pub session_id: Uuid,
    pub messages: Vec<MessageView>,
}

#[derive(Debug, Serialize)]
pub struct MessageView {
    pub message: String,
    pub sender: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl From<SessionHistory> for HistoryEntry {
    fn from(history: SessionHistory) -> Self {
        Self {
            session_id: history.session.id,
            messages: history
                .turns
                .into_iter()
                .map(|turn| MessageView {
                    message: turn.message,
                    sender: turn.sender.to_string(),
                    timestamp: turn.created_at,
                })
                .collect(),
        }
    }
}

fn parse_session_id(raw: &str) -> Result<Uuid, AppError> {
    raw.parse()
        .map_err(|_| AppError::Validation(format!("Invalid session id: {raw}")))
}

/// `POST /chat/` - handle one chat message.
pub async fn send_message<S: SessionStore, C: CompletionClient>(
    State(state): State<AppState<S, C>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    if request.message.trim().is_empty() {
        return Err(AppError::Validation("Please enter a message.".to_string()));
    }

    let session_id = request
        .session_id
        .as_deref()
        .map(parse_session_id)
        .transpose()?;
    let user_id = request.user_id.as_deref().unwrap_or(ANONYMOUS_USER);

    let reply = state
        .chat_service
        .handle_message(&request.message, user_id, session_id)
        .await?;

    Ok(Json(ChatResponse {
        response: reply.response,
        session_id: reply.session_id,
    }))
}

/// `POST /chat/new` - mint a fresh session id.
pub async fn new_session<S: SessionStore, C: CompletionClient>(
    State(state): State<AppState<S, C>>,
) -> Json<NewChatResponse> {
    Json(NewChatResponse {
        session_id: state.chat_service.new_session(),
    })
}

/// `DELETE /chat/clear/{session_id}` - empty a session's turns.
pub async fn clear_session<S: SessionStore, C: CompletionClient>(
    State(state): State<AppState<S, C>>,
    Path(session_id): Path<String>,
) -> Result<Json<StatusMessage>, AppError> {
    let session_id = parse_session_id(&session_id)?;
    state.chat_service.clear_session(&session_id).await?;
    Ok(Json(StatusMessage {
        message: "Chat history cleared.".to_string(),
    }))
}

/// `DELETE /chat/delete/{session_id}` - remove a session permanently.
pub async fn delete_session<S: SessionStore, C: CompletionClient>(
    State(state): State<AppState<S, C>>,
    Path(session_id): Path<String>,
) -> Result<Json<StatusMessage>, AppError> {
    let session_id = parse_session_id(&session_id)?;
    state.chat_service.delete_session(&session_id).await?;
    Ok(Json(StatusMessage {
        message: "Chat session deleted.".to_string(),
    }))
}

/// `PUT /chat/edit` - rewrite the first turn matching the old text.
pub async fn edit_message<S: SessionStore, C: CompletionClient>(
    State(state): State<AppState<S, C>>,
    Json(request): Json<EditRequest>,
) -> Result<Json<StatusMessage>, AppError> {
    // Empty strings count as missing, same as absent fields.
    let (Some(session_id), Some(old_message), Some(new_message)) = (
        request.session_id.as_deref().filter(|s| !s.is_empty()),
        request.old_message.as_deref().filter(|s| !s.is_empty()),
        request.new_message.as_deref().filter(|s| !s.is_empty()),
    ) else {
        return Err(AppError::Validation(
            "session_id, old_message and new_message are required.".to_string(),
        ));
    };

    let session_id = parse_session_id(session_id)?;
    state
        .chat_service
        .edit_message(&session_id, old_message, new_message)
        .await?;
    Ok(Json(StatusMessage {
        message: "Message updated.".to_string(),
    }))
}

/// `GET /chat/history/{user_id}` - list a user's sessions with turns.
pub async fn history<S: SessionStore, C: CompletionClient>(
    State(state): State<AppState<S, C>>,
    Path(user_id): Path<String>,
) -> Result<Json<HistoryResponse>, AppError> {
    let sessions = state.chat_service.history(&user_id).await?;
    Ok(Json(HistoryResponse {
        chat_sessions: sessions.into_iter().map(HistoryEntry::from).collect(),
    }))
}
