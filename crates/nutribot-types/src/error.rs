use thiserror::Error;

/// Errors from session store operations (used by the trait definition
/// in nutribot-core).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session or message not found")]
    NotFound,

    #[error("query error: {0}")]
    Query(String),
}

/// Errors from the external completion service.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("rate limited")]
    RateLimited,

    #[error("deserialization error: {0}")]
    Deserialization(String),
}

/// Errors surfaced by the chat service when handling a message.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Completion(#[from] CompletionError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_completion_error_display() {
        let err = CompletionError::Provider {
            message: "HTTP 500".to_string(),
        };
        assert!(err.to_string().contains("HTTP 500"));
    }

    #[test]
    fn test_chat_error_from_store() {
        let err: ChatError = StoreError::NotFound.into();
        assert_eq!(err.to_string(), "session or message not found");
    }
}
