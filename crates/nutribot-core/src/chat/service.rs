//! Chat service orchestrating the message round trip.
//!
//! ChatService coordinates the SessionStore and CompletionClient to handle
//! one inbound message: load prior turns, render the transcript, assemble
//! the outbound prompt, obtain a completion, and append the resulting turn
//! pair to the session.

use nutribot_types::chat::{SessionHistory, Sender, Turn};
use nutribot_types::error::{ChatError, StoreError};
use tracing::{debug, info};
use uuid::Uuid;

use crate::chat::prompt::PromptAssembler;
use crate::chat::store::SessionStore;
use crate::chat::transcript::render_transcript;
use crate::llm::client::CompletionClient;

/// Reply substituted when the completion service returns no usable text.
pub const FALLBACK_REPLY: &str = "⚠️ No response from AI.";

/// The service's answer to one inbound chat message.
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub response: String,
    pub session_id: Uuid,
}

/// Orchestrates conversation handling and session lifecycle.
///
/// Generic over `SessionStore` and `CompletionClient` so both collaborators
/// are explicitly injected (nutribot-core never depends on nutribot-infra).
pub struct ChatService<S: SessionStore, C: CompletionClient> {
    store: S,
    client: C,
    assembler: PromptAssembler,
}

impl<S: SessionStore, C: CompletionClient> ChatService<S, C> {
    /// Create a new chat service with the given collaborators.
    pub fn new(store: S, client: C, assembler: PromptAssembler) -> Self {
        Self {
            store,
            client,
            assembler,
        }
    }

    /// Access the session store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Generate a fresh session id.
    ///
    /// Nothing is persisted until the first turn pair is appended.
    pub fn new_session(&self) -> Uuid {
        Uuid::now_v7()
    }

    /// Handle one inbound message.
    ///
    /// If `session_id` is `None` a fresh one is generated. The prior turns
    /// for the session are loaded (empty for a new session), rendered into
    /// a transcript, and assembled into the outbound prompt. The user turn
    /// and the bot reply are appended together after the completion call;
    /// there is no transaction spanning the read/complete/append sequence,
    /// so concurrent requests on one session may interleave turn pairs.
    pub async fn handle_message(
        &self,
        message: &str,
        user_id: &str,
        session_id: Option<Uuid>,
    ) -> Result<ChatReply, ChatError> {
        let session_id = session_id.unwrap_or_else(Uuid::now_v7);

        let turns = self.store.load(&session_id).await?;
        let transcript = render_transcript(&turns);
        let prompt = self.assembler.assemble(message, &transcript);

        debug!(
            %session_id,
            history_turns = turns.len(),
            triggered = self.assembler.is_triggered(message),
            "Assembled prompt"
        );

        let raw = self.client.complete(&prompt).await?;
        let reply = match raw.trim() {
            "" => FALLBACK_REPLY.to_string(),
            text => text.to_string(),
        };

        let pair = [
            Turn::new(session_id, Sender::User, message),
            Turn::new(session_id, Sender::Bot, reply.clone()),
        ];
        self.store.append(&session_id, user_id, &pair).await?;

        info!(%session_id, user_id, "Turn pair appended");

        Ok(ChatReply {
            response: reply,
            session_id,
        })
    }

    /// Empty a session's turns, keeping the session and its owner.
    pub async fn clear_session(&self, session_id: &Uuid) -> Result<(), StoreError> {
        self.store.clear(session_id).await
    }

    /// Delete a session and its turns permanently.
    pub async fn delete_session(&self, session_id: &Uuid) -> Result<(), StoreError> {
        self.store.delete(session_id).await
    }

    /// Replace the first turn matching `old_text` with `new_text`.
    pub async fn edit_message(
        &self,
        session_id: &Uuid,
        old_text: &str,
        new_text: &str,
    ) -> Result<(), StoreError> {
        self.store.edit(session_id, old_text, new_text).await
    }

    /// List all sessions owned by a user, with their full turn lists.
    pub async fn history(&self, user_id: &str) -> Result<Vec<SessionHistory>, StoreError> {
        self.store.list_by_user(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nutribot_types::chat::Session;
    use nutribot_types::error::CompletionError;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory store keyed by session id.
    #[derive(Default)]
    struct MemoryStore {
        sessions: Mutex<HashMap<Uuid, (Session, Vec<Turn>)>>,
    }

    impl SessionStore for MemoryStore {
        async fn load(&self, session_id: &Uuid) -> Result<Vec<Turn>, StoreError> {
            let sessions = self.sessions.lock().unwrap();
            Ok(sessions
                .get(session_id)
                .map(|(_, turns)| turns.clone())
                .unwrap_or_default())
        }

        async fn append(
            &self,
            session_id: &Uuid,
            user_id: &str,
            turns: &[Turn],
        ) -> Result<(), StoreError> {
            let mut sessions = self.sessions.lock().unwrap();
            let entry = sessions.entry(*session_id).or_insert_with(|| {
                (
                    Session {
                        id: *session_id,
                        user_id: user_id.to_string(),
                        created_at: chrono::Utc::now(),
                    },
                    Vec::new(),
                )
            });
            entry.1.extend_from_slice(turns);
            Ok(())
        }

        async fn clear(&self, session_id: &Uuid) -> Result<(), StoreError> {
            let mut sessions = self.sessions.lock().unwrap();
            match sessions.get_mut(session_id) {
                Some((_, turns)) => {
                    turns.clear();
                    Ok(())
                }
                None => Err(StoreError::NotFound),
            }
        }

        async fn delete(&self, session_id: &Uuid) -> Result<(), StoreError> {
            let mut sessions = self.sessions.lock().unwrap();
            sessions
                .remove(session_id)
                .map(|_| ())
                .ok_or(StoreError::NotFound)
        }

        async fn edit(
            &self,
            session_id: &Uuid,
            old_text: &str,
            new_text: &str,
        ) -> Result<(), StoreError> {
            let mut sessions = self.sessions.lock().unwrap();
            let (_, turns) = sessions.get_mut(session_id).ok_or(StoreError::NotFound)?;
            let turn = turns
                .iter_mut()
                .find(|t| t.message == old_text)
                .ok_or(StoreError::NotFound)?;
            turn.message = new_text.to_string();
            Ok(())
        }

        async fn list_by_user(&self, user_id: &str) -> Result<Vec<SessionHistory>, StoreError> {
            let sessions = self.sessions.lock().unwrap();
            Ok(sessions
                .values()
                .filter(|(s, _)| s.user_id == user_id)
                .map(|(s, turns)| SessionHistory {
                    session: s.clone(),
                    turns: turns.clone(),
                })
                .collect())
        }
    }

    /// Fake client returning a fixed reply and recording prompts.
    struct FakeClient {
        reply: String,
        prompts: Mutex<Vec<String>>,
    }

    impl FakeClient {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    impl CompletionClient for FakeClient {
        async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.reply.clone())
        }
    }

    struct FailingClient;

    impl CompletionClient for FailingClient {
        async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
            Err(CompletionError::Provider {
                message: "connection refused".to_string(),
            })
        }
    }

    fn service(reply: &str) -> ChatService<MemoryStore, FakeClient> {
        ChatService::new(
            MemoryStore::default(),
            FakeClient::new(reply),
            PromptAssembler::default(),
        )
    }

    #[tokio::test]
    async fn test_new_session_has_empty_history() {
        let svc = service("hi!");
        let session_id = svc.new_session();
        let turns = svc.store().load(&session_id).await.unwrap();
        assert!(turns.is_empty());
    }

    #[tokio::test]
    async fn test_handle_message_generates_session_and_appends_pair() {
        let svc = service("Hello!");
        let reply = svc.handle_message("Hi there", "guest", None).await.unwrap();

        assert_eq!(reply.response, "Hello!");

        let turns = svc.store().load(&reply.session_id).await.unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].sender, Sender::User);
        assert_eq!(turns[0].message, "Hi there");
        assert_eq!(turns[1].sender, Sender::Bot);
        assert_eq!(turns[1].message, "Hello!");
    }

    #[tokio::test]
    async fn test_handle_message_reuses_session() {
        let svc = service("ok");
        let first = svc.handle_message("Hello", "guest", None).await.unwrap();
        let second = svc
            .handle_message("Again", "guest", Some(first.session_id))
            .await
            .unwrap();

        assert_eq!(first.session_id, second.session_id);
        let turns = svc.store().load(&first.session_id).await.unwrap();
        assert_eq!(turns.len(), 4);
        assert_eq!(turns[2].message, "Again");
    }

    #[tokio::test]
    async fn test_triggered_prompt_carries_prior_history() {
        let svc = service("ok");
        let first = svc.handle_message("Hello", "guest", None).await.unwrap();
        svc.handle_message("I want a Nutrition plan", "guest", Some(first.session_id))
            .await
            .unwrap();

        let prompts = svc.client.prompts.lock().unwrap();
        // First message is not triggered: bare passthrough, no history.
        assert_eq!(prompts[0], "User: Hello\nAssistant:");
        // Second message pulls in the template and the first turn pair.
        assert!(prompts[1].contains("pediatric nutritionist chatbot"));
        assert!(prompts[1].contains("user: Hello\nbot: ok\n"));
        assert!(prompts[1].contains("--- New User Input ---User: I want a Nutrition plan"));
    }

    #[tokio::test]
    async fn test_empty_completion_substitutes_fallback() {
        let svc = service("   \n ");
        let reply = svc.handle_message("Hello", "guest", None).await.unwrap();
        assert_eq!(reply.response, FALLBACK_REPLY);

        let turns = svc.store().load(&reply.session_id).await.unwrap();
        assert_eq!(turns[1].message, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn test_reply_is_trimmed() {
        let svc = service("  spaced out  \n");
        let reply = svc.handle_message("Hello", "guest", None).await.unwrap();
        assert_eq!(reply.response, "spaced out");
    }

    #[tokio::test]
    async fn test_completion_failure_appends_nothing() {
        let svc = ChatService::new(
            MemoryStore::default(),
            FailingClient,
            PromptAssembler::default(),
        );
        let session_id = svc.new_session();
        let result = svc.handle_message("Hello", "guest", Some(session_id)).await;

        assert!(matches!(result, Err(ChatError::Completion(_))));
        let turns = svc.store().load(&session_id).await.unwrap();
        assert!(turns.is_empty());
    }

    #[tokio::test]
    async fn test_clear_unknown_session_is_not_found() {
        let svc = service("ok");
        let result = svc.clear_session(&Uuid::now_v7()).await;
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn test_edit_replaces_first_match_only() {
        let svc = service("same");
        let first = svc.handle_message("same", "guest", None).await.unwrap();
        svc.handle_message("other", "guest", Some(first.session_id))
            .await
            .unwrap();

        // Both the first user turn and the first bot turn say "same";
        // only the earliest one changes.
        svc.edit_message(&first.session_id, "same", "changed")
            .await
            .unwrap();

        let turns = svc.store().load(&first.session_id).await.unwrap();
        assert_eq!(turns[0].message, "changed");
        assert_eq!(turns[1].message, "same");
    }

    #[tokio::test]
    async fn test_history_scopes_by_user() {
        let svc = service("ok");
        svc.handle_message("from alice", "alice", None).await.unwrap();
        svc.handle_message("from bob", "bob", None).await.unwrap();

        let alice = svc.history("alice").await.unwrap();
        assert_eq!(alice.len(), 1);
        assert_eq!(alice[0].turns[0].message, "from alice");

        let nobody = svc.history("nobody").await.unwrap();
        assert!(nobody.is_empty());
    }
}
