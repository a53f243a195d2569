//! Application state wiring the chat service together.
//!
//! The chat service is generic over its store and completion client;
//! `AppState::init` pins them to the concrete infra implementations while
//! tests construct the state with fakes.

use std::path::PathBuf;
use std::sync::Arc;

use secrecy::SecretString;

use nutribot_core::chat::prompt::PromptAssembler;
use nutribot_core::chat::service::ChatService;
use nutribot_core::chat::store::SessionStore;
use nutribot_core::llm::client::CompletionClient;
use nutribot_infra::config::{database_url, resolve_data_dir};
use nutribot_infra::llm::gemini::GeminiClient;
use nutribot_infra::sqlite::pool::DatabasePool;
use nutribot_infra::sqlite::session::SqliteSessionStore;

/// Shared application state handed to every handler.
pub struct AppState<S: SessionStore, C: CompletionClient> {
    pub chat_service: Arc<ChatService<S, C>>,
}

// Manual impl: a derived Clone would require S: Clone and C: Clone,
// but only the Arc is cloned.
impl<S: SessionStore, C: CompletionClient> Clone for AppState<S, C> {
    fn clone(&self) -> Self {
        Self {
            chat_service: Arc::clone(&self.chat_service),
        }
    }
}

impl<S: SessionStore, C: CompletionClient> AppState<S, C> {
    /// Build state around an already wired chat service.
    pub fn new(chat_service: ChatService<S, C>) -> Self {
        Self {
            chat_service: Arc::new(chat_service),
        }
    }
}

impl AppState<SqliteSessionStore, GeminiClient> {
    /// Initialize production state: connect to the database, wire the
    /// Gemini client and the prompt assembler.
    pub async fn init(
        api_key: SecretString,
        model: String,
        trigger_keyword: &str,
        data_dir: Option<PathBuf>,
    ) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir(data_dir);
        tokio::fs::create_dir_all(&data_dir).await?;

        let db_pool = DatabasePool::new(&database_url(&data_dir)).await?;
        let store = SqliteSessionStore::new(db_pool);
        let client = GeminiClient::new(api_key, model)?;
        let assembler = PromptAssembler::new(trigger_keyword);

        Ok(Self::new(ChatService::new(store, client, assembler)))
    }
}
