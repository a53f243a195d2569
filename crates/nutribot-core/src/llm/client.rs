//! CompletionClient trait definition.
//!
//! A single-prompt-in, text-out abstraction over the external
//! text-completion service. Implementations live in nutribot-infra
//! (e.g., `GeminiClient`).

use nutribot_types::error::CompletionError;

/// Trait for text-completion backends.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition). The prompt
/// is a fully assembled string; the implementation treats it as opaque.
pub trait CompletionClient: Send + Sync {
    /// Send the prompt and return the generated text.
    ///
    /// An empty string is a valid success value (the service returned no
    /// usable text); the chat service substitutes a placeholder reply.
    fn complete(
        &self,
        prompt: &str,
    ) -> impl std::future::Future<Output = Result<String, CompletionError>> + Send;
}
