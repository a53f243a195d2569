//! Conversation handling: session persistence port, transcript rendering,
//! prompt assembly, and the chat service that ties them together.

pub mod prompt;
pub mod service;
pub mod store;
pub mod transcript;
