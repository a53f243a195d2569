//! Completion service abstraction.
//!
//! The `CompletionClient` trait is the seam between the chat service and
//! the external text-generation provider. The concrete implementation
//! lives in nutribot-infra.

pub mod client;
