//! Shared domain types for Nutribot.
//!
//! This crate contains the core domain types used across the Nutribot
//! service: Session, Turn, Sender, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod error;
