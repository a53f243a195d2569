//! Infrastructure layer for Nutribot.
//!
//! Contains implementations of the traits defined in `nutribot-core`:
//! SQLite session storage and the Gemini completion client, plus data
//! directory resolution.

pub mod config;
pub mod llm;
pub mod sqlite;
