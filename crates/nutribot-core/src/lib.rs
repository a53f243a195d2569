//! Business logic and trait definitions for Nutribot.
//!
//! This crate defines the "ports" (the session store and completion client
//! traits) that the infrastructure layer implements. It depends only on
//! `nutribot-types` -- never on `nutribot-infra` or any database/IO crate.

pub mod chat;
pub mod llm;
