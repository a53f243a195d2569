//! HTTP/REST API layer for Nutribot.
//!
//! Axum-based REST API under `/chat/` with permissive CORS and request
//! tracing.

pub mod error;
pub mod handlers;
pub mod router;
