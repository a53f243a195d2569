//! Completion client implementations.

pub mod gemini;
