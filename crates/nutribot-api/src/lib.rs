//! Nutribot REST API library.
//!
//! Exposed as a library so integration tests can build the router with
//! fake collaborators.

pub mod http;
pub mod state;
