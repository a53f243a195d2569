//! Router assembly.

use axum::Json;
use axum::routing::{delete, get, post, put};
use axum::Router;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use nutribot_core::chat::store::SessionStore;
use nutribot_core::llm::client::CompletionClient;

use crate::http::handlers::chat;
use crate::state::AppState;

/// Build the application router with all routes and middleware.
pub fn build_router<S, C>(state: AppState<S, C>) -> Router
where
    S: SessionStore + 'static,
    C: CompletionClient + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Browser clients send both forms; axum treats them as distinct paths.
        .route("/chat", post(chat::send_message::<S, C>))
        .route("/chat/", post(chat::send_message::<S, C>))
        .route("/chat/new", post(chat::new_session::<S, C>))
        .route("/chat/clear/{session_id}", delete(chat::clear_session::<S, C>))
        .route("/chat/delete/{session_id}", delete(chat::delete_session::<S, C>))
        .route("/chat/edit", put(chat::edit_message::<S, C>))
        .route("/chat/history/{user_id}", get(chat::history::<S, C>))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// `GET /health` - liveness probe.
async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
