use axum::{routing::get, Router};

use crate::handlers;
use crate::AppState;

/// Build the chat application routes
pub fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::chat_page))
        .route("/chat.js", get(handlers::chat_script))
        .route("/chat", get(handlers::send_message))
        .route("/sse", get(handlers::sse_stream))
        .route("/json", get(handlers::json_demo))
        .route("/echo", get(handlers::echo))
        .route("/health", get(handlers::health))
}
