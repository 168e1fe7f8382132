use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error};

use crate::stream::EventStream;
use crate::AppState;

/// Query parameters for the publish endpoint
#[derive(Debug, Deserialize)]
pub struct ChatQuery {
    /// Message text to broadcast
    pub message: Option<String>,
}

/// Query parameters for the echo endpoint
#[derive(Debug, Deserialize)]
pub struct EchoQuery {
    #[serde(default)]
    pub input: String,
}

/// Echo endpoint response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EchoResponse {
    pub normal: String,
    pub shouty: String,
    pub char_count: usize,
    pub backwards: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub subscribers: usize,
}

/// Serve the chat page
pub async fn chat_page() -> Html<&'static str> {
    Html(include_str!("../assets/chat.html"))
}

/// Serve the client script for the chat page
pub async fn chat_script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        include_str!("../assets/chat.js"),
    )
}

/// Publish a chat message to all connected viewers.
///
/// A missing or empty `message` parameter is a silent no-op; the response is
/// an empty 200 either way. The message is broadcast unchanged: no escaping
/// and no length limit.
pub async fn send_message(
    State(state): State<AppState>,
    Query(query): Query<ChatQuery>,
) -> StatusCode {
    match query.message.as_deref() {
        Some(message) if !message.is_empty() => {
            debug!("broadcasting message ({} bytes)", message.len());
            state.hub.publish(message);
        }
        _ => debug!("ignoring publish request without a message"),
    }
    StatusCode::OK
}

/// Open a Server-Sent Events stream of chat messages.
///
/// The connection stays open until the client disconnects; each published
/// message arrives as a `data: <message>\n\n` frame. Nothing is replayed to
/// late joiners.
pub async fn sse_stream(State(state): State<AppState>) -> Result<Response, StatusCode> {
    let stream = EventStream::new(state.hub.clone());

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CONNECTION, "keep-alive")
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from_stream(stream))
        .map_err(|e| {
            error!("failed to build SSE response: {:?}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

/// Demo JSON endpoint
pub async fn json_demo() -> impl IntoResponse {
    Json(json!({
        "text": "hi",
        "numbers": [1, 2, 3],
    }))
}

/// Echo the input string back in a few shapes
pub async fn echo(Query(query): Query<EchoQuery>) -> Json<EchoResponse> {
    let input = query.input;
    Json(EchoResponse {
        shouty: input.to_uppercase(),
        char_count: input.chars().count(),
        backwards: input.chars().rev().collect(),
        normal: input,
    })
}

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        subscribers: state.hub.subscriber_count(),
    })
}
