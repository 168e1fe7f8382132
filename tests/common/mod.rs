//! Test utilities and common setup.

use axum::Router;
use chatrelay::{routes, AppState};

/// Create a test application.
///
/// Also returns the state so tests can inspect the hub directly.
pub fn test_app() -> (Router, AppState) {
    let state = AppState::new();
    let app = Router::new()
        .merge(routes::chat_routes())
        .with_state(state.clone());
    (app, state)
}
