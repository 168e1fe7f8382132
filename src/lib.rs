//! Minimal real-time chat broadcaster.
//!
//! Messages posted to `/chat` are fanned out through an in-process [`hub::Hub`]
//! to every viewer holding open a `/sse` Server-Sent Events connection.
//! Nothing is persisted: viewers only see messages published while they are
//! connected.

use std::sync::Arc;

pub mod handlers;
pub mod hub;
pub mod routes;
pub mod stream;

use hub::Hub;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Process-wide broadcast hub
    pub hub: Arc<Hub>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            hub: Arc::new(Hub::new()),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
