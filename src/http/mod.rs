//! HTTP surface: router, shared state and handlers.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::gateway::ContactGateway;

mod contacts;
mod ping;

pub use contacts::{create_contact, get_contacts};
pub use ping::ping;

/// Per-process handler state; cloned into every request.
#[derive(Clone)]
pub struct AppState {
    pub contacts: Arc<dyn ContactGateway>,
}

impl AppState {
    pub fn new(contacts: Arc<dyn ContactGateway>) -> Self {
        Self { contacts }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/contacts", post(create_contact).get(get_contacts))
        .route("/ping", get(ping))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
