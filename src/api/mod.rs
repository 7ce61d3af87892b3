pub mod chat;
pub mod health;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub fn api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/chat", post(chat::relay_chat))
        .route("/api/health", get(health::health_check))
        .route("/health", get(health::health_check))
        .with_state(state)
}
