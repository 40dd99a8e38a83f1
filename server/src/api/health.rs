//! 健康检查接口

use axum::{Json, Router, extract::State, routing::get};
use serde_json::{Value, json};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/health", get(health))
}

/// GET /api/health
async fn health(State(state): State<ServerState>) -> Json<Value> {
    Json(json!({
        "status": "OK",
        "message": "Server is running",
        "environment": state.config.environment,
        "subscribers": state.message_bus().subscriber_count(),
    }))
}
