//! Loyalty API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/loyalty", loyalty_routes())
}

fn loyalty_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::loyalty_info))
        .route("/redeem", post(handler::redeem_points))
        .route("/rewards", get(handler::rewards_catalog))
}
