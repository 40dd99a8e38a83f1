//! Contact API 模块
//!
//! 表单提交公开，查看和处理仅限管理员。

mod handler;

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/contact", contact_routes())
}

fn contact_routes() -> Router<ServerState> {
    let admin = Router::new()
        .route("/", get(handler::list_messages))
        .route("/{id}", put(handler::update_status))
        .route_layer(axum_middleware::from_fn(require_admin));

    Router::new()
        .route("/", post(handler::submit))
        .merge(admin)
}
