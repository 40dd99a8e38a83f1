//! Admin API 模块
//!
//! 仪表盘统计和用户管理，整组路由挂管理员中间件。

mod handler;

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{delete, get, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/admin", admin_routes())
}

fn admin_routes() -> Router<ServerState> {
    Router::new()
        .route("/stats", get(handler::dashboard_stats))
        .route("/users", get(handler::list_users))
        .route("/users/{id}", delete(handler::delete_user))
        .route("/users/{id}/role", put(handler::update_role))
        .route("/menu", get(handler::list_all_menu))
        .route("/blogs", get(handler::list_all_blogs))
        .route_layer(axum_middleware::from_fn(require_admin))
}
