//! Menu API 模块
//!
//! 浏览接口公开，增删改仅限管理员。

mod handler;

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/menu", menu_routes())
}

fn menu_routes() -> Router<ServerState> {
    let admin = Router::new()
        .route("/", post(handler::create_item))
        .route(
            "/{id}",
            put(handler::update_item).delete(handler::delete_item),
        )
        .route_layer(axum_middleware::from_fn(require_admin));

    Router::new()
        .route("/", get(handler::list_items))
        .route("/{id}", get(handler::get_item))
        .merge(admin)
}
