//! Orders API 模块
//!
//! 下单对游客开放；订单列表和状态变更仅限管理员。

mod handler;

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", order_routes())
}

fn order_routes() -> Router<ServerState> {
    let admin = Router::new()
        .route("/", get(handler::list_orders))
        .route("/{id}/status", put(handler::update_status))
        .route_layer(axum_middleware::from_fn(require_admin));

    Router::new()
        .route("/", post(handler::create_order))
        .route("/my", get(handler::my_orders))
        .route("/{id}", get(handler::get_order))
        .route("/customer/{email}", get(handler::orders_by_customer))
        .merge(admin)
}
