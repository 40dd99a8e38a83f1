//! Addresses API 模块
//!
//! 全部接口要求登录，并校验地址归属。

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/addresses", address_routes())
}

fn address_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list_addresses).post(handler::create_address))
        .route(
            "/{id}",
            put(handler::update_address).delete(handler::delete_address),
        )
        .route("/{id}/default", put(handler::set_default))
}
