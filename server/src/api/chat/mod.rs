//! Chat API 模块
//!
//! 每个用户一条会话。客户端接口要求登录，管理端接口要求管理员。

mod handler;

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/chat", chat_routes())
}

fn chat_routes() -> Router<ServerState> {
    let admin = Router::new()
        .route("/admin", get(handler::list_chats))
        .route("/{chat_id}/admin-message", post(handler::admin_reply))
        .route("/{chat_id}/close", put(handler::close_chat))
        .route_layer(axum_middleware::from_fn(require_admin));

    Router::new()
        .route("/", get(handler::my_chat))
        .route("/message", post(handler::send_message))
        .route("/{chat_id}/read", put(handler::mark_read))
        .merge(admin)
}
