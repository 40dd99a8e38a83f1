//! Reviews API 模块
//!
//! 查看某商品的评论公开，发表和管理需要登录。

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reviews", review_routes())
}

fn review_routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create_review))
        .route("/menu/{menu_item_id}", get(handler::reviews_for_item))
        .route(
            "/{id}",
            put(handler::update_review).delete(handler::delete_review),
        )
        .route("/{id}/helpful", put(handler::toggle_helpful))
}
