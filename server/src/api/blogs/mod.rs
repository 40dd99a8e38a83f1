//! Blogs API 模块
//!
//! 阅读公开，点赞需要登录，撰写和管理仅限管理员。

mod handler;

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/blogs", blog_routes())
}

fn blog_routes() -> Router<ServerState> {
    let admin = Router::new()
        .route("/", post(handler::create_post))
        .route(
            "/{id}",
            put(handler::update_post).delete(handler::delete_post),
        )
        .route_layer(axum_middleware::from_fn(require_admin));

    Router::new()
        .route("/", get(handler::list_posts))
        // 参数是 slug，与管理路由共用 {id} 占位符避免路由冲突
        .route("/{id}", get(handler::get_post_by_slug))
        .route("/{id}/like", put(handler::toggle_like))
        .merge(admin)
}
