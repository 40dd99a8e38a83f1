//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 注册、登录和账户管理
//! - [`menu`] - 菜单浏览和管理
//! - [`orders`] - 下单和订单状态
//! - [`loyalty`] - 积分与等级
//! - [`reviews`] - 商品评论
//! - [`addresses`] - 配送地址
//! - [`wishlist`] - 收藏
//! - [`blogs`] - 博客文章
//! - [`chat`] - 客服会话
//! - [`contact`] - 联系表单
//! - [`admin`] - 管理后台

pub mod addresses;
pub mod admin;
pub mod auth;
pub mod blogs;
pub mod chat;
pub mod contact;
pub mod health;
pub mod loyalty;
pub mod menu;
pub mod orders;
pub mod reviews;
pub mod wishlist;

use axum::Router;
use axum::middleware as axum_middleware;
use axum::routing::get;
use http::{HeaderName, HeaderValue, Method};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;
use crate::message::ws;

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        Some(RequestId::new(HeaderValue::from_str(&id).unwrap()))
    }
}

/// Build a router with all routes registered (no middleware)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(menu::router())
        .merge(orders::router())
        .merge(loyalty::router())
        .merge(reviews::router())
        .merge(addresses::router())
        .merge(wishlist::router())
        .merge(blogs::router())
        .merge(chat::router())
        .merge(contact::router())
        .merge(admin::router())
        // 事件通道 (令牌在查询参数里验证)
        .route("/api/events/ws", get(ws::events_ws))
}

/// Build a fully configured application with all middleware and state
pub fn build_app(state: ServerState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(
            state
                .config
                .client_url
                .parse::<HeaderValue>()
                .unwrap_or_else(|_| HeaderValue::from_static("*")),
        )
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            http::header::AUTHORIZATION,
            http::header::CONTENT_TYPE,
        ]);

    build_router()
        // 静态文件 (商品图片等)
        .fallback_service(ServeDir::new(state.config.public_dir()))
        // ========== Tower HTTP Middleware ==========
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        // JWT 认证 - 在路由前执行，注入 CurrentUser
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_auth,
        ))
        .with_state(state)
}
