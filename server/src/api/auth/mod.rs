//! Auth API 模块

mod handler;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/auth", auth_routes())
}

fn auth_routes() -> Router<ServerState> {
    Router::new()
        .route("/register", post(handler::register))
        .route("/login", post(handler::login))
        .route("/profile", get(handler::profile).put(handler::update_profile))
        .route("/password", put(handler::change_password))
        .route("/account", delete(handler::delete_account))
        .route("/verify/{token}", get(handler::verify_email))
        .route("/forgot-password", post(handler::forgot_password))
        .route("/reset-password/{token}", post(handler::reset_password))
}
