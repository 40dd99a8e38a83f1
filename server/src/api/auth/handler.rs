//! Auth API Handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};
use validator::Validate;

use shared::dto::{
    AuthResponse, ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, RegisterRequest,
    ResetPasswordRequest, UpdateProfileRequest, UserInfo,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Role, User};
use crate::db::repository::UserRepository;
use crate::security_log;
use crate::utils::validation::{normalize_email, random_token};
use crate::utils::{AppError, AppResult};

fn user_info(user: &User) -> UserInfo {
    UserInfo {
        id: user.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
        name: user.name.clone(),
        email: user.email.clone(),
        role: match user.role {
            Role::Admin => "admin".to_string(),
            Role::User => "user".to_string(),
        },
        is_verified: user.is_verified,
    }
}

fn auth_response(
    state: &ServerState,
    user: &User,
    message: Option<String>,
) -> AppResult<AuthResponse> {
    let info = user_info(user);
    let token = state
        .jwt_service
        .generate_token(&info.id)
        .map_err(|e| AppError::internal(format!("Failed to issue token: {e}")))?;
    Ok(AuthResponse {
        user: info,
        token,
        message,
    })
}

/// POST /api/auth/register - 注册账户
///
/// 验证邮件发送失败不影响注册结果，只记录日志。
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    req.validate()?;

    let email = normalize_email(&req.email);
    let verification_token = random_token()?;

    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .create(req.name, email.clone(), &req.password, verification_token.clone())
        .await?;

    if let Err(e) = state
        .email
        .send_verification_email(&email, &verification_token)
        .await
    {
        tracing::warn!("failed to send verification email to {}: {}", email, e);
    }

    security_log!("INFO", "user_registered", email = email);

    let response = auth_response(
        &state,
        &user,
        Some("Registration successful! Please check your email to verify your account.".into()),
    )?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/auth/login - 登录
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    req.validate()?;

    let email = normalize_email(&req.email);
    let repo = UserRepository::new(state.db.clone());

    let user = repo
        .find_by_email(&email)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    let ok = user
        .verify_password(&req.password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;
    if !ok {
        security_log!("WARN", "login_failed", email = email);
        return Err(AppError::invalid_credentials());
    }

    Ok(Json(auth_response(&state, &user, None)?))
}

/// GET /api/auth/profile - 当前用户资料
pub async fn profile(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<User>> {
    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .find_by_id(&current.id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;
    Ok(Json(user))
}

/// PUT /api/auth/profile - 更新资料，换发新令牌
pub async fn update_profile(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<UpdateProfileRequest>,
) -> AppResult<Json<AuthResponse>> {
    let email = req.email.map(|e| normalize_email(&e));
    let repo = UserRepository::new(state.db.clone());
    let user = repo.update_profile(&current.id, req.name, email).await?;
    Ok(Json(auth_response(&state, &user, None)?))
}

/// PUT /api/auth/password - 修改密码
pub async fn change_password(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<ChangePasswordRequest>,
) -> AppResult<Json<Value>> {
    req.validate()?;

    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .find_by_id(&current.id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;

    let ok = user
        .verify_password(&req.current_password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;
    if !ok {
        return Err(AppError::invalid("Current password is incorrect"));
    }

    repo.update_password(&current.id, &req.new_password).await?;
    security_log!("INFO", "password_changed", user_id = current.id);

    Ok(Json(json!({ "message": "Password updated successfully" })))
}

/// DELETE /api/auth/account - 删除账户
pub async fn delete_account(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<Value>> {
    let repo = UserRepository::new(state.db.clone());
    repo.delete(&current.id).await?;
    security_log!("INFO", "account_deleted", user_id = current.id);
    Ok(Json(json!({ "message": "Account deleted successfully" })))
}

/// GET /api/auth/verify/{token} - 验证邮箱
pub async fn verify_email(
    State(state): State<ServerState>,
    Path(token): Path<String>,
) -> AppResult<Json<Value>> {
    let repo = UserRepository::new(state.db.clone());
    repo.verify_email(&token)
        .await?
        .ok_or_else(|| AppError::invalid("Invalid or expired verification token"))?;

    Ok(Json(json!({
        "message": "Email verified successfully! You can now login."
    })))
}

/// POST /api/auth/forgot-password - 发起密码重置
///
/// 邮件发送失败时回滚重置令牌并返回错误，避免留下无法投递的令牌。
pub async fn forgot_password(
    State(state): State<ServerState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> AppResult<Json<Value>> {
    req.validate()?;

    let email = normalize_email(&req.email);
    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .find_by_email(&email)
        .await?
        .ok_or_else(|| AppError::not_found("No user found with this email"))?;
    let user_id = user.id.as_ref().map(|id| id.to_string()).unwrap_or_default();

    let token = random_token()?;
    repo.set_reset_token(&user_id, token.clone()).await?;

    if let Err(e) = state.email.send_password_reset_email(&email, &token).await {
        tracing::error!("failed to send reset email to {}: {}", email, e);
        repo.clear_reset_token(&user_id).await?;
        return Err(AppError::internal(
            "Failed to send reset email. Please try again.",
        ));
    }

    security_log!("INFO", "password_reset_requested", email = email);
    Ok(Json(json!({ "message": "Password reset link sent to your email" })))
}

/// POST /api/auth/reset-password/{token} - 用重置令牌设置新密码
pub async fn reset_password(
    State(state): State<ServerState>,
    Path(token): Path<String>,
    Json(req): Json<ResetPasswordRequest>,
) -> AppResult<Json<Value>> {
    req.validate()?;

    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .reset_password(&token, &req.password)
        .await?
        .ok_or_else(|| AppError::invalid("Invalid or expired reset token"))?;

    security_log!("INFO", "password_reset", email = user.email);
    Ok(Json(json!({
        "message": "Password reset successful! You can now login with your new password."
    })))
}
