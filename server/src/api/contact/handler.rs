//! Contact API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{Contact, ContactStatus};
use crate::db::repository::ContactRepository;
use crate::utils::AppResult;

#[derive(Debug, Deserialize, Validate)]
pub struct ContactForm {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "message is required"))]
    pub message: String,
}

/// POST /api/contact - 提交联系表单 (公开)
pub async fn submit(
    State(state): State<ServerState>,
    Json(form): Json<ContactForm>,
) -> AppResult<(StatusCode, Json<Value>)> {
    form.validate()?;

    let repo = ContactRepository::new(state.db.clone());
    let contact = repo.create(form.name, form.email, form.message).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Thank you for contacting us! We will get back to you soon.",
            "contact": contact,
        })),
    ))
}

/// GET /api/contact - 所有留言 (管理员)
pub async fn list_messages(State(state): State<ServerState>) -> AppResult<Json<Vec<Contact>>> {
    let repo = ContactRepository::new(state.db.clone());
    Ok(Json(repo.find_all().await?))
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: ContactStatus,
}

/// PUT /api/contact/{id} - 更新处理状态 (管理员)
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(body): Json<StatusUpdate>,
) -> AppResult<Json<Contact>> {
    let repo = ContactRepository::new(state.db.clone());
    Ok(Json(repo.update_status(&id, body.status).await?))
}
