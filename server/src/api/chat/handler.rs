//! Chat API Handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use shared::message::{BusMessage, ChatMessagePayload};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Chat, ChatSender};
use crate::db::repository::{ChatRepository, parse_record_id};
use crate::utils::{AppError, AppResult};

fn chat_payload(chat: &Chat, sender: ChatSender, text: &str) -> ChatMessagePayload {
    ChatMessagePayload {
        chat_id: chat.id.as_ref().map(|i| i.to_string()).unwrap_or_default(),
        user_id: chat.user.to_string(),
        sender: match sender {
            ChatSender::User => "user".to_string(),
            ChatSender::Admin => "admin".to_string(),
        },
        text: text.to_string(),
        sent_at: chrono::Utc::now(),
    }
}

/// GET /api/chat - 当前用户的会话，首次访问时创建
pub async fn my_chat(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<Chat>> {
    let user = parse_record_id(&current.id)?;
    let repo = ChatRepository::new(state.db.clone());
    let chat = repo
        .find_or_create_for_user(&user, &current.name, &current.email)
        .await?;
    Ok(Json(chat))
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub message: String,
}

/// POST /api/chat/message - 客户发消息
pub async fn send_message(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<SendMessageRequest>,
) -> AppResult<(StatusCode, Json<Chat>)> {
    if req.message.trim().is_empty() {
        return Err(AppError::validation("message cannot be empty"));
    }

    let user = parse_record_id(&current.id)?;
    let repo = ChatRepository::new(state.db.clone());
    let chat = repo
        .find_or_create_for_user(&user, &current.name, &current.email)
        .await?;
    let chat_id = chat
        .id
        .as_ref()
        .map(|i| i.to_string())
        .ok_or_else(|| AppError::internal("Chat has no id"))?;

    let chat = repo
        .append_message(&chat_id, ChatSender::User, req.message.clone())
        .await?;

    state.publish(BusMessage::new_chat_message(&chat_payload(
        &chat,
        ChatSender::User,
        &req.message,
    )));

    Ok((StatusCode::CREATED, Json(chat)))
}

/// GET /api/chat/admin - 所有会话，按最近活跃排序 (管理员)
pub async fn list_chats(State(state): State<ServerState>) -> AppResult<Json<Vec<Chat>>> {
    let repo = ChatRepository::new(state.db.clone());
    Ok(Json(repo.find_all().await?))
}

/// POST /api/chat/{chat_id}/admin-message - 管理员回复
pub async fn admin_reply(
    State(state): State<ServerState>,
    Path(chat_id): Path<String>,
    Json(req): Json<SendMessageRequest>,
) -> AppResult<(StatusCode, Json<Chat>)> {
    if req.message.trim().is_empty() {
        return Err(AppError::validation("message cannot be empty"));
    }

    let repo = ChatRepository::new(state.db.clone());
    let chat = repo
        .append_message(&chat_id, ChatSender::Admin, req.message.clone())
        .await?;

    // 只推送到会话所属用户的房间
    state.publish(BusMessage::admin_chat_message(
        &chat.user.to_string(),
        &chat_payload(&chat, ChatSender::Admin, &req.message),
    ));

    Ok((StatusCode::CREATED, Json(chat)))
}

/// PUT /api/chat/{chat_id}/close - 关闭会话 (管理员)
pub async fn close_chat(
    State(state): State<ServerState>,
    Path(chat_id): Path<String>,
) -> AppResult<Json<Chat>> {
    let repo = ChatRepository::new(state.db.clone());
    Ok(Json(repo.close(&chat_id).await?))
}

/// PUT /api/chat/{chat_id}/read - 把管理员消息标记为已读 (会话归属人或管理员)
pub async fn mark_read(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(chat_id): Path<String>,
) -> AppResult<Json<Chat>> {
    let repo = ChatRepository::new(state.db.clone());
    let chat = repo
        .find_by_id(&chat_id)
        .await?
        .ok_or_else(|| AppError::not_found("Chat"))?;

    if chat.user.to_string() != current.id && !current.is_admin() {
        return Err(AppError::forbidden("Not your chat"));
    }

    Ok(Json(repo.mark_read(&chat_id).await?))
}
