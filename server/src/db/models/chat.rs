//! Chat Model
//!
//! 每个用户一条会话记录，消息内嵌存储。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// 消息发送方
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatSender {
    User,
    Admin,
}

/// 会话状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatStatus {
    Open,
    Closed,
}

impl Default for ChatStatus {
    fn default() -> Self {
        ChatStatus::Open
    }
}

/// 会话消息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: ChatSender,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub read: bool,
}

/// Chat model matching SurrealDB schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    pub user_name: String,
    pub user_email: String,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub status: ChatStatus,
    pub last_message: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
