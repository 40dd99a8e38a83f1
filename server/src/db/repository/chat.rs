//! Chat Repository
//!
//! 消息内嵌在会话记录里，写入时整体替换消息数组。

use chrono::Utc;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Chat, ChatMessage, ChatSender, ChatStatus};

const CHAT_TABLE: &str = "chat";

#[derive(Clone)]
pub struct ChatRepository {
    base: BaseRepository,
}

impl ChatRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Get the user's chat, creating an empty open one on first access
    pub async fn find_or_create_for_user(
        &self,
        user: &RecordId,
        user_name: &str,
        user_email: &str,
    ) -> RepoResult<Chat> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM chat WHERE user = $user LIMIT 1")
            .bind(("user", user.to_string()))
            .await?;
        let existing: Vec<Chat> = result.take(0)?;
        if let Some(chat) = existing.into_iter().next() {
            return Ok(chat);
        }

        let now = Utc::now();
        let chat = Chat {
            id: None,
            user: user.clone(),
            user_name: user_name.to_string(),
            user_email: user_email.to_string(),
            messages: Vec::new(),
            status: ChatStatus::Open,
            last_message: now,
            created_at: now,
        };
        let created: Option<Chat> = self.base.db().create(CHAT_TABLE).content(chat).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create chat".to_string()))
    }

    /// Append a message to a chat by id
    pub async fn append_message(
        &self,
        chat_id: &str,
        sender: ChatSender,
        message: String,
    ) -> RepoResult<Chat> {
        let chat = self
            .find_by_id(chat_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Chat {} not found", chat_id)))?;

        let now = Utc::now();
        let mut messages = chat.messages;
        messages.push(ChatMessage {
            sender,
            message,
            timestamp: now,
            read: false,
        });

        self.replace_messages(chat_id, messages, Some(now)).await
    }

    /// All chats, most recently active first (admin view)
    pub async fn find_all(&self) -> RepoResult<Vec<Chat>> {
        let chats: Vec<Chat> = self
            .base
            .db()
            .query("SELECT * FROM chat ORDER BY last_message DESC")
            .await?
            .take(0)?;
        Ok(chats)
    }

    /// Find chat by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Chat>> {
        let thing = parse_record_id(id)?;
        let chat: Option<Chat> = self.base.db().select(thing).await?;
        Ok(chat)
    }

    /// Close a chat
    pub async fn close(&self, id: &str) -> RepoResult<Chat> {
        let thing = parse_record_id(id)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET status = 'closed' RETURN AFTER")
            .bind(("thing", thing))
            .await?;
        result
            .take::<Option<Chat>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Chat {} not found", id)))
    }

    /// Mark all admin messages in a chat as read
    pub async fn mark_read(&self, id: &str) -> RepoResult<Chat> {
        let chat = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Chat {} not found", id)))?;

        let messages: Vec<ChatMessage> = chat
            .messages
            .into_iter()
            .map(|mut msg| {
                if msg.sender != ChatSender::User {
                    msg.read = true;
                }
                msg
            })
            .collect();

        self.replace_messages(id, messages, None).await
    }

    async fn replace_messages(
        &self,
        id: &str,
        messages: Vec<ChatMessage>,
        last_message: Option<chrono::DateTime<Utc>>,
    ) -> RepoResult<Chat> {
        let thing = parse_record_id(id)?;
        let messages_value = serde_json::to_value(&messages)
            .map_err(|e| RepoError::Database(format!("Failed to serialize messages: {e}")))?;

        let query_str = if last_message.is_some() {
            "UPDATE $thing SET messages = $messages, last_message = $last_message RETURN AFTER"
        } else {
            "UPDATE $thing SET messages = $messages RETURN AFTER"
        };

        let mut query = self
            .base
            .db()
            .query(query_str)
            .bind(("thing", thing))
            .bind(("messages", messages_value));
        if let Some(ts) = last_message {
            query = query.bind(("last_message", ts));
        }

        let mut result = query.await?;
        result
            .take::<Option<Chat>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Chat {} not found", id)))
    }
}
