//! Review Model
//!
//! 每个用户对每个商品最多一条评论。用户名在创建时快照，
//! 避免读取时联表拉出整个用户记录。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Review model matching SurrealDB schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    pub user_name: String,
    #[serde(with = "serde_helpers::record_id")]
    pub menu_item: RecordId,
    /// 1-5 星
    pub rating: u8,
    pub comment: String,
    #[serde(default)]
    pub images: Vec<String>,
    /// 标记有用的用户
    #[serde(default, with = "serde_helpers::vec_record_id")]
    pub helpful: Vec<RecordId>,
    pub created_at: DateTime<Utc>,
}

/// Create review payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewCreate {
    pub menu_item: String,
    pub rating: u8,
    pub comment: String,
    #[serde(default)]
    pub images: Option<Vec<String>>,
}

/// Update review payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}
