//! Wishlist Model
//!
//! 每个用户一条收藏记录，条目内嵌存储。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// 收藏条目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishlistItem {
    #[serde(with = "serde_helpers::record_id")]
    pub menu_item: RecordId,
    pub added_at: DateTime<Utc>,
}

/// Wishlist model matching SurrealDB schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wishlist {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    #[serde(default)]
    pub items: Vec<WishlistItem>,
    pub created_at: DateTime<Utc>,
}
