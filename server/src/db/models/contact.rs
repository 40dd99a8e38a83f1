//! Contact Message Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// 留言处理状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    Pending,
    Read,
    Resolved,
}

impl Default for ContactStatus {
    fn default() -> Self {
        ContactStatus::Pending
    }
}

/// Contact message matching SurrealDB schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(default)]
    pub status: ContactStatus,
    pub created_at: DateTime<Utc>,
}
