//! Repository Module
//!
//! Provides CRUD operations for SurrealDB tables.

// Accounts
pub mod user;

// Catalog
pub mod menu_item;

// Orders
pub mod order;

// Engagement
pub mod address;
pub mod blog;
pub mod chat;
pub mod contact;
pub mod review;
pub mod wishlist;

// Re-exports
pub use address::AddressRepository;
pub use blog::BlogRepository;
pub use chat::ChatRepository;
pub use contact::ContactRepository;
pub use menu_item::MenuItemRepository;
pub use order::OrderRepository;
pub use review::ReviewRepository;
pub use user::UserRepository;
pub use wishlist::WishlistRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: 全栈统一使用 "table:id" 格式
// =============================================================================
//
// 使用 surrealdb::RecordId 处理所有 ID：
//   - 解析: let id: RecordId = "user:abc".parse()?;
//   - CRUD: db.select(id) / db.delete(id) 直接使用 RecordId
//   - 关联字段 (order.user, review.menu_item 等) 以 "table:id" 字符串存储，
//     WHERE 条件绑定字符串而不是原生 RecordId

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

/// 解析 "table:id" 字符串，格式非法时返回 Validation 错误
pub(crate) fn parse_record_id(id: &str) -> RepoResult<surrealdb::RecordId> {
    id.parse()
        .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))
}
