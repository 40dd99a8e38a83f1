//! Wishlist Repository

use chrono::Utc;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Wishlist, WishlistItem};

const WISHLIST_TABLE: &str = "wishlist";

#[derive(Clone)]
pub struct WishlistRepository {
    base: BaseRepository,
}

impl WishlistRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Get the user's wishlist, creating an empty one on first access
    pub async fn find_or_create(&self, user: &RecordId) -> RepoResult<Wishlist> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM wishlist WHERE user = $user LIMIT 1")
            .bind(("user", user.to_string()))
            .await?;
        let existing: Vec<Wishlist> = result.take(0)?;
        if let Some(wishlist) = existing.into_iter().next() {
            return Ok(wishlist);
        }

        let wishlist = Wishlist {
            id: None,
            user: user.clone(),
            items: Vec::new(),
            created_at: Utc::now(),
        };
        let created: Option<Wishlist> = self
            .base
            .db()
            .create(WISHLIST_TABLE)
            .content(wishlist)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create wishlist".to_string()))
    }

    /// Add a menu item to the wishlist
    ///
    /// # 错误
    ///
    /// 已收藏的商品返回 Duplicate
    pub async fn add_item(&self, user: &RecordId, menu_item: RecordId) -> RepoResult<Wishlist> {
        let wishlist = self.find_or_create(user).await?;

        if wishlist.items.iter().any(|i| i.menu_item == menu_item) {
            return Err(RepoError::Duplicate("Item already in wishlist".into()));
        }

        let mut items = wishlist.items;
        items.push(WishlistItem {
            menu_item,
            added_at: Utc::now(),
        });
        self.replace_items(&wishlist.id, items).await
    }

    /// Remove one item from the wishlist
    pub async fn remove_item(&self, user: &RecordId, menu_item: &RecordId) -> RepoResult<Wishlist> {
        let wishlist = self.find_or_create(user).await?;
        let items: Vec<WishlistItem> = wishlist
            .items
            .iter()
            .filter(|i| &i.menu_item != menu_item)
            .cloned()
            .collect();
        self.replace_items(&wishlist.id, items).await
    }

    /// Remove all items
    pub async fn clear(&self, user: &RecordId) -> RepoResult<Wishlist> {
        let wishlist = self.find_or_create(user).await?;
        self.replace_items(&wishlist.id, Vec::new()).await
    }

    async fn replace_items(
        &self,
        id: &Option<RecordId>,
        items: Vec<WishlistItem>,
    ) -> RepoResult<Wishlist> {
        let thing = id
            .clone()
            .ok_or_else(|| RepoError::Database("Wishlist has no id".to_string()))?;
        let items_value = serde_json::to_value(&items)
            .map_err(|e| RepoError::Database(format!("Failed to serialize items: {e}")))?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET items = $items RETURN AFTER")
            .bind(("thing", thing))
            .bind(("items", items_value))
            .await?;
        result
            .take::<Option<Wishlist>>(0)?
            .ok_or_else(|| RepoError::NotFound("Wishlist not found".to_string()))
    }
}
