//! Menu Item Repository

use chrono::Utc;

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Dietary, MenuCategory, MenuItem, MenuItemCreate, MenuItemUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const MENU_TABLE: &str = "menu_item";

#[derive(Clone)]
pub struct MenuItemRepository {
    base: BaseRepository,
}

impl MenuItemRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find available items, optionally filtered by category, dietary tag
    /// and case-insensitive name/description search
    pub async fn find_available(
        &self,
        category: Option<MenuCategory>,
        dietary: Option<Dietary>,
        search: Option<String>,
    ) -> RepoResult<Vec<MenuItem>> {
        let mut clauses = vec!["available = true"];
        if category.is_some() {
            clauses.push("category = $category");
        }
        if dietary.is_some() {
            clauses.push("dietary CONTAINS $dietary");
        }
        if search.is_some() {
            clauses.push(
                "(string::lowercase(name) CONTAINS $search OR string::lowercase(description) CONTAINS $search)",
            );
        }

        let query_str = format!(
            "SELECT * FROM menu_item WHERE {} ORDER BY name",
            clauses.join(" AND ")
        );

        let mut query = self.base.db().query(query_str);
        if let Some(v) = category {
            query = query.bind(("category", v));
        }
        if let Some(v) = dietary {
            query = query.bind(("dietary", v));
        }
        if let Some(v) = search {
            query = query.bind(("search", v.to_lowercase()));
        }

        let items: Vec<MenuItem> = query.await?.take(0)?;
        Ok(items)
    }

    /// All items including unavailable (admin view)
    pub async fn find_all(&self) -> RepoResult<Vec<MenuItem>> {
        let items: Vec<MenuItem> = self
            .base
            .db()
            .query("SELECT * FROM menu_item ORDER BY name")
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Find item by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<MenuItem>> {
        let thing = parse_record_id(id)?;
        let item: Option<MenuItem> = self.base.db().select(thing).await?;
        Ok(item)
    }

    /// Create a new menu item
    pub async fn create(&self, data: MenuItemCreate) -> RepoResult<MenuItem> {
        if data.price < 0.0 {
            return Err(RepoError::Validation("price cannot be negative".into()));
        }

        let item = MenuItem {
            id: None,
            name: data.name,
            description: data.description,
            price: data.price,
            image: data.image,
            category: data.category.unwrap_or_default(),
            available: data.available.unwrap_or(true),
            dietary: data.dietary.unwrap_or_default(),
            customizations: data.customizations.unwrap_or_default(),
            rating: 0.0,
            review_count: 0,
            tags: data.tags.unwrap_or_default(),
            created_at: Utc::now(),
        };

        let created: Option<MenuItem> =
            self.base.db().create(MENU_TABLE).content(item).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create menu item".to_string()))
    }

    /// Update a menu item
    pub async fn update(&self, id: &str, data: MenuItemUpdate) -> RepoResult<MenuItem> {
        let thing = parse_record_id(id)?;

        if let Some(price) = data.price
            && price < 0.0
        {
            return Err(RepoError::Validation("price cannot be negative".into()));
        }

        let mut set_parts: Vec<&str> = Vec::new();
        if data.name.is_some() { set_parts.push("name = $name"); }
        if data.description.is_some() { set_parts.push("description = $description"); }
        if data.price.is_some() { set_parts.push("price = $price"); }
        if data.image.is_some() { set_parts.push("image = $image"); }
        if data.category.is_some() { set_parts.push("category = $category"); }
        if data.available.is_some() { set_parts.push("available = $available"); }
        if data.dietary.is_some() { set_parts.push("dietary = $dietary"); }
        if data.customizations.is_some() { set_parts.push("customizations = $customizations"); }
        if data.tags.is_some() { set_parts.push("tags = $tags"); }

        if set_parts.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)));
        }

        let query_str = format!("UPDATE $thing SET {} RETURN AFTER", set_parts.join(", "));
        let mut query = self.base.db().query(query_str).bind(("thing", thing));

        if let Some(v) = data.name { query = query.bind(("name", v)); }
        if let Some(v) = data.description { query = query.bind(("description", v)); }
        if let Some(v) = data.price { query = query.bind(("price", v)); }
        if let Some(v) = data.image { query = query.bind(("image", v)); }
        if let Some(v) = data.category { query = query.bind(("category", v)); }
        if let Some(v) = data.available { query = query.bind(("available", v)); }
        if let Some(v) = data.dietary { query = query.bind(("dietary", v)); }
        if let Some(v) = data.customizations {
            query = query.bind(("customizations", serde_json::to_value(&v).unwrap_or_default()));
        }
        if let Some(v) = data.tags { query = query.bind(("tags", v)); }

        let mut result = query.await?;
        let items: Vec<MenuItem> = result.take(0)?;
        items
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)))
    }

    /// Hard delete a menu item
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let thing = parse_record_id(id)?;
        let deleted: Option<MenuItem> = self.base.db().delete(thing).await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound(format!("Menu item {} not found", id)));
        }
        Ok(())
    }

    /// Total item count
    pub async fn count(&self) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query("SELECT VALUE count FROM (SELECT count() FROM menu_item GROUP ALL)")
            .await?;
        let counts: Vec<i64> = result.take(0)?;
        Ok(counts.into_iter().next().unwrap_or(0))
    }
}
