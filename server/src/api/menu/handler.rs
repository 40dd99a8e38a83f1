//! Menu API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::core::ServerState;
use crate::db::models::{Dietary, MenuCategory, MenuItem, MenuItemCreate, MenuItemUpdate};
use crate::db::repository::MenuItemRepository;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct MenuQuery {
    pub category: Option<MenuCategory>,
    pub dietary: Option<Dietary>,
    pub search: Option<String>,
}

/// GET /api/menu - 可售商品列表，支持分类/饮食标签/搜索过滤
pub async fn list_items(
    State(state): State<ServerState>,
    Query(query): Query<MenuQuery>,
) -> AppResult<Json<Vec<MenuItem>>> {
    let repo = MenuItemRepository::new(state.db.clone());
    let items = repo
        .find_available(query.category, query.dietary, query.search)
        .await?;
    Ok(Json(items))
}

/// GET /api/menu/{id}
pub async fn get_item(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<MenuItem>> {
    let repo = MenuItemRepository::new(state.db.clone());
    let item = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Menu item"))?;
    Ok(Json(item))
}

/// POST /api/menu - 新建商品 (管理员)
pub async fn create_item(
    State(state): State<ServerState>,
    Json(data): Json<MenuItemCreate>,
) -> AppResult<(StatusCode, Json<MenuItem>)> {
    let repo = MenuItemRepository::new(state.db.clone());
    let item = repo.create(data).await?;
    tracing::info!("menu item created: {}", item.name);
    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /api/menu/{id} - 更新商品 (管理员)
pub async fn update_item(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(data): Json<MenuItemUpdate>,
) -> AppResult<Json<MenuItem>> {
    let repo = MenuItemRepository::new(state.db.clone());
    let item = repo.update(&id, data).await?;
    Ok(Json(item))
}

/// DELETE /api/menu/{id} - 删除商品 (管理员)
pub async fn delete_item(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let repo = MenuItemRepository::new(state.db.clone());
    repo.delete(&id).await?;
    Ok(Json(json!({ "message": "Menu item deleted successfully" })))
}
