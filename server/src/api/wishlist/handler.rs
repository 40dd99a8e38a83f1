//! Wishlist API Handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::Wishlist;
use crate::db::repository::{MenuItemRepository, WishlistRepository, parse_record_id};
use crate::utils::{AppError, AppResult};

/// GET /api/wishlist - 当前用户的收藏，首次访问时创建空收藏
pub async fn get_wishlist(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<Wishlist>> {
    let user = parse_record_id(&current.id)?;
    let repo = WishlistRepository::new(state.db.clone());
    Ok(Json(repo.find_or_create(&user).await?))
}

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub menu_item_id: String,
}

/// POST /api/wishlist - 收藏商品
pub async fn add_item(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<AddItemRequest>,
) -> AppResult<Json<Wishlist>> {
    let menu_item = parse_record_id(&req.menu_item_id)?;

    let items = MenuItemRepository::new(state.db.clone());
    if items.find_by_id(&req.menu_item_id).await?.is_none() {
        return Err(AppError::not_found("Menu item"));
    }

    let user = parse_record_id(&current.id)?;
    let repo = WishlistRepository::new(state.db.clone());
    Ok(Json(repo.add_item(&user, menu_item).await?))
}

/// DELETE /api/wishlist/{item_id} - 取消收藏
pub async fn remove_item(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(item_id): Path<String>,
) -> AppResult<Json<Wishlist>> {
    let menu_item = parse_record_id(&item_id)?;
    let user = parse_record_id(&current.id)?;
    let repo = WishlistRepository::new(state.db.clone());
    Ok(Json(repo.remove_item(&user, &menu_item).await?))
}

/// DELETE /api/wishlist - 清空收藏
pub async fn clear_wishlist(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<Wishlist>> {
    let user = parse_record_id(&current.id)?;
    let repo = WishlistRepository::new(state.db.clone());
    Ok(Json(repo.clear(&user).await?))
}
