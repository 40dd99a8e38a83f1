//! Reviews API Handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Review, ReviewCreate, ReviewUpdate};
use crate::db::repository::{MenuItemRepository, ReviewRepository, parse_record_id};
use crate::utils::{AppError, AppResult};

/// POST /api/reviews - 发表评论
pub async fn create_review(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Json(data): Json<ReviewCreate>,
) -> AppResult<(StatusCode, Json<Review>)> {
    let menu_item = parse_record_id(&data.menu_item)?;

    let items = MenuItemRepository::new(state.db.clone());
    if items.find_by_id(&data.menu_item).await?.is_none() {
        return Err(AppError::not_found("Menu item"));
    }

    let user = parse_record_id(&current.id)?;
    let repo = ReviewRepository::new(state.db.clone());
    let review = repo
        .create(
            user,
            current.name.clone(),
            menu_item.clone(),
            data.rating,
            data.comment,
            data.images.unwrap_or_default(),
        )
        .await?;

    repo.recompute_rating(&menu_item).await?;

    Ok((StatusCode::CREATED, Json(review)))
}

/// GET /api/reviews/menu/{menu_item_id} - 某商品的评论
pub async fn reviews_for_item(
    State(state): State<ServerState>,
    Path(menu_item_id): Path<String>,
) -> AppResult<Json<Vec<Review>>> {
    let menu_item = parse_record_id(&menu_item_id)?;
    let repo = ReviewRepository::new(state.db.clone());
    Ok(Json(repo.find_for_item(&menu_item).await?))
}

/// PUT /api/reviews/{id} - 修改自己的评论
pub async fn update_review(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(data): Json<ReviewUpdate>,
) -> AppResult<Json<Review>> {
    let repo = ReviewRepository::new(state.db.clone());
    let existing = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Review"))?;

    if existing.user.to_string() != current.id {
        return Err(AppError::forbidden("You can only edit your own reviews"));
    }

    let review = repo.update(&id, data).await?;
    repo.recompute_rating(&review.menu_item).await?;
    Ok(Json(review))
}

/// DELETE /api/reviews/{id} - 删除评论 (作者或管理员)
pub async fn delete_review(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let repo = ReviewRepository::new(state.db.clone());
    let existing = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Review"))?;

    if existing.user.to_string() != current.id && !current.is_admin() {
        return Err(AppError::forbidden("You can only delete your own reviews"));
    }

    repo.delete(&id).await?;
    repo.recompute_rating(&existing.menu_item).await?;

    Ok(Json(json!({ "message": "Review deleted successfully" })))
}

/// PUT /api/reviews/{id}/helpful - 标记/取消标记有用
pub async fn toggle_helpful(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let user = parse_record_id(&current.id)?;
    let repo = ReviewRepository::new(state.db.clone());
    let count = repo.toggle_helpful(&id, &user).await?;
    Ok(Json(json!({ "helpful": count })))
}
