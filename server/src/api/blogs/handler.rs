//! Blogs API Handlers

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Blog, BlogCategory, BlogCreate, BlogUpdate};
use crate::db::repository::{BlogRepository, parse_record_id};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct BlogQuery {
    pub category: Option<BlogCategory>,
    pub tag: Option<String>,
    pub search: Option<String>,
}

/// GET /api/blogs - 已发布文章，支持分类/标签/搜索过滤
pub async fn list_posts(
    State(state): State<ServerState>,
    Query(query): Query<BlogQuery>,
) -> AppResult<Json<Vec<Blog>>> {
    let repo = BlogRepository::new(state.db.clone());
    let blogs = repo
        .find_published(query.category, query.tag, query.search)
        .await?;
    Ok(Json(blogs))
}

/// GET /api/blogs/{slug} - 按 slug 读取文章，同时累加阅读量
pub async fn get_post_by_slug(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Blog>> {
    let repo = BlogRepository::new(state.db.clone());
    let blog = repo
        .find_by_slug_counting_view(&slug)
        .await?
        .ok_or_else(|| AppError::not_found("Blog post"))?;
    Ok(Json(blog))
}

/// POST /api/blogs - 发布文章 (管理员)
pub async fn create_post(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Json(data): Json<BlogCreate>,
) -> AppResult<(StatusCode, Json<Blog>)> {
    let author = parse_record_id(&current.id)?;
    let repo = BlogRepository::new(state.db.clone());
    let blog = repo.create(author, current.name.clone(), data).await?;
    tracing::info!("blog post created: {}", blog.slug);
    Ok((StatusCode::CREATED, Json(blog)))
}

/// PUT /api/blogs/{id} - 更新文章 (管理员)
pub async fn update_post(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(data): Json<BlogUpdate>,
) -> AppResult<Json<Blog>> {
    let repo = BlogRepository::new(state.db.clone());
    Ok(Json(repo.update(&id, data).await?))
}

/// DELETE /api/blogs/{id} - 删除文章 (管理员)
pub async fn delete_post(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let repo = BlogRepository::new(state.db.clone());
    repo.delete(&id).await?;
    Ok(Json(json!({ "message": "Blog post deleted successfully" })))
}

/// PUT /api/blogs/{id}/like - 点赞/取消点赞
pub async fn toggle_like(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let user = parse_record_id(&current.id)?;
    let repo = BlogRepository::new(state.db.clone());
    let count = repo.toggle_like(&id, &user).await?;
    Ok(Json(json!({ "likes": count })))
}
