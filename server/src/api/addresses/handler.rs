//! Addresses API Handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Address, AddressCreate, AddressUpdate};
use crate::db::repository::{AddressRepository, parse_record_id};
use crate::utils::{AppError, AppResult};

/// 归属校验：地址必须属于当前用户
async fn owned_address(
    repo: &AddressRepository,
    id: &str,
    current: &CurrentUser,
) -> AppResult<Address> {
    let address = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Address"))?;
    if address.user.to_string() != current.id {
        return Err(AppError::forbidden("Not your address"));
    }
    Ok(address)
}

/// GET /api/addresses - 当前用户的地址列表，默认地址在前
pub async fn list_addresses(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Address>>> {
    let user = parse_record_id(&current.id)?;
    let repo = AddressRepository::new(state.db.clone());
    Ok(Json(repo.find_for_user(&user).await?))
}

/// POST /api/addresses - 新建地址
pub async fn create_address(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Json(data): Json<AddressCreate>,
) -> AppResult<(StatusCode, Json<Address>)> {
    let user = parse_record_id(&current.id)?;
    let repo = AddressRepository::new(state.db.clone());
    let address = repo.create(user, data).await?;
    Ok((StatusCode::CREATED, Json(address)))
}

/// PUT /api/addresses/{id} - 更新地址
pub async fn update_address(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(data): Json<AddressUpdate>,
) -> AppResult<Json<Address>> {
    let repo = AddressRepository::new(state.db.clone());
    owned_address(&repo, &id, &current).await?;

    let owner = parse_record_id(&current.id)?;
    let address = repo.update(&id, &owner, data).await?;
    Ok(Json(address))
}

/// DELETE /api/addresses/{id} - 删除地址
pub async fn delete_address(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let repo = AddressRepository::new(state.db.clone());
    owned_address(&repo, &id, &current).await?;
    repo.delete(&id).await?;
    Ok(Json(json!({ "message": "Address deleted successfully" })))
}

/// PUT /api/addresses/{id}/default - 设为默认地址
pub async fn set_default(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<Address>> {
    let repo = AddressRepository::new(state.db.clone());
    owned_address(&repo, &id, &current).await?;

    let owner = parse_record_id(&current.id)?;
    let address = repo.set_default(&id, &owner).await?;
    Ok(Json(address))
}
