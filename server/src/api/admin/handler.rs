//! Admin API Handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Blog, MenuItem, Role, User};
use crate::db::repository::{
    BlogRepository, ContactRepository, MenuItemRepository, OrderRepository, UserRepository,
};
use crate::security_log;
use crate::utils::{AppError, AppResult};

/// GET /api/admin/stats - 仪表盘统计
pub async fn dashboard_stats(State(state): State<ServerState>) -> AppResult<Json<Value>> {
    let users = UserRepository::new(state.db.clone());
    let orders = OrderRepository::new(state.db.clone());
    let menu = MenuItemRepository::new(state.db.clone());
    let contacts = ContactRepository::new(state.db.clone());

    let total_users = users.count().await?;
    let total_orders = orders.count().await?;
    let total_menu_items = menu.count().await?;
    let pending_contacts = contacts.count_pending().await?;
    let total_revenue = orders.total_revenue().await?;
    let recent_orders = orders.recent(5).await?;
    let orders_by_status = orders.count_by_status().await?;

    Ok(Json(json!({
        "totalUsers": total_users,
        "totalOrders": total_orders,
        "totalMenuItems": total_menu_items,
        "pendingContacts": pending_contacts,
        "totalRevenue": total_revenue,
        "recentOrders": recent_orders,
        "ordersByStatus": orders_by_status,
    })))
}

/// GET /api/admin/users - 所有用户
pub async fn list_users(State(state): State<ServerState>) -> AppResult<Json<Vec<User>>> {
    let repo = UserRepository::new(state.db.clone());
    Ok(Json(repo.find_all().await?))
}

/// DELETE /api/admin/users/{id} - 删除用户 (管理员账户不可删)
pub async fn delete_user(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let repo = UserRepository::new(state.db.clone());
    let target = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;

    if target.role == Role::Admin {
        return Err(AppError::validation("Cannot delete admin user"));
    }

    repo.delete(&id).await?;
    security_log!(
        "INFO",
        "user_deleted_by_admin",
        admin = current.id,
        target = id
    );
    Ok(Json(json!({ "message": "User deleted successfully" })))
}

#[derive(Debug, Deserialize)]
pub struct RoleUpdate {
    pub role: Role,
}

/// PUT /api/admin/users/{id}/role - 修改用户角色
pub async fn update_role(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(body): Json<RoleUpdate>,
) -> AppResult<Json<User>> {
    let repo = UserRepository::new(state.db.clone());
    let user = repo.update_role(&id, body.role).await?;
    security_log!(
        "INFO",
        "role_changed_by_admin",
        admin = current.id,
        target = id
    );
    Ok(Json(user))
}

/// GET /api/admin/menu - 全部商品，含下架 (管理端列表)
pub async fn list_all_menu(State(state): State<ServerState>) -> AppResult<Json<Vec<MenuItem>>> {
    let repo = MenuItemRepository::new(state.db.clone());
    Ok(Json(repo.find_all().await?))
}

/// GET /api/admin/blogs - 全部文章，含草稿
pub async fn list_all_blogs(State(state): State<ServerState>) -> AppResult<Json<Vec<Blog>>> {
    let repo = BlogRepository::new(state.db.clone());
    Ok(Json(repo.find_all().await?))
}
