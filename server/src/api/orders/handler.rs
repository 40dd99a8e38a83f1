//! Orders API Handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use shared::message::{BusMessage, OrderStatusPayload};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Order, OrderCreate, OrderStatus};
use crate::db::repository::{OrderRepository, parse_record_id};
use crate::services::loyalty;
use crate::utils::{AppError, AppResult};

/// POST /api/orders - 下单
///
/// 游客可下单；携带有效令牌时订单关联到账户，配送完成后计入积分。
pub async fn create_order(
    State(state): State<ServerState>,
    current: Option<Extension<CurrentUser>>,
    Json(data): Json<OrderCreate>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let user = match &current {
        Some(Extension(u)) => Some(parse_record_id(&u.id)?),
        None => None,
    };

    let repo = OrderRepository::new(state.db.clone());
    let order = repo.create(data, user).await?;

    tracing::info!(
        "order created: {} total {:.2}",
        order.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
        order.total_amount
    );
    state.publish(BusMessage::new_order(&order));

    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /api/orders - 所有订单 (管理员)
pub async fn list_orders(State(state): State<ServerState>) -> AppResult<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.db.clone());
    Ok(Json(repo.find_all().await?))
}

/// GET /api/orders/{id} - 订单详情 (用于下单后跟踪)
pub async fn get_order(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Order"))?;
    Ok(Json(order))
}

/// GET /api/orders/my - 当前用户名下的订单
///
/// 按账户关联查，和游客用的邮箱查询互不影响。
pub async fn my_orders(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Order>>> {
    let user = parse_record_id(&current.id)?;
    let repo = OrderRepository::new(state.db.clone());
    Ok(Json(repo.find_by_user(&user).await?))
}

/// GET /api/orders/customer/{email} - 某客户的历史订单
pub async fn orders_by_customer(
    State(state): State<ServerState>,
    Path(email): Path<String>,
) -> AppResult<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.db.clone());
    Ok(Json(repo.find_by_email(&email).await?))
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

/// PUT /api/orders/{id}/status - 更新订单状态 (管理员)
///
/// 首次进入 delivered 状态时为关联用户记积分，loyalty_awarded
/// 标记保证状态来回切换不会重复发放。
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(body): Json<StatusUpdate>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo.update_status(&id, body.status).await?;

    if let Some(points) = loyalty::settle_delivered_order(&state.db, &order).await? {
        tracing::info!("awarded {} loyalty points for {}", points, id);
    }

    state.publish(BusMessage::order_status_updated(&OrderStatusPayload {
        order_id: order.id.as_ref().map(|i| i.to_string()).unwrap_or_default(),
        status: order.status.to_string(),
    }));

    Ok(Json(order))
}
