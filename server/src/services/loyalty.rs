//! 订单送达后的积分结算
//!
//! 发放条件和 loyalty_awarded 标记在同一处处理，
//! 状态在 delivered 之间来回切换不会重复发放。

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::models::{Order, OrderStatus, points_for_total};
use crate::db::repository::{OrderRepository, RepoResult, UserRepository};

/// Settle the loyalty award for an order after a status change.
///
/// Awards `floor(total / 10)` points to the linked user the first time the
/// order reaches `delivered`, adds the total to the user's cumulative spend
/// and marks the order. Returns the points granted, or `None` when nothing
/// was due (not delivered, already awarded, or a guest order).
pub async fn settle_delivered_order(db: &Surreal<Db>, order: &Order) -> RepoResult<Option<i64>> {
    if order.status != OrderStatus::Delivered || order.loyalty_awarded {
        return Ok(None);
    }
    let Some(user) = &order.user else {
        return Ok(None);
    };
    let Some(order_id) = &order.id else {
        return Ok(None);
    };

    let points = points_for_total(order.total_amount);
    UserRepository::new(db.clone())
        .award_loyalty(&user.to_string(), points, order.total_amount)
        .await?;
    OrderRepository::new(db.clone())
        .mark_loyalty_awarded(&order_id.to_string())
        .await?;

    Ok(Some(points))
}
