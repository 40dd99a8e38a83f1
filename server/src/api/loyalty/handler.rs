//! Loyalty API Handlers
//!
//! 积分规则: 每消费 10 元累计 1 分，兑换时 10 分抵 1 元。

use axum::{Extension, Json, extract::State};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::LoyaltyTier;
use crate::db::repository::UserRepository;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Serialize)]
pub struct LoyaltyInfo {
    pub points: i64,
    pub tier: LoyaltyTier,
    pub total_spent: f64,
    /// 当前等级进度 (0-100)
    pub progress: f64,
    pub next_tier: Option<LoyaltyTier>,
    pub points_to_next_tier: f64,
}

/// GET /api/loyalty - 当前用户的积分与等级
pub async fn loyalty_info(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<LoyaltyInfo>> {
    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .find_by_id(&current.id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;

    let tier = user.loyalty_tier();
    let next_tier = tier.next();
    let points_to_next = match tier.bounds().1 {
        Some(upper) => {
            let gap = Decimal::try_from(upper - user.total_spent).unwrap_or_default();
            gap.max(Decimal::ZERO).round_dp(2).to_f64().unwrap_or(0.0)
        }
        None => 0.0,
    };

    Ok(Json(LoyaltyInfo {
        points: user.loyalty_points,
        tier,
        total_spent: user.total_spent,
        progress: tier.progress(user.total_spent),
        next_tier,
        points_to_next_tier: points_to_next,
    }))
}

#[derive(Debug, Deserialize)]
pub struct RedeemRequest {
    pub points: i64,
}

/// POST /api/loyalty/redeem - 兑换积分为折扣
pub async fn redeem_points(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<RedeemRequest>,
) -> AppResult<Json<Value>> {
    if req.points <= 0 {
        return Err(AppError::validation("points must be positive"));
    }

    let repo = UserRepository::new(state.db.clone());
    let user = repo.redeem_points(&current.id, req.points).await?;

    let discount = (Decimal::from(req.points) / Decimal::from(10))
        .round_dp(2)
        .to_f64()
        .unwrap_or(0.0);

    tracing::info!("user {} redeemed {} points", current.id, req.points);

    Ok(Json(json!({
        "discount": discount,
        "remaining_points": user.loyalty_points,
        "message": format!("Redeemed {} points for a {:.2} discount", req.points, discount),
    })))
}

/// GET /api/loyalty/rewards - 可兑换奖励目录
pub async fn rewards_catalog() -> Json<Value> {
    Json(json!([
        { "id": 1, "name": "Free Coffee", "points": 100, "description": "Any regular coffee on the house" },
        { "id": 2, "name": "10% Off", "points": 200, "description": "10% off your next order" },
        { "id": 3, "name": "Free Pastry", "points": 150, "description": "One pastry of your choice" },
        { "id": 4, "name": "20% Off", "points": 400, "description": "20% off your next order" },
        { "id": 5, "name": "Free Meal Combo", "points": 500, "description": "A full meal combo free" },
        { "id": 6, "name": "Premium Membership", "points": 1000, "description": "One month of premium perks" },
    ]))
}
