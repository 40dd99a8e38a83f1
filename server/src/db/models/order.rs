//! Order Model
//!
//! 订单条目保存下单时的名称和单价快照，后续菜单改价不影响历史订单。
//!
//! All money calculations are done using Decimal internally, then converted
//! to f64 for storage and serialization.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Order ID type
pub type OrderId = RecordId;

/// 订单状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

/// 订单类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderType {
    DineIn,
    Takeaway,
    Delivery,
}

impl Default for OrderType {
    fn default() -> Self {
        OrderType::Takeaway
    }
}

/// 支付方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Upi,
    Wallet,
    Cod,
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Card
    }
}

/// 支付状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Pending
    }
}

/// 订单条目 - 下单时的商品快照
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(with = "serde_helpers::record_id")]
    pub menu_item: RecordId,
    pub name: String,
    pub quantity: u32,
    pub price: f64,
}

/// Order model matching SurrealDB schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<OrderId>,
    /// 下单用户，游客下单时为空
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub user: Option<RecordId>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub order_type: OrderType,
    #[serde(default)]
    pub special_instructions: String,
    #[serde(default)]
    pub delivery_address: Option<String>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub payment_id: Option<String>,
    /// 忠诚度积分是否已发放，送达发放一次后不再重复
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub loyalty_awarded: bool,
    pub created_at: DateTime<Utc>,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub order_type: Option<OrderType>,
    #[serde(default)]
    pub special_instructions: Option<String>,
    #[serde(default)]
    pub delivery_address: Option<String>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
}

/// 订单总额 = Σ 单价 × 数量，保留两位小数
pub fn compute_total(items: &[OrderItem]) -> f64 {
    let total: Decimal = items
        .iter()
        .map(|item| {
            Decimal::from_f64(item.price).unwrap_or_default() * Decimal::from(item.quantity)
        })
        .sum();
    total.round_dp(2).to_f64().unwrap_or(0.0)
}

/// 积分发放: 每消费 10 元得 1 分，向下取整
pub fn points_for_total(total: f64) -> i64 {
    let total = Decimal::from_f64(total).unwrap_or_default();
    (total / Decimal::from(10)).floor().to_i64().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: f64, quantity: u32) -> OrderItem {
        OrderItem {
            menu_item: "menu_item:espresso".parse().unwrap(),
            name: "Espresso".into(),
            quantity,
            price,
        }
    }

    #[test]
    fn total_is_exact() {
        // 3 × 4.10 + 1 × 2.20 = 14.50, no float drift
        let items = vec![item(4.10, 3), item(2.20, 1)];
        assert_eq!(compute_total(&items), 14.50);
    }

    #[test]
    fn total_of_empty_is_zero() {
        assert_eq!(compute_total(&[]), 0.0);
    }

    #[test]
    fn points_floor_division() {
        assert_eq!(points_for_total(50.0), 5);
        assert_eq!(points_for_total(59.99), 5);
        assert_eq!(points_for_total(9.99), 0);
        assert_eq!(points_for_total(0.0), 0);
    }

    #[test]
    fn status_wire_names() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Delivered).unwrap(),
            "\"delivered\""
        );
        assert_eq!(
            serde_json::to_string(&OrderType::DineIn).unwrap(),
            "\"dine-in\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Cod).unwrap(),
            "\"cod\""
        );
    }
}
