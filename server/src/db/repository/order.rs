//! Order Repository

use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Order, OrderCreate, OrderStatus, PaymentStatus, compute_total};

const ORDER_TABLE: &str = "order";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a new order
    ///
    /// 总额由服务端根据条目重新计算，不信任客户端提交的金额。
    pub async fn create(&self, data: OrderCreate, user: Option<RecordId>) -> RepoResult<Order> {
        if data.items.is_empty() {
            return Err(RepoError::Validation("No order items".into()));
        }
        for item in &data.items {
            if item.quantity == 0 {
                return Err(RepoError::Validation("quantity must be at least 1".into()));
            }
            if item.price < 0.0 {
                return Err(RepoError::Validation("price cannot be negative".into()));
            }
        }

        let total_amount = compute_total(&data.items);

        let order = Order {
            id: None,
            user,
            customer_name: data.customer_name,
            customer_email: data.customer_email.trim().to_lowercase(),
            customer_phone: data.customer_phone,
            items: data.items,
            total_amount,
            status: OrderStatus::Pending,
            order_type: data.order_type.unwrap_or_default(),
            special_instructions: data.special_instructions.unwrap_or_default(),
            delivery_address: data.delivery_address,
            payment_method: data.payment_method.unwrap_or_default(),
            payment_status: PaymentStatus::Pending,
            payment_id: None,
            loyalty_awarded: false,
            created_at: Utc::now(),
        };

        let created: Option<Order> = self.base.db().create(ORDER_TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// All orders, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let thing = parse_record_id(id)?;
        let order: Option<Order> = self.base.db().select(thing).await?;
        Ok(order)
    }

    /// Orders linked to a user account, newest first
    pub async fn find_by_user(&self, user: &RecordId) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE user = $user ORDER BY created_at DESC")
            .bind(("user", user.to_string()))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Orders for one customer email, newest first
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Vec<Order>> {
        let email = email.trim().to_lowercase();
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE customer_email = $email ORDER BY created_at DESC")
            .bind(("email", email))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Change order status
    pub async fn update_status(&self, id: &str, status: OrderStatus) -> RepoResult<Order> {
        let thing = parse_record_id(id)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET status = $status RETURN AFTER")
            .bind(("thing", thing))
            .bind(("status", status))
            .await?;
        result
            .take::<Option<Order>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Mark loyalty points as granted for this order
    pub async fn mark_loyalty_awarded(&self, id: &str) -> RepoResult<()> {
        let thing = parse_record_id(id)?;
        self.base
            .db()
            .query("UPDATE $thing SET loyalty_awarded = true")
            .bind(("thing", thing))
            .await?;
        Ok(())
    }

    /// Most recent orders (admin dashboard)
    pub async fn recent(&self, limit: usize) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order ORDER BY created_at DESC LIMIT $limit")
            .bind(("limit", limit))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Revenue across all non-cancelled orders, summed as Decimal
    pub async fn total_revenue(&self) -> RepoResult<f64> {
        let mut result = self
            .base
            .db()
            .query("SELECT VALUE total_amount FROM order WHERE status != 'cancelled'")
            .await?;
        let totals: Vec<f64> = result.take(0)?;
        let sum: Decimal = totals
            .iter()
            .map(|t| Decimal::from_f64(*t).unwrap_or_default())
            .sum();
        Ok(sum.round_dp(2).to_f64().unwrap_or(0.0))
    }

    /// Order counts grouped by status
    pub async fn count_by_status(&self) -> RepoResult<HashMap<String, i64>> {
        let mut result = self
            .base
            .db()
            .query("SELECT VALUE status FROM order")
            .await?;
        let statuses: Vec<String> = result.take(0)?;
        let mut counts = HashMap::new();
        for status in statuses {
            *counts.entry(status).or_insert(0) += 1;
        }
        Ok(counts)
    }

    /// Total order count
    pub async fn count(&self) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query("SELECT VALUE count FROM (SELECT count() FROM order GROUP ALL)")
            .await?;
        let counts: Vec<i64> = result.take(0)?;
        Ok(counts.into_iter().next().unwrap_or(0))
    }
}
