//! User Model
//!
//! 账户记录，包含登录凭证、邮箱验证状态和忠诚度累计。

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// User ID type
pub type UserId = RecordId;

/// 用户角色
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

/// 忠诚度等级，由累计消费额决定
///
/// | 等级 | 累计消费 |
/// |------|----------|
/// | Bronze | < 1000 |
/// | Silver | 1000 - 4999 |
/// | Gold | 5000 - 9999 |
/// | Platinum | >= 10000 |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoyaltyTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl LoyaltyTier {
    /// 根据累计消费额计算等级
    pub fn for_spend(total_spent: f64) -> Self {
        if total_spent >= 10_000.0 {
            LoyaltyTier::Platinum
        } else if total_spent >= 5_000.0 {
            LoyaltyTier::Gold
        } else if total_spent >= 1_000.0 {
            LoyaltyTier::Silver
        } else {
            LoyaltyTier::Bronze
        }
    }

    /// 当前等级的消费区间，Platinum 没有上限
    pub fn bounds(&self) -> (f64, Option<f64>) {
        match self {
            LoyaltyTier::Bronze => (0.0, Some(1_000.0)),
            LoyaltyTier::Silver => (1_000.0, Some(5_000.0)),
            LoyaltyTier::Gold => (5_000.0, Some(10_000.0)),
            LoyaltyTier::Platinum => (10_000.0, None),
        }
    }

    /// 下一等级，Platinum 返回 None
    pub fn next(&self) -> Option<LoyaltyTier> {
        match self {
            LoyaltyTier::Bronze => Some(LoyaltyTier::Silver),
            LoyaltyTier::Silver => Some(LoyaltyTier::Gold),
            LoyaltyTier::Gold => Some(LoyaltyTier::Platinum),
            LoyaltyTier::Platinum => None,
        }
    }

    /// 当前等级内的进度百分比 (0-100)
    pub fn progress(&self, total_spent: f64) -> f64 {
        let (min, max) = self.bounds();
        match max {
            None => 100.0,
            Some(max) => {
                let min = Decimal::from_f64(min).unwrap_or_default();
                let max = Decimal::from_f64(max).unwrap_or_default();
                let spent = Decimal::from_f64(total_spent).unwrap_or_default();
                let pct = (spent - min) / (max - min) * Decimal::from(100);
                pct.to_f64().unwrap_or(0.0).clamp(0.0, 100.0)
            }
        }
    }
}

/// User model matching SurrealDB schema
///
/// 凭证和一次性令牌不参与序列化，只能通过显式查询写入。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<UserId>,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_verified: bool,
    #[serde(default, skip_serializing)]
    pub verification_token: Option<String>,
    #[serde(default, skip_serializing)]
    pub reset_password_token: Option<String>,
    #[serde(default, skip_serializing)]
    pub reset_password_expires: Option<DateTime<Utc>>,
    #[serde(default)]
    pub loyalty_points: i64,
    #[serde(default)]
    pub total_spent: f64,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// 当前忠诚度等级
    pub fn loyalty_tier(&self) -> LoyaltyTier {
        LoyaltyTier::for_spend(self.total_spent)
    }

    /// Verify password using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let parsed_hash = PasswordHash::new(&self.password_hash)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_thresholds() {
        assert_eq!(LoyaltyTier::for_spend(0.0), LoyaltyTier::Bronze);
        assert_eq!(LoyaltyTier::for_spend(999.99), LoyaltyTier::Bronze);
        assert_eq!(LoyaltyTier::for_spend(1_000.0), LoyaltyTier::Silver);
        assert_eq!(LoyaltyTier::for_spend(4_999.99), LoyaltyTier::Silver);
        assert_eq!(LoyaltyTier::for_spend(5_000.0), LoyaltyTier::Gold);
        assert_eq!(LoyaltyTier::for_spend(10_000.0), LoyaltyTier::Platinum);
    }

    #[test]
    fn tier_progress() {
        // Half way through Silver: (3000 - 1000) / (5000 - 1000) = 50%
        assert_eq!(LoyaltyTier::Silver.progress(3_000.0), 50.0);
        assert_eq!(LoyaltyTier::Platinum.progress(50_000.0), 100.0);
        assert_eq!(LoyaltyTier::Bronze.progress(0.0), 0.0);
    }

    #[test]
    fn tier_ladder() {
        assert_eq!(LoyaltyTier::Bronze.next(), Some(LoyaltyTier::Silver));
        assert_eq!(LoyaltyTier::Platinum.next(), None);
    }

    #[test]
    fn password_round_trip() {
        let hash = User::hash_password("secret123").unwrap();
        let user = User {
            id: None,
            name: "Test".into(),
            email: "t@example.com".into(),
            password_hash: hash,
            role: Role::default(),
            is_verified: false,
            verification_token: None,
            reset_password_token: None,
            reset_password_expires: None,
            loyalty_points: 0,
            total_spent: 0.0,
            created_at: Utc::now(),
        };
        assert!(user.verify_password("secret123").unwrap());
        assert!(!user.verify_password("wrong").unwrap());
    }
}
