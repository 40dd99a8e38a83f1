//! User Repository
//!
//! 凭证和一次性令牌在模型上跳过序列化，所有写入都走显式查询绑定。

use chrono::{DateTime, Duration, Utc};

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Role, User};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find user by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let thing = parse_record_id(id)?;
        let user: Option<User> = self.base.db().select(thing).await?;
        Ok(user)
    }

    /// Find user by email (caller normalizes)
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let email = email.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Create a new user account
    pub async fn create(
        &self,
        name: String,
        email: String,
        password: &str,
        verification_token: String,
    ) -> RepoResult<User> {
        // Check duplicate email
        if self.find_by_email(&email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Email '{}' already registered",
                email
            )));
        }

        let password_hash = User::hash_password(password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE user SET
                    name = $name,
                    email = $email,
                    password_hash = $password_hash,
                    role = 'user',
                    is_verified = false,
                    verification_token = $verification_token,
                    loyalty_points = 0,
                    total_spent = 0.0,
                    created_at = $created_at
                RETURN AFTER"#,
            )
            .bind(("name", name))
            .bind(("email", email))
            .bind(("password_hash", password_hash))
            .bind(("verification_token", verification_token))
            .bind(("created_at", Utc::now()))
            .await?;

        let created: Option<User> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Update name and/or email
    pub async fn update_profile(
        &self,
        id: &str,
        name: Option<String>,
        email: Option<String>,
    ) -> RepoResult<User> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))?;

        // Check duplicate email if changing
        if let Some(ref new_email) = email
            && new_email != &existing.email
            && self.find_by_email(new_email).await?.is_some()
        {
            return Err(RepoError::Duplicate("Email already in use".to_string()));
        }

        let mut set_parts: Vec<&str> = Vec::new();
        if name.is_some() { set_parts.push("name = $name"); }
        if email.is_some() { set_parts.push("email = $email"); }

        if set_parts.is_empty() {
            return Ok(existing);
        }

        let thing = parse_record_id(id)?;
        let query_str = format!("UPDATE $thing SET {} RETURN AFTER", set_parts.join(", "));
        let mut query = self.base.db().query(query_str).bind(("thing", thing));
        if let Some(v) = name { query = query.bind(("name", v)); }
        if let Some(v) = email { query = query.bind(("email", v)); }

        let mut result = query.await?;
        result
            .take::<Option<User>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
    }

    /// Replace the password hash
    pub async fn update_password(&self, id: &str, new_password: &str) -> RepoResult<()> {
        let thing = parse_record_id(id)?;
        let password_hash = User::hash_password(new_password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?;

        self.base
            .db()
            .query("UPDATE $thing SET password_hash = $password_hash")
            .bind(("thing", thing))
            .bind(("password_hash", password_hash))
            .await?;
        Ok(())
    }

    /// Consume a verification token, marking the account verified
    ///
    /// 令牌一次性使用，命中后立即清除。
    pub async fn verify_email(&self, token: &str) -> RepoResult<Option<User>> {
        let token = token.to_string();
        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE user SET
                    is_verified = true,
                    verification_token = NONE
                WHERE verification_token = $tok
                RETURN AFTER"#,
            )
            .bind(("tok", token))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Store a password reset token valid for one hour
    pub async fn set_reset_token(&self, id: &str, token: String) -> RepoResult<()> {
        let thing = parse_record_id(id)?;
        let expires = Utc::now() + Duration::hours(1);
        self.base
            .db()
            .query(
                r#"UPDATE $thing SET
                    reset_password_token = $tok,
                    reset_password_expires = $expires"#,
            )
            .bind(("thing", thing))
            .bind(("tok", token))
            .bind(("expires", expires))
            .await?;
        Ok(())
    }

    /// Clear a pending reset token (email delivery failed)
    pub async fn clear_reset_token(&self, id: &str) -> RepoResult<()> {
        let thing = parse_record_id(id)?;
        self.base
            .db()
            .query(
                r#"UPDATE $thing SET
                    reset_password_token = NONE,
                    reset_password_expires = NONE"#,
            )
            .bind(("thing", thing))
            .await?;
        Ok(())
    }

    /// Consume an unexpired reset token and set the new password
    pub async fn reset_password(&self, token: &str, new_password: &str) -> RepoResult<Option<User>> {
        let password_hash = User::hash_password(new_password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?;
        let token = token.to_string();
        let now: DateTime<Utc> = Utc::now();

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE user SET
                    password_hash = $password_hash,
                    reset_password_token = NONE,
                    reset_password_expires = NONE
                WHERE reset_password_token = $tok
                  AND reset_password_expires > $now
                RETURN AFTER"#,
            )
            .bind(("password_hash", password_hash))
            .bind(("tok", token))
            .bind(("now", now))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Add earned points and spend to the running totals
    pub async fn award_loyalty(&self, id: &str, points: i64, amount: f64) -> RepoResult<User> {
        let thing = parse_record_id(id)?;
        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    loyalty_points += $points,
                    total_spent += $amount
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("points", points))
            .bind(("amount", amount))
            .await?;
        result
            .take::<Option<User>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
    }

    /// Deduct redeemed points
    ///
    /// # 错误
    ///
    /// 余额不足返回 Validation
    pub async fn redeem_points(&self, id: &str, points: i64) -> RepoResult<User> {
        let user = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))?;

        if user.loyalty_points < points {
            return Err(RepoError::Validation("Insufficient points".to_string()));
        }

        let thing = parse_record_id(id)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET loyalty_points -= $points RETURN AFTER")
            .bind(("thing", thing))
            .bind(("points", points))
            .await?;
        result
            .take::<Option<User>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
    }

    /// All users, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(users)
    }

    /// Change account role
    pub async fn update_role(&self, id: &str, role: Role) -> RepoResult<User> {
        let thing = parse_record_id(id)?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET role = $role RETURN AFTER")
            .bind(("thing", thing))
            .bind(("role", role))
            .await?;
        result
            .take::<Option<User>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
    }

    /// Hard delete a user account
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = parse_record_id(id)?;
        let deleted: Option<User> = self.base.db().delete(thing).await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound(format!("User {} not found", id)));
        }
        Ok(true)
    }

    /// Total account count
    pub async fn count(&self) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query("SELECT VALUE count FROM (SELECT count() FROM user GROUP ALL)")
            .await?;
        let counts: Vec<i64> = result.take(0)?;
        Ok(counts.into_iter().next().unwrap_or(0))
    }
}
