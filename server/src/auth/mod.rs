//! 认证模块
//!
//! - [`JwtService`] - 令牌签发与校验 (HS256)
//! - [`require_auth`] / [`require_admin`] - Axum 中间件
//! - [`CurrentUser`] - 注入请求扩展的用户上下文
//!
//! Tokens carry only a user id and expiry. Every protected request re-fetches
//! the user record from storage, so role or account changes apply immediately
//! and there is no in-memory session cache.

pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth};

use crate::db::models::{Role, User};

/// 当前用户上下文 (每个请求从数据库重新加载)
///
/// 由认证中间件创建，注入到请求处理函数
///
/// # 示例
///
/// ```ignore
/// async fn handler(Extension(user): Extension<CurrentUser>) -> Json<()> {
///     if user.is_admin() { /* ... */ }
///     Json(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// 用户 ID ("user:xxxx")
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub is_verified: bool,
}

impl CurrentUser {
    /// 是否管理员
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user
                .id
                .as_ref()
                .map(|id| id.to_string())
                .unwrap_or_default(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
            is_verified: user.is_verified,
        }
    }
}
