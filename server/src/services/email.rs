//! 事务性邮件服务
//!
//! 邮件通过 HTTP POST 交给外部中继投递。未配置 EMAIL_RELAY_URL 时
//! 降级为只记录日志，开发环境不需要真实投递。

use serde::Serialize;
use thiserror::Error;

use crate::core::Config;

/// 邮件发送错误
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Relay request failed: {0}")]
    Relay(String),

    #[error("Relay rejected message: HTTP {0}")]
    Rejected(u16),
}

#[derive(Debug, Serialize)]
struct RelayMessage {
    from: String,
    to: String,
    subject: String,
    html: String,
}

/// 事务性邮件发送
#[derive(Debug, Clone)]
pub struct EmailService {
    client: reqwest::Client,
    relay_url: Option<String>,
    from: String,
    client_url: String,
}

impl EmailService {
    pub fn from_config(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            relay_url: config.email_relay_url.clone(),
            from: config.email_from.clone(),
            client_url: config.client_url.clone(),
        }
    }

    /// 是否配置了真实投递
    pub fn is_configured(&self) -> bool {
        self.relay_url.is_some()
    }

    /// 注册后的邮箱验证邮件
    pub async fn send_verification_email(&self, to: &str, token: &str) -> Result<(), EmailError> {
        let link = format!("{}/verify-email/{}", self.client_url, token);
        let html = format!(
            "<h2>Verify Your Email Address</h2>\
             <p>Thank you for registering. Click the link below to verify your email:</p>\
             <p><a href=\"{link}\">Verify Email</a></p>\
             <p>This link expires in 24 hours. If you didn't create an account, ignore this email.</p>"
        );
        self.deliver(to, "Email Verification", html).await
    }

    /// 密码重置邮件
    pub async fn send_password_reset_email(&self, to: &str, token: &str) -> Result<(), EmailError> {
        let link = format!("{}/reset-password/{}", self.client_url, token);
        let html = format!(
            "<h2>Reset Your Password</h2>\
             <p>You requested a password reset. Click the link below to proceed:</p>\
             <p><a href=\"{link}\">Reset Password</a></p>\
             <p>This link expires in 1 hour. If you didn't request this, ignore this email \
             and your password will remain unchanged.</p>"
        );
        self.deliver(to, "Password Reset Request", html).await
    }

    async fn deliver(&self, to: &str, subject: &str, html: String) -> Result<(), EmailError> {
        let Some(relay_url) = &self.relay_url else {
            tracing::info!("email relay not configured, skipping '{}' to {}", subject, to);
            return Ok(());
        };

        let message = RelayMessage {
            from: self.from.clone(),
            to: to.to_string(),
            subject: subject.to_string(),
            html,
        };

        let response = self
            .client
            .post(relay_url)
            .json(&message)
            .send()
            .await
            .map_err(|e| EmailError::Relay(e.to_string()))?;

        if !response.status().is_success() {
            return Err(EmailError::Rejected(response.status().as_u16()));
        }

        tracing::info!("email '{}' sent to {}", subject, to);
        Ok(())
    }
}
