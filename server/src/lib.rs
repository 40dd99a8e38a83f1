//! Café ordering server
//!
//! # 架构概述
//!
//! REST API over an embedded document store, plus a socket event channel:
//!
//! - **HTTP API** (`api`): one module per resource (menu, orders, auth, …)
//! - **数据库** (`db`): embedded SurrealDB, repository per table
//! - **认证** (`auth`): JWT + Argon2
//! - **事件通道** (`message`): broadcast bus + WebSocket fan-out
//! - **外部协作** (`services`): email delivery
//!
//! # Module layout
//!
//! ```text
//! server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、中间件
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层 (models + repositories)
//! ├── message/       # 事件总线 + WebSocket
//! ├── services/      # 邮件投递
//! └── utils/         # 错误、日志、工具函数
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod message;
pub mod services;
pub mod utils;

// Re-export public types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use message::MessageBus;
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境 (dotenv + 日志)
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    utils::logger::init_logger_with_file(log_level.as_deref(), log_dir.as_deref());
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   ______      ____
  / ____/___ _/ __/__
 / /   / __ `/ /_/ _ \
/ /___/ /_/ / __/  __/
\____/\__,_/_/  \___/
   _____
  / ___/___  ______   _____  _____
  \__ \/ _ \/ ___/ | / / _ \/ ___/
 ___/ /  __/ /   | |/ /  __/ /
/____/\___/_/    |___/\___/_/
    "#
    );
}
