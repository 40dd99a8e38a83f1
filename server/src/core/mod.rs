//! 核心模块
//!
//! - [`Config`] - 环境变量配置
//! - [`ServerState`] - 全局共享状态
//! - [`Server`] - HTTP 服务器生命周期

pub mod config;
pub mod server;
pub mod state;

pub use config::Config;
pub use server::Server;
pub use state::ServerState;
