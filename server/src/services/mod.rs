//! 服务模块

pub mod email;
pub mod loyalty;

pub use email::EmailService;
