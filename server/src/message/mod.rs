//! 事件通道模块
//!
//! REST 处理函数发布 [`shared::BusMessage`]，WebSocket 订阅端按
//! 目标过滤后转发给客户端。投递语义为至多一次。

pub mod bus;
pub mod ws;

pub use bus::MessageBus;
