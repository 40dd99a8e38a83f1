//! 事件通道核心实现
//!
//! # 消息流
//!
//! ```text
//! REST handler ──▶ publish() ──▶ broadcast::Sender ──▶ 每个 WebSocket 订阅者
//!                                                      (按 target 过滤)
//! ```
//!
//! 通道是纯广播：过滤发生在订阅端，慢订阅者落后太多时丢弃旧消息
//! (RecvError::Lagged) 而不阻塞发布方。

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use shared::message::{BusMessage, SubscriberIdentity};

/// 事件通道 - 负责消息广播和订阅者管理
#[derive(Debug)]
pub struct MessageBus {
    /// 服务器到订阅者的广播通道
    tx: broadcast::Sender<BusMessage>,
    /// 关闭信号令牌
    shutdown_token: CancellationToken,
    /// 在线订阅者 (连接 ID -> 身份)
    subscribers: Arc<DashMap<Uuid, SubscriberIdentity>>,
}

impl MessageBus {
    /// 创建默认容量 (1024) 的事件通道
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// 创建指定容量的事件通道
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            shutdown_token: CancellationToken::new(),
            subscribers: Arc::new(DashMap::new()),
        }
    }

    /// 发布消息 (即发即弃)
    ///
    /// 没有订阅者时消息直接丢弃，不视为错误。
    pub fn publish(&self, msg: BusMessage) {
        let event = msg.event;
        match self.tx.send(msg) {
            Ok(n) => tracing::debug!("published {} to {} subscriber(s)", event, n),
            Err(_) => tracing::debug!("published {} with no subscribers", event),
        }
    }

    /// 订阅广播流
    pub fn subscribe(&self) -> broadcast::Receiver<BusMessage> {
        self.tx.subscribe()
    }

    /// 注册在线订阅者，返回连接 ID
    pub fn register(&self, identity: SubscriberIdentity) -> Uuid {
        let conn_id = Uuid::new_v4();
        self.subscribers.insert(conn_id, identity);
        conn_id
    }

    /// 注销订阅者
    pub fn unregister(&self, conn_id: &Uuid) {
        self.subscribers.remove(conn_id);
    }

    /// 在线订阅者数量
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// 获取关闭令牌 (订阅端监听关闭信号)
    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown_token
    }

    /// 优雅关闭事件通道
    pub fn shutdown(&self) {
        tracing::info!("Shutting down message bus");
        self.shutdown_token.cancel();
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn publish_reaches_subscriber() {
        let bus = MessageBus::with_capacity(8);
        let mut rx = bus.subscribe();

        bus.publish(BusMessage::new_order(&json!({"id": "order:1"})));

        let msg = rx.recv().await.unwrap();
        assert_eq!(msg.event.to_string(), "new-order");
    }

    #[test]
    fn publish_without_subscribers_is_silent() {
        let bus = MessageBus::with_capacity(8);
        bus.publish(BusMessage::new_order(&json!({})));
    }

    #[test]
    fn register_and_unregister() {
        let bus = MessageBus::new();
        let id = bus.register(SubscriberIdentity {
            user_id: "user:a".into(),
            is_admin: false,
        });
        assert_eq!(bus.subscriber_count(), 1);
        bus.unregister(&id);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn shutdown_cancels_token() {
        let bus = MessageBus::new();
        bus.shutdown();
        assert!(bus.shutdown_token().is_cancelled());
    }
}
