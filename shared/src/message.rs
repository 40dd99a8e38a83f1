//! 事件通道消息类型定义
//!
//! These types are shared between the server and connected clients (admin
//! dashboard, customer SPA). Delivery is an explicit contract:
//!
//! - **at-most-once**: a message published while a client is disconnected or
//!   lagging is never redelivered
//! - **no backpressure**: publishing never blocks on slow subscribers
//! - **no persistence**: there is no replay of missed events
//!
//! Handlers publish [`BusMessage`] values; routing is decided by
//! [`EventTarget`] and [`BusMessage::visible_to`], never inside a handler.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Event types pushed over the socket channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventType {
    /// A new order was placed (admin dashboards)
    NewOrder,
    /// An order moved to a new status
    OrderStatusUpdated,
    /// A customer posted a chat message (admin dashboards)
    NewChatMessage,
    /// Support replied in a customer's chat (that customer only)
    AdminChatMessage,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventType::NewOrder => write!(f, "new-order"),
            EventType::OrderStatusUpdated => write!(f, "order-status-updated"),
            EventType::NewChatMessage => write!(f, "new-chat-message"),
            EventType::AdminChatMessage => write!(f, "admin-chat-message"),
        }
    }
}

/// Who a message is addressed to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum EventTarget {
    /// Every connected subscriber
    All,
    /// Admin subscribers only
    Admins,
    /// One user's room (`user:xxxx` record id)
    User(String),
}

/// Identity of a connected subscriber, resolved from its bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberIdentity {
    pub user_id: String,
    pub is_admin: bool,
}

/// A single event-channel message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusMessage {
    pub event: EventType,
    pub target: EventTarget,
    pub payload: serde_json::Value,
    /// For tracing a message through logs
    pub request_id: Uuid,
}

impl BusMessage {
    pub fn new(event: EventType, target: EventTarget, payload: serde_json::Value) -> Self {
        Self {
            event,
            target,
            payload,
            request_id: Uuid::new_v4(),
        }
    }

    /// New order placed — fanned out to admin listeners
    pub fn new_order<T: Serialize>(order: &T) -> Self {
        Self::new(
            EventType::NewOrder,
            EventTarget::Admins,
            serde_json::to_value(order).unwrap_or_default(),
        )
    }

    /// Order status change — broadcast so customer views update too
    pub fn order_status_updated(payload: &OrderStatusPayload) -> Self {
        Self::new(
            EventType::OrderStatusUpdated,
            EventTarget::All,
            serde_json::to_value(payload).unwrap_or_default(),
        )
    }

    /// Customer chat message — admin listeners
    pub fn new_chat_message(payload: &ChatMessagePayload) -> Self {
        Self::new(
            EventType::NewChatMessage,
            EventTarget::Admins,
            serde_json::to_value(payload).unwrap_or_default(),
        )
    }

    /// Admin reply — delivered only to the chat owner's room
    pub fn admin_chat_message(user_id: &str, payload: &ChatMessagePayload) -> Self {
        Self::new(
            EventType::AdminChatMessage,
            EventTarget::User(user_id.to_string()),
            serde_json::to_value(payload).unwrap_or_default(),
        )
    }

    /// Routing rule: can `identity` see this message?
    pub fn visible_to(&self, identity: &SubscriberIdentity) -> bool {
        match &self.target {
            EventTarget::All => true,
            EventTarget::Admins => identity.is_admin,
            EventTarget::User(id) => identity.is_admin || identity.user_id == *id,
        }
    }
}

/// Payload for [`EventType::OrderStatusUpdated`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusPayload {
    pub order_id: String,
    pub status: String,
}

/// Payload for chat events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessagePayload {
    pub chat_id: String,
    pub user_id: String,
    pub sender: String,
    pub text: String,
    pub sent_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(id: &str) -> SubscriberIdentity {
        SubscriberIdentity {
            user_id: id.to_string(),
            is_admin: false,
        }
    }

    fn admin() -> SubscriberIdentity {
        SubscriberIdentity {
            user_id: "user:admin".to_string(),
            is_admin: true,
        }
    }

    #[test]
    fn admin_targeted_messages_hidden_from_customers() {
        let msg = BusMessage::new_order(&serde_json::json!({"id": "order:1"}));
        assert!(msg.visible_to(&admin()));
        assert!(!msg.visible_to(&customer("user:alice")));
    }

    #[test]
    fn room_messages_reach_only_their_user() {
        let payload = ChatMessagePayload {
            chat_id: "chat:1".into(),
            user_id: "user:alice".into(),
            sender: "admin".into(),
            text: "hello".into(),
            sent_at: chrono::Utc::now(),
        };
        let msg = BusMessage::admin_chat_message("user:alice", &payload);
        assert!(msg.visible_to(&customer("user:alice")));
        assert!(!msg.visible_to(&customer("user:bob")));
        // Admins monitor every room
        assert!(msg.visible_to(&admin()));
    }

    #[test]
    fn broadcast_messages_reach_everyone() {
        let msg = BusMessage::order_status_updated(&OrderStatusPayload {
            order_id: "order:1".into(),
            status: "ready".into(),
        });
        assert!(msg.visible_to(&admin()));
        assert!(msg.visible_to(&customer("user:alice")));
    }

    #[test]
    fn event_type_wire_names() {
        let json = serde_json::to_string(&EventType::OrderStatusUpdated).unwrap();
        assert_eq!(json, "\"order-status-updated\"");
    }
}
