//! WebSocket 订阅端点
//!
//! `GET /api/events/ws?token=<jwt>` 升级为 WebSocket 后推送事件。
//! 浏览器的 WebSocket API 无法携带 Authorization 头，令牌放在查询参数。
//!
//! 投递语义为至多一次：订阅者落后太多时丢弃错过的消息继续推送。

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::Response;
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;

use shared::message::SubscriberIdentity;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::UserRepository;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    token: Option<String>,
}

/// 升级 WebSocket 连接，令牌验证失败时在握手前拒绝
pub async fn events_ws(
    State(state): State<ServerState>,
    Query(query): Query<WsQuery>,
    ws: WebSocketUpgrade,
) -> AppResult<Response> {
    let token = query.token.ok_or_else(AppError::unauthorized)?;

    let claims = state
        .jwt_service
        .validate_token(&token)
        .map_err(|_| AppError::invalid_token())?;

    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .find_by_id(&claims.sub)
        .await
        .map_err(AppError::from)?
        .ok_or(AppError::InvalidToken)?;
    let current = CurrentUser::from(&user);

    let identity = SubscriberIdentity {
        user_id: current.id.clone(),
        is_admin: current.is_admin(),
    };

    Ok(ws.on_upgrade(move |socket| subscriber_loop(state, socket, identity)))
}

/// 单个订阅者的转发循环
async fn subscriber_loop(state: ServerState, mut socket: WebSocket, identity: SubscriberIdentity) {
    let bus = state.message_bus();
    let mut rx = bus.subscribe();
    let conn_id = bus.register(identity.clone());
    let shutdown = bus.shutdown_token().clone();

    tracing::debug!("ws subscriber connected: {} ({})", conn_id, identity.user_id);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                let _ = socket.send(Message::Close(None)).await;
                break;
            }
            incoming = socket.recv() => {
                match incoming {
                    // 客户端不发业务消息，只处理关闭和 ping
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => continue,
                    Some(Err(_)) => break,
                }
            }
            msg = rx.recv() => {
                match msg {
                    Ok(msg) => {
                        if !msg.visible_to(&identity) {
                            continue;
                        }
                        let Ok(text) = serde_json::to_string(&msg) else {
                            continue;
                        };
                        if socket.send(Message::Text(text.into())).await.is_err() {
                            break;
                        }
                    }
                    // 落后太多: 丢弃错过的消息，继续订阅
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(
                            "ws subscriber {} lagged, dropped {} message(s)",
                            conn_id,
                            skipped
                        );
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }

    bus.unregister(&conn_id);
    tracing::debug!("ws subscriber disconnected: {}", conn_id);
}
