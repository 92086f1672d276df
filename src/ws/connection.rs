//! WebSocket connection state machine.
//!
//! Handles the read/write loop for a single WebSocket connection,
//! applying subscription commands and forwarding filtered events.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use super::messages::{WsCommand, WsMessage, WsMessageType};
use super::subscription::SubscriptionManager;
use crate::domain::{GatewayEvent, PoolId};

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads commands from the client and applies them.
/// - Forwards matching events from the [`broadcast::Receiver`] to the client.
pub async fn run_connection(socket: WebSocket, mut event_rx: broadcast::Receiver<GatewayEvent>) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut subs = SubscriptionManager::new();

    loop {
        tokio::select! {
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let response = handle_text_message(&text, &mut subs);
                        if let Some(resp_json) = response
                            && ws_tx.send(Message::text(resp_json)).await.is_err() {
                                break;
                            }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
            event = event_rx.recv() => {
                match event {
                    Ok(gateway_event) => {
                        if subs.wants(&gateway_event) {
                            let msg = WsMessage::new(
                                uuid::Uuid::new_v4().to_string(),
                                WsMessageType::Event,
                                serde_json::to_value(&gateway_event).unwrap_or_default(),
                            );
                            let json = serde_json::to_string(&msg).unwrap_or_default();
                            if ws_tx.send(Message::text(json)).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "ws client lagged behind event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!("ws connection closed");
}

/// Splits raw pool id strings into parsed ids and the wildcard flag.
///
/// Malformed ids are skipped.
fn parse_pool_ids(raw: &[String]) -> (Vec<PoolId>, bool) {
    let wildcard = raw.iter().any(|s| s == "*");
    let ids = raw
        .iter()
        .filter(|s| s.as_str() != "*")
        .filter_map(|s| s.parse::<PoolId>().ok())
        .collect();
    (ids, wildcard)
}

/// Handles a text message from the client, returning an optional JSON response.
fn handle_text_message(text: &str, subs: &mut SubscriptionManager) -> Option<String> {
    let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
        return serde_json::to_string(&WsMessage::error(String::new(), 400, "malformed JSON"))
            .ok();
    };

    let response = match serde_json::from_value::<WsCommand>(msg.payload) {
        Ok(WsCommand::Subscribe { pool_ids }) => {
            let (ids, wildcard) = parse_pool_ids(&pool_ids);
            subs.subscribe(&ids, wildcard);
            WsMessage::new(
                msg.id,
                WsMessageType::Response,
                serde_json::json!({
                    "subscribed": ids.iter().map(ToString::to_string).collect::<Vec<_>>(),
                    "count": subs.count(),
                    "wildcard": subs.is_subscribed_all(),
                }),
            )
        }
        Ok(WsCommand::Unsubscribe { pool_ids }) => {
            let (ids, wildcard) = parse_pool_ids(&pool_ids);
            subs.unsubscribe(&ids, wildcard);
            WsMessage::new(
                msg.id,
                WsMessageType::Response,
                serde_json::json!({
                    "unsubscribed": ids.iter().map(ToString::to_string).collect::<Vec<_>>(),
                    "remaining_count": subs.count(),
                    "wildcard": subs.is_subscribed_all(),
                }),
            )
        }
        Err(_) => WsMessage::error(msg.id, 404, "unknown command"),
    };
    serde_json::to_string(&response).ok()
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn command(payload: serde_json::Value) -> String {
        serde_json::json!({
            "id": "req-1",
            "type": "command",
            "timestamp": "2026-01-01T00:00:00Z",
            "payload": payload,
        })
        .to_string()
    }

    fn reply(text: &str, subs: &mut SubscriptionManager) -> WsMessage {
        let Some(json) = handle_text_message(text, subs) else {
            panic!("every message gets a reply");
        };
        let Ok(msg) = serde_json::from_str::<WsMessage>(&json) else {
            panic!("reply should be an envelope");
        };
        msg
    }

    #[test]
    fn subscribe_by_id_and_wildcard() {
        let id = PoolId::from_bytes([4u8; 32]);
        let mut subs = SubscriptionManager::new();

        let msg = reply(
            &command(serde_json::json!({
                "command": "subscribe",
                "pool_ids": [id.to_string(), "not-an-id"],
            })),
            &mut subs,
        );
        assert_eq!(msg.msg_type, WsMessageType::Response);
        assert_eq!(msg.id, "req-1");
        assert!(subs.matches(id));
        assert!(!subs.matches(PoolId::from_bytes([5u8; 32])));

        let _ = reply(
            &command(serde_json::json!({ "command": "subscribe", "pool_ids": ["*"] })),
            &mut subs,
        );
        assert!(subs.matches(PoolId::from_bytes([5u8; 32])));
    }

    #[test]
    fn unknown_command_and_bad_json_are_errors() {
        let mut subs = SubscriptionManager::new();
        let msg = reply(
            &command(serde_json::json!({ "command": "swap", "pool_id": "x" })),
            &mut subs,
        );
        assert_eq!(msg.msg_type, WsMessageType::Error);

        let msg = reply("{not json", &mut subs);
        assert_eq!(msg.msg_type, WsMessageType::Error);
    }
}
