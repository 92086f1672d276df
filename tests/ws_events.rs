//! Gateway events streamed over the WebSocket endpoint.

mod common;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, anyhow};
use common::{Behaviour, OWNER, ScriptedGuest, default_fixture, pool_key, spawn_http_server};
use futures_util::{SinkExt, Stream, StreamExt};
use hydra_hook_gateway::domain::{CapabilityMask, FeeMarker, Guest, GuestHandle};
use serde_json::{Value, json};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

async fn next_json<S>(stream: &mut S) -> Result<Value>
where
    S: Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(5), stream.next())
            .await?
            .ok_or_else(|| anyhow!("socket closed"))??;
        if let Message::Text(text) = frame {
            return Ok(serde_json::from_str(text.as_str())?);
        }
    }
}

fn command(id: &str, payload: Value) -> Message {
    Message::text(
        json!({
            "id": id,
            "type": "command",
            "timestamp": "2026-01-01T00:00:00Z",
            "payload": payload,
        })
        .to_string(),
    )
}

#[tokio::test]
async fn subscribed_client_receives_attach_events() -> Result<()> {
    let fx = default_fixture();
    let addr = spawn_http_server(common::app(Arc::clone(&fx.gateway))).await?;
    let (mut socket, _) = connect_async(format!("ws://{addr}/ws")).await?;

    let watched = pool_key(1);
    let ignored = pool_key(3);
    socket
        .send(command(
            "sub-1",
            json!({ "command": "subscribe", "pool_ids": [watched.to_id().to_string()] }),
        ))
        .await?;
    let reply = next_json(&mut socket).await?;
    assert_eq!(reply["id"], "sub-1");
    assert_eq!(reply["type"], "response");
    assert_eq!(reply["payload"]["count"], 1);

    for (seed, key) in [(0x61, ignored), (0x62, watched)] {
        let guest = ScriptedGuest::new(seed, CapabilityMask::AFTER_SWAP, Behaviour::Return(0));
        fx.gateway
            .attach(
                OWNER,
                &key,
                GuestHandle::new(guest as Arc<dyn Guest>),
                FeeMarker::Dynamic,
            )
            .await?;
    }

    let event = next_json(&mut socket).await?;
    assert_eq!(event["type"], "event");
    assert_eq!(event["payload"]["event_type"], "guest_attached");
    assert_eq!(event["payload"]["pool_id"], watched.to_id().to_string());
    Ok(())
}

#[tokio::test]
async fn unknown_commands_get_an_error_envelope() -> Result<()> {
    let fx = default_fixture();
    let addr = spawn_http_server(common::app(Arc::clone(&fx.gateway))).await?;
    let (mut socket, _) = connect_async(format!("ws://{addr}/ws")).await?;

    socket
        .send(command("bad-1", json!({ "command": "swap" })))
        .await?;
    let reply = next_json(&mut socket).await?;
    assert_eq!(reply["id"], "bad-1");
    assert_eq!(reply["type"], "error");
    assert_eq!(reply["payload"]["code"], 404);

    socket.send(Message::text("not json")).await?;
    let reply = next_json(&mut socket).await?;
    assert_eq!(reply["payload"]["code"], 400);
    Ok(())
}
