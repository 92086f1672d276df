//! Remote guests reached over HTTP, served by a local stub.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::{Result, anyhow};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use common::{
    ORCHESTRATOR, OWNER, default_fixture, donate_call, liquidity_call, liquidity_settled_call,
    pool_key, spawn_http_server, swap_call, swap_settled_call,
};
use hydra_hook_gateway::domain::{
    Address, BalanceDelta, BeforeSwapDelta, BeforeSwapReturn, Callback, CallbackKind,
    CapabilityMask, FailureClass, FeeMarker, GatewayEvent, GuestHandle, GuestRevert, HookData,
};
use hydra_hook_gateway::error::GatewayError;
use hydra_hook_gateway::remote_guest::RemoteGuest;
use serde_json::json;

/// Stub guest: answers swaps and liquidity, fails everything else in
/// a different way per callback.
async fn stub(State(calls): State<Arc<AtomicUsize>>, Json(callback): Json<Callback>) -> Response {
    calls.fetch_add(1, Ordering::SeqCst);
    match callback {
        Callback::BeforeSwap(_) => Json(BeforeSwapReturn {
            delta: BeforeSwapDelta::new(-7, 0),
            fee_override: 3_000,
        })
        .into_response(),
        Callback::AfterSwap(_) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "revert": GuestRevert::reported("slippage") })),
        )
            .into_response(),
        Callback::AfterAddLiquidity(_) => Json(BalanceDelta::new(9, -9)).into_response(),
        Callback::BeforeAddLiquidity(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response()
        }
        Callback::BeforeDonate(_) => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            StatusCode::OK.into_response()
        }
        _ => Json(json!({})).into_response(),
    }
}

struct Stub {
    endpoint: String,
    calls: Arc<AtomicUsize>,
}

async fn spawn_stub() -> Result<Stub> {
    let calls = Arc::new(AtomicUsize::new(0));
    let router = Router::new()
        .route("/callbacks", post(stub))
        .with_state(Arc::clone(&calls));
    let addr = spawn_http_server(router).await?;
    Ok(Stub {
        endpoint: format!("http://{addr}/"),
        calls,
    })
}

fn remote(endpoint: &str, mask: CapabilityMask) -> Result<GuestHandle> {
    let guest = RemoteGuest::new(
        Address::with_capabilities(0x51, mask),
        None,
        endpoint,
        Duration::from_millis(300),
    )?;
    Ok(GuestHandle::new(Arc::new(guest)))
}

#[tokio::test]
async fn remote_swap_values_are_relayed_and_failures_absorbed() -> Result<()> {
    let stub = spawn_stub().await?;
    let fx = default_fixture();
    let key = pool_key(1);
    let handle = remote(
        &stub.endpoint,
        CapabilityMask::BEFORE_SWAP | CapabilityMask::AFTER_SWAP,
    )?;
    let guest = handle.id();
    fx.gateway
        .attach(OWNER, &key, handle, FeeMarker::Dynamic)
        .await?;
    let mut events = fx.gateway.event_bus().subscribe();

    let (_, delta, fee) = fx
        .gateway
        .before_swap(ORCHESTRATOR, &swap_call(key, HookData::default()))
        .await?;
    assert_eq!(delta, BeforeSwapDelta::new(-7, 0));
    assert_eq!(fee, 3_000);

    let (kind, delta) = fx
        .gateway
        .after_swap(ORCHESTRATOR, &swap_settled_call(key, HookData::default()))
        .await?;
    assert_eq!(kind, CallbackKind::AfterSwap);
    assert_eq!(delta, 0);
    assert_eq!(stub.calls.load(Ordering::SeqCst), 2);

    let GatewayEvent::GuestFailed {
        guest: failed,
        callback,
        failure,
        ..
    } = events.recv().await?
    else {
        return Err(anyhow!("expected a GuestFailed event"));
    };
    assert_eq!(failed, guest);
    assert_eq!(callback, CallbackKind::AfterSwap);
    assert_eq!(
        failure,
        FailureClass::Reported {
            message: "slippage".to_string()
        }
    );
    Ok(())
}

#[tokio::test]
async fn remote_liquidity_failures_propagate() -> Result<()> {
    let stub = spawn_stub().await?;
    let fx = default_fixture();
    let key = pool_key(2);
    let handle = remote(
        &stub.endpoint,
        CapabilityMask::BEFORE_ADD_LIQUIDITY
            | CapabilityMask::AFTER_ADD_LIQUIDITY
            | CapabilityMask::BEFORE_DONATE,
    )?;
    fx.gateway
        .attach(OWNER, &key, handle, FeeMarker::Dynamic)
        .await?;

    let Err(GatewayError::GuestReverted { revert, .. }) = fx
        .gateway
        .before_add_liquidity(ORCHESTRATOR, &liquidity_call(key))
        .await
    else {
        return Err(anyhow!("a non-JSON error reply should revert"));
    };
    assert_eq!(revert.classify(), FailureClass::Empty);

    // positive amount0 is neutralized without consent
    let (_, delta) = fx
        .gateway
        .after_add_liquidity(
            ORCHESTRATOR,
            &liquidity_settled_call(key, HookData::default()),
        )
        .await?;
    assert_eq!(delta, BalanceDelta::new(0, -9));

    // the call budget expires before the stub answers
    let Err(GatewayError::GuestReverted { callback, revert, .. }) = fx
        .gateway
        .before_donate(ORCHESTRATOR, &donate_call(key))
        .await
    else {
        return Err(anyhow!("a slow guest should revert"));
    };
    assert_eq!(callback, CallbackKind::BeforeDonate);
    assert_eq!(revert.classify(), FailureClass::Empty);
    Ok(())
}

#[tokio::test]
async fn unreachable_remote_guest_reverts_empty() -> Result<()> {
    let fx = default_fixture();
    let key = pool_key(3);
    // nothing listens on the discard port
    let handle = remote("http://127.0.0.1:9", CapabilityMask::AFTER_INITIALIZE)?;
    fx.gateway
        .attach(OWNER, &key, handle, FeeMarker::Dynamic)
        .await?;

    let result = fx
        .gateway
        .after_initialize(ORCHESTRATOR, &common::initialized_call(key))
        .await;
    let Err(GatewayError::GuestReverted { revert, .. }) = result else {
        return Err(anyhow!("unreachable guest should revert"));
    };
    assert!(revert.payload().is_empty());
    Ok(())
}
