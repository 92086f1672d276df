//! End-to-end behaviour of the gateway through its library surface.

#![allow(clippy::panic)]

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{
    Behaviour, ORCHESTRATOR, OWNER, STRANGER, ScriptedGuest, default_fixture, donate_call,
    fixture, initialize_call, initialized_call, liquidity_call, liquidity_settled_call, pool_key,
    swap_call, swap_settled_call,
};
use hydra_hook_gateway::domain::{
    Address, BalanceDelta, BeforeSwapDelta, Callback, CallbackKind, CallbackResponse,
    CapabilityMask, FailureClass, FeeMarker, GatewayEvent, Guest, GuestHandle, GuestRevert,
    HookData,
};
use hydra_hook_gateway::error::GatewayError;
use hydra_hook_gateway::service::DeltaPolicy;
use tokio_test::{assert_err, assert_ok};

fn handle(guest: &Arc<ScriptedGuest>) -> GuestHandle {
    GuestHandle::new(Arc::clone(guest) as Arc<dyn Guest>)
}

#[tokio::test]
async fn five_step_lifecycle() {
    let fx = default_fixture();
    let key = pool_key(1);
    let pool_id = key.to_id();
    let mut events = fx.gateway.event_bus().subscribe();

    // 1. attach G without the before_swap bit
    let quiet = ScriptedGuest::new(
        7,
        CapabilityMask::AFTER_INITIALIZE,
        Behaviour::Revert(GuestRevert::reported("bad price")),
    );
    assert_ok!(
        fx.gateway
            .attach(OWNER, &key, handle(&quiet), FeeMarker::Dynamic)
            .await
    );
    let Some(attached) = fx.gateway.guest_of(pool_id).await else {
        panic!("guest should be attached");
    };
    assert_eq!(attached.id(), quiet.id);

    // 2. before_swap without the capability returns the default untouched
    let Ok(default) = fx
        .gateway
        .before_swap(ORCHESTRATOR, &swap_call(key, HookData::default()))
        .await
    else {
        panic!("default before_swap should succeed");
    };
    assert_eq!(default, (CallbackKind::BeforeSwap, BeforeSwapDelta::ZERO, 0));
    assert_eq!(quiet.calls(), 0);

    // 3. a capable guest reverting with a message is isolated
    assert_ok!(fx.gateway.detach(OWNER, &key).await);
    let loud = ScriptedGuest::new(
        8,
        CapabilityMask::BEFORE_SWAP,
        Behaviour::Revert(GuestRevert::reported("bad price")),
    );
    assert_ok!(
        fx.gateway
            .attach(OWNER, &key, handle(&loud), FeeMarker::Dynamic)
            .await
    );
    let Ok(response) = fx
        .gateway
        .before_swap(ORCHESTRATOR, &swap_call(key, HookData::default()))
        .await
    else {
        panic!("exchange path must not abort");
    };
    assert_eq!(response, (CallbackKind::BeforeSwap, BeforeSwapDelta::ZERO, 0));
    assert_eq!(loud.calls(), 1);

    let mut failures = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let GatewayEvent::GuestFailed {
            guest,
            failure,
            pool_id: failed_pool,
            ..
        } = event
        {
            failures.push((guest, failure, failed_pool));
        }
    }
    assert_eq!(
        failures,
        vec![(
            loud.id,
            FailureClass::Reported {
                message: "bad price".to_string()
            },
            pool_id
        )]
    );

    // 4. detach empties the slot and zeroes the fee
    assert_ok!(
        fx.gateway
            .update_dynamic_fee(loud.id, &key, 4_000)
            .await
    );
    assert_eq!(fx.pool_manager.fee_of(pool_id).await, Some(4_000));
    let Ok(previous) = fx.gateway.detach(OWNER, &key).await else {
        panic!("detach should succeed");
    };
    assert_eq!(previous.map(|info| info.address), Some(loud.id));
    assert!(fx.gateway.guest_of(pool_id).await.is_none());
    assert_eq!(fx.pool_manager.fee_of(pool_id).await, Some(0));

    // 5. attaching over an occupied slot fails and leaves it unchanged
    assert_ok!(
        fx.gateway
            .attach(OWNER, &key, handle(&quiet), FeeMarker::Dynamic)
            .await
    );
    let result = fx
        .gateway
        .attach(OWNER, &key, handle(&loud), FeeMarker::Dynamic)
        .await;
    assert!(matches!(result, Err(GatewayError::PoolOccupied(id)) if id == pool_id));
    let Some(still) = fx.gateway.guest_of(pool_id).await else {
        panic!("slot should remain occupied");
    };
    assert_eq!(still.id(), quiet.id);
}

#[tokio::test]
async fn every_callback_defaults_without_guest() {
    let fx = default_fixture();
    let key = pool_key(2);
    let hook = HookData::default();
    let callbacks = vec![
        Callback::BeforeInitialize(initialize_call(key)),
        Callback::AfterInitialize(initialized_call(key)),
        Callback::BeforeAddLiquidity(liquidity_call(key)),
        Callback::AfterAddLiquidity(liquidity_settled_call(key, hook.clone())),
        Callback::BeforeRemoveLiquidity(liquidity_call(key)),
        Callback::AfterRemoveLiquidity(liquidity_settled_call(key, hook.clone())),
        Callback::BeforeSwap(swap_call(key, hook.clone())),
        Callback::AfterSwap(swap_settled_call(key, hook.clone())),
        Callback::BeforeDonate(donate_call(key)),
        Callback::AfterDonate(donate_call(key)),
    ];
    let mut events = fx.gateway.event_bus().subscribe();

    for callback in &callbacks {
        let Ok(response) = fx.gateway.dispatch(ORCHESTRATOR, callback).await else {
            panic!("{} should default", callback.kind());
        };
        assert_eq!(response.ack(), callback.kind());
        match response {
            CallbackResponse::Ack { .. } => {}
            CallbackResponse::Delta { delta, .. } => assert_eq!(delta, BalanceDelta::ZERO),
            CallbackResponse::BeforeSwap {
                delta,
                fee_override,
                ..
            } => {
                assert_eq!(delta, BeforeSwapDelta::ZERO);
                assert_eq!(fee_override, 0);
            }
            CallbackResponse::AfterSwap { delta, .. } => assert_eq!(delta, 0),
        }
    }
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn callbacks_reject_non_orchestrator() {
    let fx = default_fixture();
    let key = pool_key(3);
    for caller in [OWNER, STRANGER] {
        let result = fx.gateway.after_donate(caller, &donate_call(key)).await;
        assert!(matches!(result, Err(GatewayError::NotPoolManager(c)) if c == caller));
    }
}

#[tokio::test]
async fn non_exchange_failures_abort() {
    let fx = default_fixture();
    let key = pool_key(4);
    let guest = ScriptedGuest::new(
        9,
        CapabilityMask::BEFORE_ADD_LIQUIDITY | CapabilityMask::AFTER_INITIALIZE,
        Behaviour::Revert(GuestRevert::custom([0xde, 0xad, 0xbe, 0xef], &[1, 2])),
    );
    assert_ok!(
        fx.gateway
            .attach(OWNER, &key, handle(&guest), FeeMarker::Dynamic)
            .await
    );

    let err = assert_err!(
        fx.gateway
            .before_add_liquidity(ORCHESTRATOR, &liquidity_call(key))
            .await
    );
    let GatewayError::GuestReverted {
        guest: failed,
        callback,
        revert,
    } = err
    else {
        panic!("expected GuestReverted");
    };
    assert_eq!(failed, guest.id);
    assert_eq!(callback, CallbackKind::BeforeAddLiquidity);
    assert_eq!(
        revert.classify(),
        FailureClass::Custom {
            selector: [0xde, 0xad, 0xbe, 0xef],
            data: vec![1, 2]
        }
    );

    assert_err!(
        fx.gateway
            .after_initialize(ORCHESTRATOR, &initialized_call(key))
            .await
    );
}

#[tokio::test]
async fn exchange_panics_and_timeouts_are_isolated() {
    let fx = fixture(DeltaPolicy::Neutralize, Duration::from_millis(50));
    let mask = CapabilityMask::BEFORE_SWAP | CapabilityMask::AFTER_SWAP;

    let panicking = ScriptedGuest::new(10, mask, Behaviour::Panic);
    let key = pool_key(5);
    assert_ok!(
        fx.gateway
            .attach(OWNER, &key, handle(&panicking), FeeMarker::Dynamic)
            .await
    );

    let hanging = ScriptedGuest::new(11, mask, Behaviour::Hang);
    let other = pool_key(7);
    assert_ok!(
        fx.gateway
            .attach(OWNER, &other, handle(&hanging), FeeMarker::Dynamic)
            .await
    );

    let mut events = fx.gateway.event_bus().subscribe();

    let Ok((_, delta)) = fx
        .gateway
        .after_swap(ORCHESTRATOR, &swap_settled_call(key, HookData::default()))
        .await
    else {
        panic!("panic must be isolated");
    };
    assert_eq!(delta, 0);

    let Ok((_, delta, _)) = fx
        .gateway
        .before_swap(ORCHESTRATOR, &swap_call(other, HookData::default()))
        .await
    else {
        panic!("timeout must be isolated");
    };
    assert_eq!(delta, BeforeSwapDelta::ZERO);

    let Ok(GatewayEvent::GuestFailed { failure, .. }) = events.recv().await else {
        panic!("expected failure event for the panic");
    };
    assert_eq!(failure, FailureClass::Panic { code: 0 });
    let Ok(GatewayEvent::GuestFailed { failure, .. }) = events.recv().await else {
        panic!("expected failure event for the timeout");
    };
    assert_eq!(failure, FailureClass::Empty);
}

#[tokio::test]
async fn positive_deltas_need_matching_consent() {
    let fx = default_fixture();
    let key = pool_key(8);
    let guest = ScriptedGuest::new(
        12,
        CapabilityMask::BEFORE_SWAP
            | CapabilityMask::AFTER_SWAP
            | CapabilityMask::AFTER_REMOVE_LIQUIDITY,
        Behaviour::Return(25),
    );
    assert_ok!(
        fx.gateway
            .attach(OWNER, &key, handle(&guest), FeeMarker::Dynamic)
            .await
    );

    let consent_before_swap = HookData::consenting(Address::with_capabilities(
        1,
        CapabilityMask::BEFORE_SWAP_RETURNS_DELTA,
    ));

    let Ok((_, delta, _)) = fx
        .gateway
        .before_swap(ORCHESTRATOR, &swap_call(key, consent_before_swap.clone()))
        .await
    else {
        panic!("before_swap should succeed");
    };
    assert_eq!(delta, BeforeSwapDelta::new(25, 0));

    // consent names a different callback
    let Ok((_, delta)) = fx
        .gateway
        .after_swap(ORCHESTRATOR, &swap_settled_call(key, consent_before_swap))
        .await
    else {
        panic!("after_swap should succeed");
    };
    assert_eq!(delta, 0);

    // hook data shorter than an address grants nothing
    let Ok((_, delta)) = fx
        .gateway
        .after_remove_liquidity(
            ORCHESTRATOR,
            &liquidity_settled_call(key, HookData::new(vec![0xff; 4])),
        )
        .await
    else {
        panic!("after_remove_liquidity should succeed");
    };
    assert_eq!(delta, BalanceDelta::ZERO);
}

#[tokio::test]
async fn reject_policy_aborts_liquidity_but_not_swaps() {
    let fx = fixture(DeltaPolicy::Reject, Duration::from_millis(200));
    let key = pool_key(9);
    let guest = ScriptedGuest::new(
        13,
        CapabilityMask::AFTER_ADD_LIQUIDITY | CapabilityMask::AFTER_SWAP,
        Behaviour::Return(5),
    );
    assert_ok!(
        fx.gateway
            .attach(OWNER, &key, handle(&guest), FeeMarker::Dynamic)
            .await
    );

    let result = fx
        .gateway
        .after_add_liquidity(
            ORCHESTRATOR,
            &liquidity_settled_call(key, HookData::default()),
        )
        .await;
    assert!(matches!(
        result,
        Err(GatewayError::InvalidHookDelta(CallbackKind::AfterAddLiquidity))
    ));

    let Ok((_, delta)) = fx
        .gateway
        .after_swap(ORCHESTRATOR, &swap_settled_call(key, HookData::default()))
        .await
    else {
        panic!("exchange path always neutralizes");
    };
    assert_eq!(delta, 0);
}

#[tokio::test]
async fn former_guest_cannot_update_fee() {
    let fx = default_fixture();
    let key = pool_key(10);
    let guest = ScriptedGuest::new(14, CapabilityMask::AFTER_INITIALIZE, Behaviour::Return(0));
    assert_ok!(
        fx.gateway
            .attach(OWNER, &key, handle(&guest), FeeMarker::Fixed(500))
            .await
    );
    assert_eq!(fx.pool_manager.fee_of(key.to_id()).await, Some(500));

    // right guest, wrong pool
    let result = fx
        .gateway
        .update_dynamic_fee(guest.id, &pool_key(11), 100)
        .await;
    assert!(matches!(result, Err(GatewayError::NotGuestHook(_))));

    assert_ok!(fx.gateway.detach(OWNER, &key).await);
    let result = fx.gateway.update_dynamic_fee(guest.id, &key, 100).await;
    assert!(matches!(result, Err(GatewayError::NotGuestHook(_))));
}

#[tokio::test]
async fn before_initialize_checks_fee_marker_first() {
    let fx = default_fixture();
    let mut key = pool_key(12);
    let guest = ScriptedGuest::new(15, CapabilityMask::BEFORE_INITIALIZE, Behaviour::Return(0));
    assert_ok!(
        fx.gateway
            .attach(OWNER, &key, handle(&guest), FeeMarker::Dynamic)
            .await
    );
    assert_ok!(
        fx.gateway
            .before_initialize(ORCHESTRATOR, &initialize_call(key))
            .await
    );
    assert_eq!(guest.calls(), 1);

    key.fee = FeeMarker::Fixed(3_000);
    let result = fx
        .gateway
        .before_initialize(ORCHESTRATOR, &initialize_call(key))
        .await;
    assert!(matches!(result, Err(GatewayError::InvalidPoolKey(_))));
    assert_eq!(guest.calls(), 1);
}
