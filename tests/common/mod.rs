//! Shared fixtures for integration tests.

#![allow(dead_code, clippy::panic)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::routing::get;
use hydra_hook_gateway::api;
use hydra_hook_gateway::app_state::AppState;
use hydra_hook_gateway::domain::{
    Address, AfterSwapReturn, BalanceDelta, BeforeSwapDelta, BeforeSwapReturn, CapabilityMask,
    DonateCall, EventBus, FeeMarker, Guest, GuestResult, GuestRevert, HookData, InitializeCall,
    InitializedCall, LiquidityCall, LiquiditySettledCall, ModifyLiquidityParams, PoolKey,
    SwapCall, SwapParams, SwapSettledCall,
};
use hydra_hook_gateway::orchestrator::{InMemoryPoolManager, PoolManager};
use hydra_hook_gateway::service::{DeltaPolicy, GatewaySettings, HookGateway};
use hydra_hook_gateway::ws::handler::ws_handler;
use tokio::net::TcpListener;

pub const OWNER: Address = Address::from_bytes([0xaa; 20]);
pub const ORCHESTRATOR: Address = Address::from_bytes([0xbb; 20]);
pub const STRANGER: Address = Address::from_bytes([0xcc; 20]);

pub fn gateway_address() -> Address {
    Address::with_capabilities(0x11, CapabilityMask::ALL)
}

/// A dynamic-fee pool targeting the test gateway.
pub fn pool_key(seed: u8) -> PoolKey {
    PoolKey {
        currency0: Address::from_bytes([seed; 20]),
        currency1: Address::from_bytes([seed.wrapping_add(1); 20]),
        fee: FeeMarker::Dynamic,
        tick_spacing: 60,
        hooks: gateway_address(),
    }
}

pub struct Fixture {
    pub gateway: Arc<HookGateway>,
    pub pool_manager: Arc<InMemoryPoolManager>,
}

pub fn fixture(policy: DeltaPolicy, guest_call_timeout: Duration) -> Fixture {
    let pool_manager = Arc::new(InMemoryPoolManager::new());
    let manager: Arc<dyn PoolManager> = Arc::<InMemoryPoolManager>::clone(&pool_manager);
    let mut settings = GatewaySettings::new(gateway_address(), OWNER, ORCHESTRATOR);
    settings.liquidity_delta_policy = policy;
    settings.guest_call_timeout = guest_call_timeout;
    let Ok(gateway) = HookGateway::new(settings, manager, EventBus::new(64)) else {
        panic!("test gateway identity must be valid");
    };
    Fixture {
        gateway: Arc::new(gateway),
        pool_manager,
    }
}

pub fn default_fixture() -> Fixture {
    fixture(DeltaPolicy::Neutralize, Duration::from_millis(200))
}

/// The full application router, composed the way the binary composes it.
pub fn app(gateway: Arc<HookGateway>) -> Router {
    Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler))
        .with_state(AppState::new(gateway))
}

/// Serves `router` on an ephemeral loopback port.
pub async fn spawn_http_server(router: Router) -> anyhow::Result<SocketAddr> {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    Ok(addr)
}

/// How a [`ScriptedGuest`] answers every callback.
#[derive(Debug, Clone)]
pub enum Behaviour {
    /// Succeed, returning `delta` wherever a delta is expected.
    Return(i128),
    /// Fail with the given revert.
    Revert(GuestRevert),
    /// Panic inside the callback.
    Panic,
    /// Never answer within any reasonable budget.
    Hang,
}

/// Guest answering every callback according to a fixed [`Behaviour`].
#[derive(Debug)]
pub struct ScriptedGuest {
    pub id: Address,
    pub behaviour: Behaviour,
    pub calls: AtomicUsize,
}

impl ScriptedGuest {
    pub fn new(seed: u8, mask: CapabilityMask, behaviour: Behaviour) -> Arc<Self> {
        Arc::new(Self {
            id: Address::with_capabilities(seed, mask),
            behaviour,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn answer<T>(&self, value: impl FnOnce(i128) -> T) -> GuestResult<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behaviour {
            Behaviour::Return(delta) => Ok(value(*delta)),
            Behaviour::Revert(revert) => Err(revert.clone()),
            Behaviour::Panic => panic!("scripted guest panic"),
            Behaviour::Hang => {
                tokio::time::sleep(Duration::from_secs(3_600)).await;
                Err(GuestRevert::empty())
            }
        }
    }
}

#[async_trait]
impl Guest for ScriptedGuest {
    fn identity(&self) -> Address {
        self.id
    }

    async fn before_initialize(&self, _call: &InitializeCall) -> GuestResult<()> {
        self.answer(|_| ()).await
    }

    async fn after_initialize(&self, _call: &InitializedCall) -> GuestResult<()> {
        self.answer(|_| ()).await
    }

    async fn before_add_liquidity(&self, _call: &LiquidityCall) -> GuestResult<()> {
        self.answer(|_| ()).await
    }

    async fn after_add_liquidity(&self, _call: &LiquiditySettledCall) -> GuestResult<BalanceDelta> {
        self.answer(|d| BalanceDelta::new(d, -d)).await
    }

    async fn before_remove_liquidity(&self, _call: &LiquidityCall) -> GuestResult<()> {
        self.answer(|_| ()).await
    }

    async fn after_remove_liquidity(
        &self,
        _call: &LiquiditySettledCall,
    ) -> GuestResult<BalanceDelta> {
        self.answer(|d| BalanceDelta::new(d, d)).await
    }

    async fn before_swap(&self, _call: &SwapCall) -> GuestResult<BeforeSwapReturn> {
        self.answer(|d| BeforeSwapReturn {
            delta: BeforeSwapDelta::new(d, 0),
            fee_override: 0,
        })
        .await
    }

    async fn after_swap(&self, _call: &SwapSettledCall) -> GuestResult<AfterSwapReturn> {
        self.answer(|d| AfterSwapReturn { delta: d }).await
    }

    async fn before_donate(&self, _call: &DonateCall) -> GuestResult<()> {
        self.answer(|_| ()).await
    }

    async fn after_donate(&self, _call: &DonateCall) -> GuestResult<()> {
        self.answer(|_| ()).await
    }
}

pub fn swap_call(key: PoolKey, hook_data: HookData) -> SwapCall {
    SwapCall {
        sender: STRANGER,
        key,
        params: SwapParams {
            zero_for_one: true,
            amount_specified: -1_000,
            sqrt_price_limit_x96: 1,
        },
        hook_data,
    }
}

pub fn swap_settled_call(key: PoolKey, hook_data: HookData) -> SwapSettledCall {
    SwapSettledCall {
        sender: STRANGER,
        key,
        params: SwapParams::default(),
        delta: BalanceDelta::new(-1_000, 990),
        hook_data,
    }
}

pub fn liquidity_call(key: PoolKey) -> LiquidityCall {
    LiquidityCall {
        sender: STRANGER,
        key,
        params: ModifyLiquidityParams {
            tick_lower: -120,
            tick_upper: 120,
            liquidity_delta: 1_000,
        },
        hook_data: HookData::default(),
    }
}

pub fn liquidity_settled_call(key: PoolKey, hook_data: HookData) -> LiquiditySettledCall {
    LiquiditySettledCall {
        sender: STRANGER,
        key,
        params: ModifyLiquidityParams::default(),
        delta: BalanceDelta::new(-500, -500),
        fees_accrued: BalanceDelta::ZERO,
        hook_data,
    }
}

pub fn donate_call(key: PoolKey) -> DonateCall {
    DonateCall {
        sender: STRANGER,
        key,
        amount0: 10,
        amount1: 10,
        hook_data: HookData::default(),
    }
}

pub fn initialize_call(key: PoolKey) -> InitializeCall {
    InitializeCall {
        sender: STRANGER,
        key,
        sqrt_price_x96: 1 << 96,
    }
}

pub fn initialized_call(key: PoolKey) -> InitializedCall {
    InitializedCall {
        sender: STRANGER,
        key,
        sqrt_price_x96: 1 << 96,
        tick: 0,
    }
}
