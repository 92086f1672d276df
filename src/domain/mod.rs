//! Domain layer: identities, capabilities, pool descriptors, callbacks, the
//! guest registry, and the event system.
//!
//! Nothing in here talks to the network; the service layer wires these
//! pieces to the orchestrator and to guests.

pub mod address;
pub mod callback;
pub mod capability;
pub mod delta;
pub mod event_bus;
pub mod failure;
pub mod gateway_event;
pub mod guest;
pub mod guest_registry;
pub mod hex_bytes;
pub mod ownership;
pub mod pool_id;
pub mod pool_key;

pub use address::Address;
pub use callback::{
    AfterSwapReturn, BeforeSwapReturn, Callback, CallbackKind, CallbackResponse, DonateCall,
    HookData, InitializeCall, InitializedCall, LiquidityCall, LiquiditySettledCall,
    ModifyLiquidityParams, SwapCall, SwapParams, SwapSettledCall,
};
pub use capability::CapabilityMask;
pub use delta::{BalanceDelta, BeforeSwapDelta};
pub use event_bus::EventBus;
pub use failure::{FailureClass, GuestRevert};
pub use gateway_event::GatewayEvent;
pub use guest::{Guest, GuestHandle, GuestInfo, GuestResult};
pub use guest_registry::GuestRegistry;
pub use ownership::Ownership;
pub use pool_id::PoolId;
pub use pool_key::{DYNAMIC_FEE_FLAG, FeeMarker, MAX_LP_FEE, PoolKey};
