//! Guest reached over HTTP.
//!
//! Each callback is sent as a tagged [`Callback`] JSON body to
//! `POST {endpoint}/callbacks`. A 2xx reply carries the callback's return
//! value; any other status carries `{"revert": "0x…"}` with the raw revert
//! payload. Transport failures and undecodable replies revert with an empty
//! payload.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::domain::{
    Address, AfterSwapReturn, BalanceDelta, BeforeSwapReturn, Callback, CapabilityMask,
    DonateCall, Guest, GuestResult, GuestRevert, InitializeCall, InitializedCall, LiquidityCall,
    LiquiditySettledCall, SwapCall, SwapSettledCall,
};
use crate::error::GatewayError;

/// Error body returned by a remote guest that reverted.
#[derive(Debug, Deserialize)]
struct RevertBody {
    revert: GuestRevert,
}

/// A guest module running behind an HTTP endpoint.
#[derive(Debug, Clone)]
pub struct RemoteGuest {
    id: Address,
    capabilities: CapabilityMask,
    endpoint: String,
    client: reqwest::Client,
}

impl RemoteGuest {
    /// Creates a remote guest.
    ///
    /// `capabilities` defaults to the mask encoded in `id`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Internal`] if the HTTP client cannot be built.
    pub fn new(
        id: Address,
        capabilities: Option<CapabilityMask>,
        endpoint: &str,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Internal(format!("guest client: {e}")))?;
        Ok(Self {
            id,
            capabilities: capabilities.unwrap_or_else(|| id.capabilities()),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Base URL of the guest.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends `callback` and returns the raw 2xx body.
    async fn send(&self, callback: &Callback) -> GuestResult<Vec<u8>> {
        let url = format!("{}/callbacks", self.endpoint);
        let response = self
            .client
            .post(&url)
            .json(callback)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(guest = %self.id, %url, error = %e, "remote guest unreachable");
                GuestRevert::empty()
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            tracing::warn!(guest = %self.id, error = %e, "remote guest reply truncated");
            GuestRevert::empty()
        })?;

        if status.is_success() {
            return Ok(body.to_vec());
        }
        let revert = serde_json::from_slice::<RevertBody>(&body)
            .map(|b| b.revert)
            .unwrap_or_else(|_| GuestRevert::empty());
        tracing::debug!(guest = %self.id, status = status.as_u16(), callback = %callback.kind(), "remote guest reverted");
        Err(revert)
    }

    async fn ack(&self, callback: Callback) -> GuestResult<()> {
        self.send(&callback).await.map(|_| ())
    }

    async fn returning<T: DeserializeOwned>(&self, callback: Callback) -> GuestResult<T> {
        let body = self.send(&callback).await?;
        serde_json::from_slice(&body).map_err(|e| {
            tracing::warn!(guest = %self.id, callback = %callback.kind(), error = %e, "remote guest returned undecodable value");
            GuestRevert::empty()
        })
    }
}

#[async_trait]
impl Guest for RemoteGuest {
    fn identity(&self) -> Address {
        self.id
    }

    fn capabilities(&self) -> CapabilityMask {
        self.capabilities
    }

    async fn before_initialize(&self, call: &InitializeCall) -> GuestResult<()> {
        self.ack(Callback::BeforeInitialize(call.clone())).await
    }

    async fn after_initialize(&self, call: &InitializedCall) -> GuestResult<()> {
        self.ack(Callback::AfterInitialize(call.clone())).await
    }

    async fn before_add_liquidity(&self, call: &LiquidityCall) -> GuestResult<()> {
        self.ack(Callback::BeforeAddLiquidity(call.clone())).await
    }

    async fn after_add_liquidity(&self, call: &LiquiditySettledCall) -> GuestResult<BalanceDelta> {
        self.returning(Callback::AfterAddLiquidity(call.clone()))
            .await
    }

    async fn before_remove_liquidity(&self, call: &LiquidityCall) -> GuestResult<()> {
        self.ack(Callback::BeforeRemoveLiquidity(call.clone())).await
    }

    async fn after_remove_liquidity(
        &self,
        call: &LiquiditySettledCall,
    ) -> GuestResult<BalanceDelta> {
        self.returning(Callback::AfterRemoveLiquidity(call.clone()))
            .await
    }

    async fn before_swap(&self, call: &SwapCall) -> GuestResult<BeforeSwapReturn> {
        self.returning(Callback::BeforeSwap(call.clone())).await
    }

    async fn after_swap(&self, call: &SwapSettledCall) -> GuestResult<AfterSwapReturn> {
        self.returning(Callback::AfterSwap(call.clone())).await
    }

    async fn before_donate(&self, call: &DonateCall) -> GuestResult<()> {
        self.ack(Callback::BeforeDonate(call.clone())).await
    }

    async fn after_donate(&self, call: &DonateCall) -> GuestResult<()> {
        self.ack(Callback::AfterDonate(call.clone())).await
    }
}
