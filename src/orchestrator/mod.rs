//! Orchestrator boundary.
//!
//! The gateway calls back into the pool manager for exactly one thing:
//! setting or clearing a pool's dynamic LP fee. [`PoolManager`] is that
//! seam; [`InMemoryPoolManager`] keeps overrides locally and
//! [`HttpPoolManager`] forwards them to a remote pool manager.

pub mod http;
pub mod memory;

use std::fmt;

use async_trait::async_trait;

use crate::domain::PoolKey;

pub use http::HttpPoolManager;
pub use memory::InMemoryPoolManager;

/// Errors reported by the pool manager.
#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    /// The fee exceeds the maximum LP fee.
    #[error("lp fee {0} exceeds the maximum")]
    FeeTooLarge(u32),

    /// The pool does not use a dynamic fee.
    #[error("pool fee is not dynamic")]
    NotDynamicFee,

    /// The pool manager rejected the request.
    #[error("pool manager rejected request ({status}): {message}")]
    Rejected {
        /// HTTP status returned by the pool manager.
        status: u16,
        /// Response body.
        message: String,
    },

    /// The pool manager could not be reached.
    #[error("pool manager unreachable: {0}")]
    Transport(String),
}

/// Pool manager operations the gateway depends on.
#[async_trait]
pub trait PoolManager: Send + Sync + fmt::Debug {
    /// Sets the dynamic LP fee of the pool identified by `key`.
    ///
    /// # Errors
    ///
    /// Returns an [`OrchestratorError`] when the pool manager rejects the
    /// update or cannot be reached.
    async fn update_dynamic_lp_fee(&self, key: &PoolKey, fee: u32) -> Result<(), OrchestratorError>;
}
