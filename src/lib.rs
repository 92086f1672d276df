//! # hydra-hook-gateway
//!
//! Single-slot hook gateway standing between a liquidity-pool manager (the
//! orchestrator) and untrusted guest extension modules.
//!
//! Each pool has at most one guest. The orchestrator calls ten lifecycle
//! callbacks on the gateway; each is forwarded to the pool's guest only if
//! the guest declares the matching capability bit. Deltas a guest returns
//! are sanitized against the caller's explicit consent, and guest failures
//! on the swap path are classified and absorbed instead of aborting the
//! swap.
//!
//! ## Architecture
//!
//! ```text
//! Orchestrator / Owner / Guests (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── HookGateway: router + sanitizer (service/)
//!     ├── EventBus (domain/)
//!     │
//!     ├── GuestRegistry (domain/)
//!     ├── Guest / RemoteGuest
//!     ├── PoolManager (orchestrator/)
//!     │
//!     └── PostgreSQL event log
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod orchestrator;
pub mod persistence;
pub mod remote_guest;
pub mod service;
pub mod ws;
