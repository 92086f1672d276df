//! Data Transfer Objects for REST request/response serialization.
//!
//! Addresses and pool ids are `0x` hex strings; 128-bit amounts are
//! decimal strings.

pub mod common_dto;
pub mod event_dto;
pub mod fee_dto;
pub mod guest_dto;
pub mod ownership_dto;

pub use common_dto::*;
pub use event_dto::*;
pub use fee_dto::*;
pub use guest_dto::*;
pub use ownership_dto::*;
