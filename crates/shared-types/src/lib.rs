//! # Shared Types Crate
//!
//! This crate contains the operation entity, the call-payload codec, the
//! selector registry, and the narrow hook traits that connect the OpFlow
//! subsystems.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Narrow Seams**: The entry ledger drives accounts and sponsors only
//!   through the traits in [`hooks`]; no subsystem reaches into another's
//!   state.
//! - **Bit-Layout Stability**: The operation hash packs its fields in a
//!   fixed layout so signatures stay compatible across implementations.

pub mod authorization;
pub mod entities;
pub mod errors;
pub mod hashing;
pub mod hooks;
pub mod payload;
pub mod selectors;

pub use authorization::{ParsedAuthorization, AUTH_TAG_P256, AUTH_TAG_SECP256K1};
pub use entities::*;
pub use errors::{CodecError, HookRejection};
pub use hashing::keccak256;
pub use hooks::{
    AccountDirectory, AccountFactory, AccountHook, CallExecutor, CallRevert, SponsorDirectory,
    SponsorHook,
};
pub use payload::{CallPayload, InnerCall};
pub use selectors::Selector;
