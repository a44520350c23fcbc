//! # Account Subsystem (AA-02)
//!
//! The smart account behind every operation sender. It answers the entry
//! ledger's two hook calls:
//!
//! - `validate_operation`: untagged authorizations must recover to the
//!   primary owner (unbounded window); tagged ones are delegated to the
//!   embedded session-key registry, which returns the credential's window.
//! - `execute_operation`: decodes the call payload and dispatches each
//!   inner call through the injected executor. A batch fails the whole
//!   operation on the first revert.
//!
//! The owner-only surface (`grant_session_key`, `revoke_session_key`,
//! `transfer_ownership`) is local API, never reachable through dispatch.

pub mod domain;
pub mod events;

// Re-export public API
pub use domain::account::Account;
pub use domain::errors::AccountError;
pub use events::payloads::{
    AuthScheme, OperationValidatedPayload, OwnershipTransferredPayload, SessionKeyGrantedPayload,
    SessionKeyRevokedPayload,
};
pub use events::AccountEvent;
