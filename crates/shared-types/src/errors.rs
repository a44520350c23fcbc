//! # Shared Errors
//!
//! Error types that cross subsystem borders: codec failures and the
//! rejection type carried back through the hook traits.

use thiserror::Error;

/// Errors decoding the call-payload or reservation-token byte formats.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    /// The payload is shorter than its 4-byte selector.
    #[error("payload too short for a selector")]
    MissingSelector,

    /// The body after the selector failed to decode.
    #[error("malformed payload body: {0}")]
    MalformedBody(String),

    /// Batch dispatch arrays have mismatched lengths.
    #[error("batch arrays have mismatched lengths")]
    LengthMismatch,
}

/// A rejection surfaced by an account or sponsor hook.
///
/// Hooks are the only channel through which subsystems talk to the entry
/// ledger, so their failures collapse into this shared taxonomy. Each
/// subsystem keeps its own richer error enum and converts on the way out.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HookRejection {
    /// Signature or permission failure.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// A quota, limit, or subscription policy refused the operation.
    #[error("policy violation: {0}")]
    Policy(String),

    /// The hook could not interpret its input.
    #[error("unsupported: {0}")]
    Unsupported(String),
}
