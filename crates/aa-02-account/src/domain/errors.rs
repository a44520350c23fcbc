//! # Account Errors

use aa_03_session_keys::SessionKeyError;
use thiserror::Error;

/// Errors raised by the account's owner-only surface.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccountError {
    /// The caller is not the primary owner.
    #[error("caller is not the account owner")]
    NotOwner,

    /// Ownership cannot be transferred to the zero address.
    #[error("new owner must not be the zero address")]
    ZeroAddressOwner,

    /// The session-key registry rejected the request.
    #[error(transparent)]
    SessionKey(#[from] SessionKeyError),
}
