//! # Session-Key Errors

use shared_types::{HookRejection, Selector};
use thiserror::Error;

use super::entities::KeyIdentity;

/// Errors raised by the session-key registry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionKeyError {
    /// Grant: key material is zero or not valid for the chosen scheme.
    #[error("invalid key material for the chosen scheme")]
    InvalidKeyMaterial,

    /// Grant: `valid_until` is already in the past.
    #[error("credential would already be expired")]
    AlreadyExpired,

    /// Grant: `valid_until` does not lie after `valid_after`.
    #[error("validity window is empty")]
    EmptyWindow,

    /// Grant: window longer than the 30-day cap.
    #[error("validity span exceeds 30 days")]
    SpanTooLong,

    /// Grant: the allowed-target set is empty.
    #[error("allowed-target set is empty")]
    NoTargets,

    /// Grant: the credential would be scoped to its own account.
    #[error("credential may not target its own account")]
    SelfTarget,

    /// Grant: more than 10 allowed targets.
    #[error("allowed-target set exceeds {0} entries")]
    TooManyTargets(usize),

    /// Grant: more than 20 allowed selectors.
    #[error("allowed-selector set exceeds {0} entries")]
    TooManySelectors(usize),

    /// Grant: a still-live entry already uses this identity.
    #[error("identity {0} is still registered")]
    IdentityInUse(KeyIdentity),

    /// Revoke/authorize: no entry under this identity.
    #[error("no credential registered under {0}")]
    NotFound(KeyIdentity),

    /// Authorize: the credential was revoked.
    #[error("credential {0} is revoked")]
    Revoked(KeyIdentity),

    /// Authorize: `now` is outside `[valid_after, valid_until]`.
    #[error("credential is outside its validity window")]
    OutsideWindow,

    /// Authorize: the authorization bytes are not a session scheme.
    #[error("authorization is not a session-key scheme: {0}")]
    NotSessionScheme(String),

    /// Authorize: the signature did not verify.
    #[error("signature verification failed: {0}")]
    BadSignature(String),

    /// Authorize: the leading call-signature is in the sensitive set.
    #[error("selector {0} is blocked for session keys")]
    SensitiveSelector(Selector),

    /// Authorize: the payload is not an analyzable dispatch shape.
    #[error("payload shape cannot be checked against credential scopes: {0}")]
    UnanalyzablePayload(String),

    /// Authorize: an inner call targets an address outside the allow-list.
    #[error("target 0x{} is not allowed", hex::encode(.0))]
    TargetNotAllowed([u8; 20]),

    /// Authorize: an inner selector is outside the allow-list.
    #[error("inner selector {0} is not allowed")]
    SelectorNotAllowed(Selector),

    /// Authorize: a single call's value exceeds the per-call cap.
    #[error("call value exceeds the per-call cap")]
    ValuePerCallExceeded,

    /// Authorize: cumulative value would exceed the total cap.
    #[error("cumulative value would exceed the total cap")]
    ValueTotalExceeded,

    /// Authorize: the call-count budget would be exceeded.
    #[error("call budget exhausted")]
    CallBudgetExceeded,
}

impl From<SessionKeyError> for HookRejection {
    fn from(err: SessionKeyError) -> Self {
        match err {
            SessionKeyError::NotFound(_)
            | SessionKeyError::Revoked(_)
            | SessionKeyError::OutsideWindow
            | SessionKeyError::BadSignature(_)
            | SessionKeyError::NotSessionScheme(_) => HookRejection::Unauthorized(err.to_string()),
            SessionKeyError::UnanalyzablePayload(_) => HookRejection::Unsupported(err.to_string()),
            _ => HookRejection::Policy(err.to_string()),
        }
    }
}
