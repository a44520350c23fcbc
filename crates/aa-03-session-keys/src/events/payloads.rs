//! Event payloads for session-key lifecycle and usage.

use serde::{Deserialize, Serialize};
use shared_types::{Timestamp, U256};

use crate::domain::entities::KeyIdentity;

/// Published after a credential is granted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeyGrantedPayload {
    /// Identity of the new credential.
    pub identity: KeyIdentity,
    /// Earliest acceptance timestamp.
    pub valid_after: Timestamp,
    /// Latest acceptance timestamp.
    pub valid_until: Timestamp,
    /// Size of the allowed-target set.
    pub target_count: u32,
    /// Size of the allowed-selector set (0 = wildcard).
    pub selector_count: u32,
}

/// Published after a credential is revoked.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeyRevokedPayload {
    /// Identity of the revoked credential.
    pub identity: KeyIdentity,
}

/// Published after a credential authorizes an operation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeyUsedPayload {
    /// Identity of the authorizing credential.
    pub identity: KeyIdentity,
    /// Inner calls committed against the call budget.
    pub calls: u64,
    /// Value committed against the cumulative cap.
    pub total_value: U256,
}
