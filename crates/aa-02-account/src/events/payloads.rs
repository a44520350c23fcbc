//! Event payload definitions.

use aa_03_session_keys::KeyIdentity;
use serde::{Deserialize, Serialize};
use shared_types::{Address, Hash};

/// Which authorization scheme validated an operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthScheme {
    /// Untagged primary-owner secp256k1 signature.
    Owner,
    /// Tagged session-key secp256k1 signature.
    SessionSecp256k1,
    /// Tagged session-key NIST P-256 signature.
    SessionP256,
}

/// Payload for [`super::AccountEvent::OperationValidated`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationValidatedPayload {
    /// Hash of the validated operation.
    pub op_hash: Hash,
    /// Scheme that accepted the authorization.
    pub scheme: AuthScheme,
}

/// Payload for [`super::AccountEvent::SessionKeyGranted`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionKeyGrantedPayload {
    /// Identity of the new credential.
    pub identity: KeyIdentity,
}

/// Payload for [`super::AccountEvent::SessionKeyRevoked`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionKeyRevokedPayload {
    /// Identity of the revoked credential.
    pub identity: KeyIdentity,
}

/// Payload for [`super::AccountEvent::OwnershipTransferred`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipTransferredPayload {
    /// Owner before the transfer.
    pub previous: Address,
    /// Owner after the transfer.
    pub new_owner: Address,
}
