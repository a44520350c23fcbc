//! Observability events emitted by the account.

pub mod payloads;

use payloads::{
    OperationValidatedPayload, OwnershipTransferredPayload, SessionKeyGrantedPayload,
    SessionKeyRevokedPayload,
};
use serde::{Deserialize, Serialize};

/// All events an account can emit, in emission order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountEvent {
    /// An operation's authorization was accepted.
    OperationValidated(OperationValidatedPayload),
    /// A delegated credential was registered.
    SessionKeyGranted(SessionKeyGrantedPayload),
    /// A delegated credential was permanently revoked.
    SessionKeyRevoked(SessionKeyRevokedPayload),
    /// The primary owner changed.
    OwnershipTransferred(OwnershipTransferredPayload),
}
