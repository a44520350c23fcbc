//! Observability events emitted by the registry.

pub mod payloads;

use payloads::{KeyGrantedPayload, KeyRevokedPayload, KeyUsedPayload};
use serde::{Deserialize, Serialize};

/// Events accumulated by the registry and drained by the embedding account.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum SessionKeyEvent {
    /// A credential was granted.
    Granted(KeyGrantedPayload),
    /// A credential was revoked.
    Revoked(KeyRevokedPayload),
    /// A credential authorized an operation.
    Used(KeyUsedPayload),
}
