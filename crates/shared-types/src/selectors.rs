//! # Selector Registry
//!
//! A [`Selector`] is the leading 4 bytes of a call payload, derived as the
//! first 4 bytes of `keccak256(signature_string)`, following the Ethereum
//! call signature convention.
//!
//! The registry defines the two dispatch shapes accounts understand and the
//! fixed sensitive set that session keys may never invoke.

use serde::{Deserialize, Serialize};

use crate::hashing::keccak256;

/// A 4-byte call signature tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Selector(pub [u8; 4]);

impl Selector {
    /// Derive the selector for a human-readable call signature.
    pub fn of(signature: &str) -> Self {
        let hash = keccak256(signature.as_bytes());
        let mut tag = [0u8; 4];
        tag.copy_from_slice(&hash[..4]);
        Self(tag)
    }

    /// Read a selector from the head of a payload, if long enough.
    pub fn read(payload: &[u8]) -> Option<Self> {
        if payload.len() < 4 {
            return None;
        }
        let mut tag = [0u8; 4];
        tag.copy_from_slice(&payload[..4]);
        Some(Self(tag))
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Single-call dispatch: `execute(address,uint256,bytes)`.
pub fn execute() -> Selector {
    Selector::of("execute(address,uint256,bytes)")
}

/// Batch dispatch: `executeBatch(address[],uint256[],bytes[])`.
pub fn execute_batch() -> Selector {
    Selector::of("executeBatch(address[],uint256[],bytes[])")
}

/// Primary-owner rotation: `transferOwnership(address)`.
pub fn transfer_ownership() -> Selector {
    Selector::of("transferOwnership(address)")
}

/// Session-key creation: `grantSessionKey(bytes)`.
pub fn grant_session_key() -> Selector {
    Selector::of("grantSessionKey(bytes)")
}

/// Session-key revocation: `revokeSessionKey(bytes32)`.
pub fn revoke_session_key() -> Selector {
    Selector::of("revokeSessionKey(bytes32)")
}

/// Deposit withdrawal: `withdrawTo(address,uint256)`.
pub fn withdraw_to() -> Selector {
    Selector::of("withdrawTo(address,uint256)")
}

/// Stake unlock (first step of the stake exit path): `unlockStake()`.
pub fn unlock_stake() -> Selector {
    Selector::of("unlockStake()")
}

/// Stake withdrawal: `withdrawStake(address)`.
pub fn withdraw_stake() -> Selector {
    Selector::of("withdrawStake(address)")
}

/// Whether a selector belongs to the fixed sensitive set.
///
/// Sensitive selectors cover ownership rotation, session-key management,
/// and every withdrawal path. The check runs before any allow-list and no
/// session-key configuration can override it.
pub fn is_sensitive(selector: Selector) -> bool {
    selector == transfer_ownership()
        || selector == grant_session_key()
        || selector == revoke_session_key()
        || selector == withdraw_to()
        || selector == unlock_stake()
        || selector == withdraw_stake()
}
