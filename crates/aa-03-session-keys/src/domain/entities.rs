//! # Session-Key Entities
//!
//! A delegated credential is identified by scheme-specific key material and
//! carries a layered permission envelope:
//!
//! - a validity window (span capped at 30 days)
//! - an allowed-target set (non-empty, ≤ 10)
//! - an allowed-selector set (≤ 20; empty = any selector on allowed targets)
//! - per-call and cumulative value caps, and a call-count budget

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use shared_types::{keccak256, Address, Hash, Selector, Timestamp, U256};

/// Maximum size of a credential's allowed-target set.
pub const MAX_ALLOWED_TARGETS: usize = 10;

/// Maximum size of a credential's allowed-selector set.
pub const MAX_ALLOWED_SELECTORS: usize = 20;

/// Scheme-specific key material supplied at grant time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyMaterial {
    /// secp256k1: the credential is its Ethereum-style address.
    Secp256k1 {
        /// Address the recovered signer must match.
        address: Address,
    },
    /// NIST P-256: the credential is the public key's coordinate pair.
    P256 {
        /// Affine X coordinate.
        x: [u8; 32],
        /// Affine Y coordinate.
        y: [u8; 32],
    },
}

impl KeyMaterial {
    /// The registry identity this material registers under.
    pub fn identity(&self) -> KeyIdentity {
        match self {
            KeyMaterial::Secp256k1 { address } => KeyIdentity::Secp256k1(*address),
            KeyMaterial::P256 { x, y } => {
                let mut joined = [0u8; 64];
                joined[..32].copy_from_slice(x);
                joined[32..].copy_from_slice(y);
                KeyIdentity::P256(keccak256(&joined))
            }
        }
    }
}

/// Registry key for a delegated credential: the address itself for the
/// secp256k1 scheme, the hash of the coordinate pair for P-256.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyIdentity {
    /// secp256k1 scheme identity.
    Secp256k1(Address),
    /// P-256 scheme identity: `keccak256(X ‖ Y)`.
    P256(Hash),
}

impl std::fmt::Display for KeyIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyIdentity::Secp256k1(addr) => write!(f, "secp256k1:0x{}", hex::encode(addr)),
            KeyIdentity::P256(hash) => write!(f, "p256:0x{}", hex::encode(hash)),
        }
    }
}

/// Grant-time description of a delegated credential.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionKeyDescriptor {
    /// Scheme-specific key material.
    pub material: KeyMaterial,
    /// Earliest timestamp (inclusive) the credential may authorize.
    pub valid_after: Timestamp,
    /// Latest timestamp (inclusive) the credential may authorize.
    pub valid_until: Timestamp,
    /// Targets the credential may call. Non-empty, at most 10.
    pub allowed_targets: Vec<Address>,
    /// Selectors the credential may invoke. At most 20; empty = wildcard.
    pub allowed_selectors: Vec<Selector>,
    /// Per-call value cap; zero = uncapped.
    pub max_value_per_call: U256,
    /// Cumulative value cap; zero = uncapped.
    pub max_value_total: U256,
    /// Call-count budget; zero = uncapped.
    pub max_calls: u64,
}

/// A stored delegated credential.
///
/// ## State Machine
///
/// ```text
/// Unset ──grant──→ Active ──revoke──→ Revoked (terminal)
/// ```
///
/// Within `Active`, the credential is additionally time-gated purely as a
/// function of `now`: not-yet-valid before `valid_after`, expired after
/// `valid_until`. No stored transition accompanies those phases.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionKey {
    /// Key material the credential was granted with.
    pub material: KeyMaterial,
    /// Earliest acceptance timestamp (inclusive).
    pub valid_after: Timestamp,
    /// Latest acceptance timestamp (inclusive).
    pub valid_until: Timestamp,
    /// Set by revocation; terminal.
    pub revoked: bool,
    /// Targets the credential may call.
    pub allowed_targets: HashSet<Address>,
    /// Selector allow-list; empty = any selector on allowed targets.
    pub allowed_selectors: HashSet<Selector>,
    /// Per-call value cap; zero = uncapped.
    pub max_value_per_call: U256,
    /// Cumulative value cap; zero = uncapped.
    pub max_value_total: U256,
    /// Value committed by accepted authorizations.
    pub value_used: U256,
    /// Call-count budget; zero = uncapped.
    pub max_calls: u64,
    /// Calls committed by accepted authorizations.
    pub calls_used: u64,
}

impl SessionKey {
    /// Whether the credential's window has lapsed at `now`.
    pub fn lapsed(&self, now: Timestamp) -> bool {
        self.valid_until < now
    }

    /// Whether the credential can authorize at `now`: granted, not revoked,
    /// and inside its validity window.
    pub fn usable(&self, now: Timestamp) -> bool {
        !self.revoked && self.valid_after <= now && now <= self.valid_until
    }
}
