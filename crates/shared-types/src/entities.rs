//! # Core Domain Entities
//!
//! Defines the entities shared across the OpFlow subsystems.
//!
//! ## Clusters
//!
//! - **Operations**: [`Operation`], nonce composition helpers
//! - **Validation**: [`ValidityWindow`]
//! - **Execution**: [`ExecutionOutcome`], [`ExecutionReceipt`], [`CallOutcome`]

use serde::{Deserialize, Serialize};

use crate::hashing::keccak256;

// Re-export U256 from primitive-types for use across all subsystems
pub use primitive_types::U256;

/// A 32-byte Keccak-256 hash.
pub type Hash = [u8; 32];

/// A 20-byte Ethereum-style address.
pub type Address = [u8; 20];

/// Unix timestamp in seconds.
pub type Timestamp = u64;

/// A gas quantity.
pub type Gas = u64;

/// The 192-bit namespace component of an operation nonce.
pub type NonceKey = [u8; 24];

/// Length of the rolling subscription window and the session-key span cap.
pub const THIRTY_DAYS_SECS: u64 = 30 * 24 * 60 * 60;

/// Compose a 256-bit nonce from a 192-bit namespace and a 64-bit sequence.
pub fn compose_nonce(namespace: NonceKey, sequence: u64) -> U256 {
    let mut bytes = [0u8; 32];
    bytes[..24].copy_from_slice(&namespace);
    bytes[24..].copy_from_slice(&sequence.to_be_bytes());
    U256::from_big_endian(&bytes)
}

/// One caller-submitted, signed request to act on behalf of an account.
///
/// The operation is immutable once hashed: [`Operation::hash`] covers every
/// field except `authorization`, and the authorization signs that hash.
///
/// ## Bit Layout (hash/signature compatibility)
///
/// - `nonce`: 192-bit namespace ‖ 64-bit sequence
/// - gas limits pack as `(verification_gas_limit:128 ‖ call_gas_limit:128)`
/// - fees pack as `(priority_fee_per_gas:128 ‖ max_fee_per_gas:128)`
/// - `sponsor_payload`: 20-byte sponsor address prefix ‖ opaque bytes
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Operation {
    /// The account this operation acts on behalf of.
    pub sender: Address,
    /// 192-bit namespace ‖ 64-bit sequence.
    pub nonce: U256,
    /// Encoded call payload dispatched by the account (see `payload`).
    pub call_payload: Vec<u8>,
    /// Gas reserved for the validation phase.
    pub verification_gas_limit: u128,
    /// Gas reserved for the call dispatch.
    pub call_gas_limit: u128,
    /// Fixed overhead charged before any dispatch.
    pub pre_verification_gas: U256,
    /// Maximum total fee per unit of gas.
    pub max_fee_per_gas: u128,
    /// Priority fee per unit of gas.
    pub priority_fee_per_gas: u128,
    /// Empty, or a 20-byte sponsor address followed by opaque sponsor data.
    pub sponsor_payload: Vec<u8>,
    /// Scheme-tagged signature over the operation hash (see `authorization`).
    pub authorization: Vec<u8>,
}

impl Operation {
    /// The 192-bit nonce namespace.
    pub fn nonce_namespace(&self) -> NonceKey {
        let mut bytes = [0u8; 32];
        self.nonce.to_big_endian(&mut bytes);
        let mut key = [0u8; 24];
        key.copy_from_slice(&bytes[..24]);
        key
    }

    /// The 64-bit nonce sequence.
    pub fn nonce_sequence(&self) -> u64 {
        self.nonce.low_u64()
    }

    /// The sponsor address, when a well-formed sponsor payload is present.
    ///
    /// Returns `None` for an empty payload. Payloads shorter than 20 bytes
    /// are malformed; the entry ledger rejects them during validation.
    pub fn sponsor(&self) -> Option<Address> {
        if self.sponsor_payload.len() < 20 {
            return None;
        }
        let mut addr = [0u8; 20];
        addr.copy_from_slice(&self.sponsor_payload[..20]);
        Some(addr)
    }

    /// Opaque sponsor data following the 20-byte address prefix.
    pub fn sponsor_data(&self) -> &[u8] {
        if self.sponsor_payload.len() < 20 {
            &[]
        } else {
            &self.sponsor_payload[20..]
        }
    }

    /// The operation hash: Keccak-256 over the packed field encoding,
    /// excluding `authorization` (the authorization signs this hash).
    pub fn hash(&self) -> Hash {
        let mut packed = Vec::with_capacity(20 + 32 * 5);
        packed.extend_from_slice(&self.sender);

        let mut word = [0u8; 32];
        self.nonce.to_big_endian(&mut word);
        packed.extend_from_slice(&word);

        packed.extend_from_slice(&keccak256(&self.call_payload));
        packed.extend_from_slice(&pack_u128_pair(
            self.verification_gas_limit,
            self.call_gas_limit,
        ));

        self.pre_verification_gas.to_big_endian(&mut word);
        packed.extend_from_slice(&word);

        packed.extend_from_slice(&pack_u128_pair(
            self.priority_fee_per_gas,
            self.max_fee_per_gas,
        ));
        packed.extend_from_slice(&keccak256(&self.sponsor_payload));

        keccak256(&packed)
    }

    /// The worst-case cost reserved before execution:
    /// `(verification_gas_limit + call_gas_limit + pre_verification_gas)
    ///  × max_fee_per_gas`.
    ///
    /// Returns `None` on arithmetic overflow (such an operation can never
    /// be funded and is rejected during validation).
    pub fn required_prefund(&self) -> Option<U256> {
        let gas = U256::from(self.verification_gas_limit)
            .checked_add(U256::from(self.call_gas_limit))?
            .checked_add(self.pre_verification_gas)?;
        gas.checked_mul(U256::from(self.max_fee_per_gas))
    }
}

/// The time window within which an authorization is acceptable.
///
/// Primary-owner signatures yield the unbounded window; session-key
/// authorizations yield the credential's `[valid_after, valid_until]` span.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidityWindow {
    /// Earliest acceptable timestamp (inclusive).
    pub valid_after: Timestamp,
    /// Latest acceptable timestamp (inclusive).
    pub valid_until: Timestamp,
}

impl ValidityWindow {
    /// A window accepting any timestamp.
    pub fn unbounded() -> Self {
        Self {
            valid_after: 0,
            valid_until: Timestamp::MAX,
        }
    }

    /// Whether `now` falls inside the window.
    pub fn contains(&self, now: Timestamp) -> bool {
        self.valid_after <= now && now <= self.valid_until
    }
}

/// Outcome of dispatching an operation's call payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionOutcome {
    /// Every inner call completed.
    Succeeded,
    /// The dispatch reverted; its effects were discarded.
    Reverted,
}

/// Receipt returned by an account's execution entry point.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionReceipt {
    /// Whether the dispatch completed or reverted.
    pub outcome: ExecutionOutcome,
    /// Gas consumed by the dispatched calls.
    pub gas_used: Gas,
    /// Target-supplied revert reason, when the dispatch reverted.
    pub revert_reason: Option<String>,
}

impl ExecutionReceipt {
    /// Receipt for a completed dispatch.
    pub fn succeeded(gas_used: Gas) -> Self {
        Self {
            outcome: ExecutionOutcome::Succeeded,
            gas_used,
            revert_reason: None,
        }
    }

    /// Receipt for a reverted dispatch.
    pub fn reverted(gas_used: Gas, reason: impl Into<String>) -> Self {
        Self {
            outcome: ExecutionOutcome::Reverted,
            gas_used,
            revert_reason: Some(reason.into()),
        }
    }
}

/// Result of one inner call made through a [`crate::hooks::CallExecutor`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallOutcome {
    /// Gas the target consumed.
    pub gas_used: Gas,
    /// Raw return data.
    pub output: Vec<u8>,
}

/// Pack two u128 values big-endian into one 32-byte word: `(hi ‖ lo)`.
fn pack_u128_pair(hi: u128, lo: u128) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[..16].copy_from_slice(&hi.to_be_bytes());
    word[16..].copy_from_slice(&lo.to_be_bytes());
    word
}
