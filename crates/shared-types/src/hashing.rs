//! # Keccak-256 Hashing
//!
//! The single hash function used for operation hashes, selector derivation,
//! and credential identities.

use sha3::{Digest, Keccak256};

use crate::entities::Hash;

/// Keccak256 hash function.
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}
