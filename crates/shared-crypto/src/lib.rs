//! # Shared Crypto - Signature Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `ecdsa` | secp256k1 | Owner and session-key signatures (tag `0x00000001`) |
//! | `p256` | NIST P-256 | Session-key signatures (tag `0x00000002`) |
//!
//! ## Security Properties
//!
//! - **secp256k1**: low-S normalization on signing, malleable (high-S)
//!   signatures rejected on verification
//! - **P-256**: verifying keys rebuilt from raw coordinates, off-curve
//!   points rejected
//! - **Keccak-256**: shared with `shared-types` for operation hashes,
//!   selectors, and credential identities

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ecdsa;
pub mod errors;
pub mod p256;

// Re-exports
pub use ecdsa::{
    address_from_pubkey, recover_address, verify_signer, Secp256k1KeyPair, SignatureBytes,
};
pub use errors::CryptoError;
pub use p256::{verify_p256, P256KeyPair};
pub use shared_types::keccak256;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
