//! # Crypto Errors
//!
//! Error types for signing and verification operations.

use thiserror::Error;

/// Errors that can occur during signing or signature verification.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// The signature format is invalid (wrong length, invalid encoding).
    #[error("Invalid signature format")]
    InvalidFormat,

    /// Signature has a high S value and could be malleated.
    #[error("Malleable signature (high S value)")]
    MalleableSignature,

    /// Invalid recovery ID (v must be 0, 1, 27, or 28).
    #[error("Invalid recovery ID: {0}")]
    InvalidRecoveryId(u8),

    /// Failed to recover a public key from a signature.
    #[error("Failed to recover public key")]
    RecoveryFailed,

    /// Recovered signer does not match the expected signer.
    #[error("Signer mismatch: expected {expected:?}, got {actual:?}")]
    SignerMismatch {
        /// The signer required by the caller.
        expected: [u8; 20],
        /// The signer actually recovered from the signature.
        actual: [u8; 20],
    },

    /// Public-key coordinates do not describe a valid curve point.
    #[error("Invalid curve point")]
    InvalidPoint,

    /// Signature verification failed.
    #[error("Signature verification failed")]
    VerificationFailed,

    /// Producing a signature failed.
    #[error("Signing failed")]
    SigningFailed,
}
