//! # ECDSA (NIST P-256)
//!
//! Verification for the tag-`0x00000002` session-key scheme, which carries
//! the public key as a raw `(x, y)` coordinate pair alongside a raw
//! `(r, s)` signature. The verifying key is rebuilt from the coordinates on
//! every call; off-curve points are rejected.

use ::p256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use ::p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use ::p256::{EncodedPoint, FieldBytes};
use shared_types::Hash;

use crate::errors::CryptoError;

/// Verify a P-256 signature over a 32-byte prehash.
///
/// `x`/`y` are the public key's affine coordinates; `r`/`s` the raw
/// signature scalars.
pub fn verify_p256(
    hash: &Hash,
    x: &[u8; 32],
    y: &[u8; 32],
    r: &[u8; 32],
    s: &[u8; 32],
) -> Result<(), CryptoError> {
    let point = EncodedPoint::from_affine_coordinates(
        FieldBytes::from_slice(x),
        FieldBytes::from_slice(y),
        false,
    );
    let verifying_key =
        VerifyingKey::from_encoded_point(&point).map_err(|_| CryptoError::InvalidPoint)?;

    let signature =
        Signature::from_scalars(*r, *s).map_err(|_| CryptoError::InvalidFormat)?;

    verifying_key
        .verify_prehash(hash, &signature)
        .map_err(|_| CryptoError::VerificationFailed)
}

/// A P-256 keypair. Wallet-side helper mirroring [`crate::Secp256k1KeyPair`].
#[derive(Clone, Debug)]
pub struct P256KeyPair {
    signing_key: SigningKey,
}

impl P256KeyPair {
    /// Generate a fresh random keypair.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::random(&mut rand::thread_rng()),
        }
    }

    /// The public key's affine coordinates `(x, y)`.
    pub fn coordinates(&self) -> ([u8; 32], [u8; 32]) {
        let point = self.signing_key.verifying_key().to_encoded_point(false);
        let mut x = [0u8; 32];
        let mut y = [0u8; 32];
        // Uncompressed SEC1 points always carry both coordinates.
        if let (Some(px), Some(py)) = (point.x(), point.y()) {
            x.copy_from_slice(px);
            y.copy_from_slice(py);
        }
        (x, y)
    }

    /// Sign a 32-byte prehash, producing raw `(r, s)` scalars.
    pub fn sign_prehash(&self, hash: &Hash) -> Result<([u8; 32], [u8; 32]), CryptoError> {
        let signature: Signature = self
            .signing_key
            .sign_prehash(hash)
            .map_err(|_| CryptoError::SigningFailed)?;
        let (r, s) = signature.split_bytes();
        Ok((r.into(), s.into()))
    }
}
