//! # ECDSA (secp256k1)
//!
//! Signing, recovery, and verification for the primary-owner scheme and
//! the tag-`0x00000001` session-key scheme.
//!
//! ## Security Notes
//!
//! - **Malleability Prevention**: signatures are normalized to low-S on
//!   signing; high-S signatures are rejected on verification
//! - **Recovery IDs**: v ∈ {0, 1, 27, 28}
//! - Uses the k256 crate for all curve arithmetic

use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use shared_types::{keccak256, Address, Hash};

use crate::errors::CryptoError;

/// A 65-byte recoverable signature: `r(32) ‖ s(32) ‖ v(1)`.
pub type SignatureBytes = [u8; 65];

/// A secp256k1 keypair. Wallet-side helper: production verification paths
/// only ever see the 65-byte signature and the 20-byte address.
#[derive(Clone, Debug)]
pub struct Secp256k1KeyPair {
    signing_key: SigningKey,
}

impl Secp256k1KeyPair {
    /// Generate a fresh random keypair.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::random(&mut rand::thread_rng()),
        }
    }

    /// The Ethereum-style address of this keypair.
    pub fn address(&self) -> Address {
        address_from_pubkey(self.signing_key.verifying_key())
    }

    /// Sign a 32-byte prehash, producing a low-S 65-byte signature.
    pub fn sign_prehash(&self, hash: &Hash) -> Result<SignatureBytes, CryptoError> {
        let (sig, recid) = self
            .signing_key
            .sign_prehash_recoverable(hash)
            .map_err(|_| CryptoError::SigningFailed)?;

        // Normalize to low-S; flipping S flips the recovery parity.
        let (sig, recid) = match sig.normalize_s() {
            Some(normalized) => {
                let flipped = RecoveryId::try_from(recid.to_byte() ^ 1)
                    .map_err(|_| CryptoError::SigningFailed)?;
                (normalized, flipped)
            }
            None => (sig, recid),
        };

        let mut bytes = [0u8; 65];
        bytes[..64].copy_from_slice(&sig.to_bytes());
        bytes[64] = recid.to_byte() + 27;
        Ok(bytes)
    }
}

/// Recover the signer's address from a 65-byte signature over `hash`.
///
/// Rejects malformed scalars, high-S (malleable) signatures, and invalid
/// recovery IDs.
pub fn recover_address(hash: &Hash, signature: &SignatureBytes) -> Result<Address, CryptoError> {
    let recovery_id = parse_recovery_id(signature[64])?;

    let sig = Signature::from_slice(&signature[..64]).map_err(|_| CryptoError::InvalidFormat)?;
    if sig.normalize_s().is_some() {
        return Err(CryptoError::MalleableSignature);
    }

    let recovered = VerifyingKey::recover_from_prehash(hash, &sig, recovery_id)
        .map_err(|_| CryptoError::RecoveryFailed)?;
    Ok(address_from_pubkey(&recovered))
}

/// Recover the signer and require it to match `expected`.
pub fn verify_signer(
    hash: &Hash,
    signature: &SignatureBytes,
    expected: Address,
) -> Result<(), CryptoError> {
    let actual = recover_address(hash, signature)?;
    if actual != expected {
        return Err(CryptoError::SignerMismatch { expected, actual });
    }
    Ok(())
}

/// Derive the Ethereum-style address from a public key:
/// last 20 bytes of `keccak256(uncompressed_pubkey[1..])`.
pub fn address_from_pubkey(public_key: &VerifyingKey) -> Address {
    let encoded = public_key.to_encoded_point(false);
    let hash = keccak256(&encoded.as_bytes()[1..]); // Skip the 0x04 prefix

    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    address
}

/// Parse a recovery ID from the v byte. Valid values: 0, 1, 27, 28.
fn parse_recovery_id(v: u8) -> Result<RecoveryId, CryptoError> {
    let id = match v {
        0 | 27 => 0,
        1 | 28 => 1,
        _ => return Err(CryptoError::InvalidRecoveryId(v)),
    };
    RecoveryId::try_from(id).map_err(|_| CryptoError::InvalidRecoveryId(v))
}
