//! # Authorization Envelope
//!
//! An operation's `authorization` field is tagged by its leading 4 bytes:
//!
//! | Tag | Scheme | Layout after the tag |
//! |-----|--------|----------------------|
//! | `0x00000001` | secp256k1 session key | 20-byte identity ‖ 65-byte `(r‖s‖v)` |
//! | `0x00000002` | P-256 session key | 32-byte X ‖ 32-byte Y ‖ 32-byte r ‖ 32-byte s |
//! | none | primary owner (secp256k1) | unprefixed 65-byte `(r‖s‖v)` |
//!
//! An unrecognized tag means the bytes are an unprefixed owner signature.

use crate::entities::Address;

/// Tag for the secp256k1 session-key scheme.
pub const AUTH_TAG_SECP256K1: [u8; 4] = [0x00, 0x00, 0x00, 0x01];

/// Tag for the P-256 session-key scheme.
pub const AUTH_TAG_P256: [u8; 4] = [0x00, 0x00, 0x00, 0x02];

/// A structurally-parsed authorization. Cryptographic verification happens
/// downstream (the account for owner signatures, the session-key registry
/// for tagged ones); parsing only splits the envelope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParsedAuthorization {
    /// Unprefixed primary-owner signature bytes.
    Owner(Vec<u8>),
    /// Tag `0x00000001`: claimed identity plus a recoverable signature.
    SessionSecp256k1 {
        identity: Address,
        signature: [u8; 65],
    },
    /// Tag `0x00000002`: public-key coordinates plus a raw `(r, s)` pair.
    SessionP256 {
        x: [u8; 32],
        y: [u8; 32],
        r: [u8; 32],
        s: [u8; 32],
    },
}

/// Malformed tagged-authorization layouts.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum AuthorizationParseError {
    /// Tag `0x00000001` requires 4 + 20 + 65 bytes.
    #[error("secp256k1 session authorization must be 89 bytes, got {0}")]
    BadSecp256k1Length(usize),

    /// Tag `0x00000002` requires 4 + 128 bytes.
    #[error("p256 session authorization must be 132 bytes, got {0}")]
    BadP256Length(usize),
}

impl ParsedAuthorization {
    /// Split an authorization envelope by its scheme tag.
    ///
    /// Anything without a recognized tag (including signatures shorter
    /// than 4 bytes) is an owner signature; its validity is judged by the
    /// account, not here.
    pub fn parse(authorization: &[u8]) -> Result<Self, AuthorizationParseError> {
        if authorization.len() >= 4 {
            let tag = &authorization[..4];
            if tag == AUTH_TAG_SECP256K1 {
                if authorization.len() != 4 + 20 + 65 {
                    return Err(AuthorizationParseError::BadSecp256k1Length(
                        authorization.len(),
                    ));
                }
                let mut identity = [0u8; 20];
                identity.copy_from_slice(&authorization[4..24]);
                let mut signature = [0u8; 65];
                signature.copy_from_slice(&authorization[24..89]);
                return Ok(Self::SessionSecp256k1 {
                    identity,
                    signature,
                });
            }
            if tag == AUTH_TAG_P256 {
                if authorization.len() != 4 + 128 {
                    return Err(AuthorizationParseError::BadP256Length(authorization.len()));
                }
                let mut x = [0u8; 32];
                let mut y = [0u8; 32];
                let mut r = [0u8; 32];
                let mut s = [0u8; 32];
                x.copy_from_slice(&authorization[4..36]);
                y.copy_from_slice(&authorization[36..68]);
                r.copy_from_slice(&authorization[68..100]);
                s.copy_from_slice(&authorization[100..132]);
                return Ok(Self::SessionP256 { x, y, r, s });
            }
        }
        Ok(Self::Owner(authorization.to_vec()))
    }

    /// Whether this authorization defers to the session-key registry.
    pub fn is_session(&self) -> bool {
        !matches!(self, Self::Owner(_))
    }
}
