//! # Session-Key Registry
//!
//! Stores an account's delegated credentials and decides whether a given
//! authorization may act on the account's behalf.
//!
//! ## Authorization Pipeline
//!
//! 1. Read the 4-byte scheme tag and derive the credential identity.
//! 2. Look the entry up; absent or revoked fails.
//! 3. Cryptographically verify the signature over the operation hash.
//! 4. Check `now` against `[valid_after, valid_until]`.
//! 5. Run the sensitive-selector blocklist on the outer payload,
//!    unconditionally, before any allow-list.
//! 6. Extract the inner `(target, value)` pairs and check each against the
//!    target/selector allow-lists and the per-call value cap.
//! 7. Check the cumulative value and call-count budgets.
//! 8. Commit both counters and return the credential's validity window.
//!
//! Steps 1–7 mutate nothing; identical inputs always yield the same
//! decision, and counters only advance on acceptance.

use std::collections::HashMap;

use shared_crypto::{recover_address, verify_p256};
use shared_types::{
    selectors, Address, CallPayload, Hash, ParsedAuthorization, Selector, Timestamp,
    ValidityWindow, U256,
};
use tracing::{debug, info};

use super::entities::{
    KeyIdentity, KeyMaterial, SessionKey, SessionKeyDescriptor, MAX_ALLOWED_SELECTORS,
    MAX_ALLOWED_TARGETS,
};
use super::errors::SessionKeyError;
use crate::events::payloads::{KeyGrantedPayload, KeyRevokedPayload, KeyUsedPayload};
use crate::events::SessionKeyEvent;

/// Per-account registry of delegated credentials.
#[derive(Debug, Default)]
pub struct SessionKeyRegistry {
    /// The account this registry belongs to. Credentials may never be
    /// scoped to call back into it.
    account: Address,
    keys: HashMap<KeyIdentity, SessionKey>,
    events: Vec<SessionKeyEvent>,
}

impl SessionKeyRegistry {
    /// Create an empty registry for `account`.
    pub fn new(account: Address) -> Self {
        Self {
            account,
            keys: HashMap::new(),
            events: Vec::new(),
        }
    }

    /// Register a delegated credential. Owner gating happens in the
    /// embedding account; the registry enforces the descriptor policy.
    pub fn grant(
        &mut self,
        descriptor: SessionKeyDescriptor,
        now: Timestamp,
    ) -> Result<KeyIdentity, SessionKeyError> {
        validate_material(&descriptor.material)?;

        if descriptor.valid_until <= now {
            return Err(SessionKeyError::AlreadyExpired);
        }
        if descriptor.valid_until <= descriptor.valid_after {
            return Err(SessionKeyError::EmptyWindow);
        }
        if descriptor.valid_until - descriptor.valid_after > shared_types::THIRTY_DAYS_SECS {
            return Err(SessionKeyError::SpanTooLong);
        }
        if descriptor.allowed_targets.is_empty() {
            return Err(SessionKeyError::NoTargets);
        }
        if descriptor.allowed_targets.contains(&self.account) {
            return Err(SessionKeyError::SelfTarget);
        }
        if descriptor.allowed_targets.len() > MAX_ALLOWED_TARGETS {
            return Err(SessionKeyError::TooManyTargets(MAX_ALLOWED_TARGETS));
        }
        if descriptor.allowed_selectors.len() > MAX_ALLOWED_SELECTORS {
            return Err(SessionKeyError::TooManySelectors(MAX_ALLOWED_SELECTORS));
        }

        let identity = descriptor.material.identity();
        // A revoked entry keeps blocking its identity until it lapses.
        if let Some(existing) = self.keys.get(&identity) {
            if !existing.lapsed(now) {
                return Err(SessionKeyError::IdentityInUse(identity));
            }
        }

        let key = SessionKey {
            material: descriptor.material,
            valid_after: descriptor.valid_after,
            valid_until: descriptor.valid_until,
            revoked: false,
            allowed_targets: descriptor.allowed_targets.into_iter().collect(),
            allowed_selectors: descriptor.allowed_selectors.into_iter().collect(),
            max_value_per_call: descriptor.max_value_per_call,
            max_value_total: descriptor.max_value_total,
            value_used: U256::zero(),
            max_calls: descriptor.max_calls,
            calls_used: 0,
        };

        info!(identity = %identity, valid_until = key.valid_until, "session key granted");
        self.events
            .push(SessionKeyEvent::Granted(KeyGrantedPayload {
                identity,
                valid_after: key.valid_after,
                valid_until: key.valid_until,
                target_count: key.allowed_targets.len() as u32,
                selector_count: key.allowed_selectors.len() as u32,
            }));
        self.keys.insert(identity, key);
        Ok(identity)
    }

    /// Permanently revoke the credential under `identity`.
    pub fn revoke(&mut self, identity: KeyIdentity) -> Result<(), SessionKeyError> {
        let key = self
            .keys
            .get_mut(&identity)
            .ok_or(SessionKeyError::NotFound(identity))?;
        key.revoked = true;

        info!(identity = %identity, "session key revoked");
        self.events
            .push(SessionKeyEvent::Revoked(KeyRevokedPayload { identity }));
        Ok(())
    }

    /// Decide whether `authorization` may dispatch `call_payload` on the
    /// account's behalf, committing usage counters on acceptance.
    pub fn authorize(
        &mut self,
        op_hash: &Hash,
        authorization: &[u8],
        call_payload: &[u8],
        now: Timestamp,
    ) -> Result<ValidityWindow, SessionKeyError> {
        let parsed = ParsedAuthorization::parse(authorization)
            .map_err(|e| SessionKeyError::NotSessionScheme(e.to_string()))?;
        let identity = verify_authorization(op_hash, &parsed)?;

        let key = self
            .keys
            .get(&identity)
            .ok_or(SessionKeyError::NotFound(identity))?;
        if key.revoked {
            return Err(SessionKeyError::Revoked(identity));
        }
        if !(key.valid_after <= now && now <= key.valid_until) {
            return Err(SessionKeyError::OutsideWindow);
        }

        // Fixed policy layer: sensitive selectors fail regardless of any
        // allow-list the credential carries.
        let outer = Selector::read(call_payload).ok_or_else(|| {
            SessionKeyError::UnanalyzablePayload("payload shorter than a selector".into())
        })?;
        if selectors::is_sensitive(outer) {
            return Err(SessionKeyError::SensitiveSelector(outer));
        }

        let payload = CallPayload::decode(call_payload)
            .map_err(|e| SessionKeyError::UnanalyzablePayload(e.to_string()))?;
        let calls = match &payload {
            CallPayload::Execute(_) | CallPayload::ExecuteBatch(_) => payload.inner_calls(),
            CallPayload::Other { selector, .. } => {
                return Err(SessionKeyError::UnanalyzablePayload(format!(
                    "unknown dispatch selector {selector}"
                )));
            }
        };

        let mut total_value = U256::zero();
        for call in calls {
            if !key.allowed_targets.contains(&call.target) {
                return Err(SessionKeyError::TargetNotAllowed(call.target));
            }
            if let Some(inner) = call.selector() {
                if !key.allowed_selectors.is_empty() && !key.allowed_selectors.contains(&inner) {
                    return Err(SessionKeyError::SelectorNotAllowed(inner));
                }
            }
            if !key.max_value_per_call.is_zero() && call.value > key.max_value_per_call {
                return Err(SessionKeyError::ValuePerCallExceeded);
            }
            total_value = total_value
                .checked_add(call.value)
                .ok_or(SessionKeyError::ValueTotalExceeded)?;
        }

        if !key.max_value_total.is_zero() {
            let projected = key
                .value_used
                .checked_add(total_value)
                .ok_or(SessionKeyError::ValueTotalExceeded)?;
            if projected > key.max_value_total {
                return Err(SessionKeyError::ValueTotalExceeded);
            }
        }
        let call_count = calls.len() as u64;
        if key.max_calls > 0 {
            let projected = key
                .calls_used
                .checked_add(call_count)
                .ok_or(SessionKeyError::CallBudgetExceeded)?;
            if projected > key.max_calls {
                return Err(SessionKeyError::CallBudgetExceeded);
            }
        }

        // All checks passed: commit.
        let window = ValidityWindow {
            valid_after: key.valid_after,
            valid_until: key.valid_until,
        };
        let key = self
            .keys
            .get_mut(&identity)
            .ok_or(SessionKeyError::NotFound(identity))?;
        key.value_used = key.value_used.saturating_add(total_value);
        key.calls_used = key.calls_used.saturating_add(call_count);

        debug!(
            identity = %identity,
            calls = call_count,
            value = %total_value,
            "session key authorized operation"
        );
        self.events.push(SessionKeyEvent::Used(KeyUsedPayload {
            identity,
            calls: call_count,
            total_value,
        }));
        Ok(window)
    }

    /// The stored credential under `identity`, if any.
    pub fn get(&self, identity: &KeyIdentity) -> Option<&SessionKey> {
        self.keys.get(identity)
    }

    /// Identities of credentials usable at `now`.
    pub fn active_keys(&self, now: Timestamp) -> impl Iterator<Item = &KeyIdentity> {
        self.keys
            .iter()
            .filter(move |(_, key)| key.usable(now))
            .map(|(identity, _)| identity)
    }

    /// Drain accumulated observability events in emission order.
    pub fn take_events(&mut self) -> Vec<SessionKeyEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Verify the signature inside a parsed session authorization and return
/// the credential identity it claims.
fn verify_authorization(
    op_hash: &Hash,
    parsed: &ParsedAuthorization,
) -> Result<KeyIdentity, SessionKeyError> {
    match parsed {
        ParsedAuthorization::Owner(_) => Err(SessionKeyError::NotSessionScheme(
            "unprefixed owner signature".into(),
        )),
        ParsedAuthorization::SessionSecp256k1 {
            identity,
            signature,
        } => {
            let recovered = recover_address(op_hash, signature)
                .map_err(|e| SessionKeyError::BadSignature(e.to_string()))?;
            if recovered != *identity {
                return Err(SessionKeyError::BadSignature(
                    "recovered signer does not match claimed identity".into(),
                ));
            }
            Ok(KeyIdentity::Secp256k1(*identity))
        }
        ParsedAuthorization::SessionP256 { x, y, r, s } => {
            verify_p256(op_hash, x, y, r, s)
                .map_err(|e| SessionKeyError::BadSignature(e.to_string()))?;
            Ok(KeyMaterial::P256 { x: *x, y: *y }.identity())
        }
    }
}

/// Reject zero or off-curve key material at grant time.
fn validate_material(material: &KeyMaterial) -> Result<(), SessionKeyError> {
    match material {
        KeyMaterial::Secp256k1 { address } => {
            if address == &[0u8; 20] {
                return Err(SessionKeyError::InvalidKeyMaterial);
            }
        }
        KeyMaterial::P256 { x, y } => {
            if x == &[0u8; 32] && y == &[0u8; 32] {
                return Err(SessionKeyError::InvalidKeyMaterial);
            }
            // The coordinates must describe a point on the curve; verify_p256
            // rebuilds the key the same way, so probe it with a zero signature
            // and distinguish "bad point" from "bad signature".
            if matches!(
                verify_p256(&[0u8; 32], x, y, &[1u8; 32], &[1u8; 32]),
                Err(shared_crypto::CryptoError::InvalidPoint)
            ) {
                return Err(SessionKeyError::InvalidKeyMaterial);
            }
        }
    }
    Ok(())
}
