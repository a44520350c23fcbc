//! # Session-Key Properties
//!
//! Authorization must be a pure decision over its inputs: repeated calls
//! with the same inputs yield the same answer, and usage counters move
//! only when an operation is fully accepted.

#[cfg(test)]
mod tests {
    use aa_03_session_keys::{
        KeyMaterial, SessionKeyDescriptor, SessionKeyError, SessionKeyRegistry,
    };
    use proptest::prelude::*;
    use shared_crypto::Secp256k1KeyPair;
    use shared_types::U256;

    use crate::harness::{execute_payload, session_secp_authorization, NOW};

    const ACCOUNT: [u8; 20] = [0xAA; 20];
    const TARGET: [u8; 20] = [0x77; 20];

    fn registry_with_key(session: &Secp256k1KeyPair) -> SessionKeyRegistry {
        let mut registry = SessionKeyRegistry::new(ACCOUNT);
        registry
            .grant(
                SessionKeyDescriptor {
                    material: KeyMaterial::Secp256k1 {
                        address: session.address(),
                    },
                    valid_after: NOW - 60,
                    valid_until: NOW + 3_600,
                    allowed_targets: vec![TARGET],
                    allowed_selectors: vec![],
                    max_value_per_call: U256::from(1_000u64),
                    max_value_total: U256::from(10_000u64),
                    max_calls: 100,
                },
                NOW,
            )
            .expect("grant");
        registry
    }

    proptest! {
        /// Counters advance exactly when the call is accepted: an accepted
        /// value is added once, a rejected one not at all.
        #[test]
        fn prop_counters_advance_only_on_acceptance(value in 1u64..2_000) {
            let session = Secp256k1KeyPair::generate();
            let mut registry = registry_with_key(&session);
            let identity = KeyMaterial::Secp256k1 {
                address: session.address(),
            }
            .identity();

            let payload = execute_payload(TARGET, value, vec![]);
            let op_hash = [0x42u8; 32];
            let authorization = session_secp_authorization(&session, &op_hash);

            let result = registry.authorize(&op_hash, &authorization, &payload, NOW);
            let key = registry.get(&identity).unwrap();

            if value <= 1_000 {
                prop_assert!(result.is_ok());
                prop_assert_eq!(key.calls_used, 1);
                prop_assert_eq!(key.value_used, U256::from(value));
            } else {
                prop_assert_eq!(result, Err(SessionKeyError::ValuePerCallExceeded));
                prop_assert_eq!(key.calls_used, 0);
                prop_assert_eq!(key.value_used, U256::zero());
            }
        }

        /// A rejected authorization is deterministic: the same inputs fail
        /// the same way twice, and nothing in the registry moves.
        #[test]
        fn prop_rejections_are_deterministic(op_hash in any::<[u8; 32]>()) {
            let session = Secp256k1KeyPair::generate();
            let imposter = Secp256k1KeyPair::generate();
            let mut registry = registry_with_key(&session);
            let identity = KeyMaterial::Secp256k1 {
                address: session.address(),
            }
            .identity();

            let payload = execute_payload(TARGET, 1, vec![]);
            // The imposter signs but claims the real credential's identity.
            let mut authorization = shared_types::AUTH_TAG_SECP256K1.to_vec();
            authorization.extend_from_slice(&session.address());
            authorization.extend_from_slice(
                &imposter.sign_prehash(&op_hash).expect("signing"),
            );

            let first = registry.authorize(&op_hash, &authorization, &payload, NOW);
            let second = registry.authorize(&op_hash, &authorization, &payload, NOW);

            prop_assert!(first.is_err());
            prop_assert_eq!(first, second);
            let key = registry.get(&identity).unwrap();
            prop_assert_eq!(key.calls_used, 0);
            prop_assert_eq!(key.value_used, U256::zero());
        }
    }
}
