//! # Batch Processing Properties
//!
//! Invariants of the two-pass pipeline: nonces advance strictly by one per
//! committed operation, and a validation failure anywhere leaves the
//! ledger exactly as it was.

#[cfg(test)]
mod tests {
    use aa_01_entry_ledger::{BatchEnv, BatchRejection, OperationLedger};
    use proptest::prelude::*;
    use shared_types::{compose_nonce, U256};

    use crate::harness::*;

    const SENDER: [u8; 20] = [0x01; 20];
    const TARGET: [u8; 20] = [0x77; 20];

    fn wired() -> (OperationLedger, BoxedAccounts, SponsorMap) {
        let mut ledger = OperationLedger::new();
        ledger
            .deposit(SENDER, U256::from(100_000_000u64))
            .expect("funding");
        let mut accounts = BoxedAccounts::default();
        accounts.accounts.insert(SENDER, Box::new(AcceptAllAccount));
        (ledger, accounts, SponsorMap::default())
    }

    proptest! {
        /// Every committed batch of n operations advances the namespace
        /// nonce by exactly n.
        #[test]
        fn prop_nonces_advance_strictly(n in 1usize..6) {
            let (mut ledger, mut accounts, mut sponsors) = wired();
            let mut executor = RecordingExecutor::new(10_000);

            let batch: Vec<_> = (0..n as u64)
                .map(|seq| operation(SENDER, seq, execute_payload(TARGET, 0, vec![])))
                .collect();
            let outcome = ledger
                .process_batch(&batch, BENEFICIARY, NOW, &mut BatchEnv {
                    accounts: &mut accounts,
                    sponsors: &mut sponsors,
                    executor: &mut executor,
                })
                .unwrap();

            prop_assert_eq!(outcome.receipts.len(), n);
            prop_assert_eq!(ledger.nonce_of(SENDER, DEFAULT_NS), n as u64);
        }

        /// A bad nonce at any index k rejects the batch and leaves every
        /// balance and nonce untouched, including those of the k valid
        /// operations before it.
        #[test]
        fn prop_validation_failure_is_atomic(n in 2usize..6, k_seed in 0usize..64) {
            let k = k_seed % n;
            let (mut ledger, mut accounts, mut sponsors) = wired();
            let mut executor = RecordingExecutor::new(10_000);

            let batch: Vec<_> = (0..n as u64)
                .map(|seq| {
                    let mut op = operation(SENDER, seq, execute_payload(TARGET, 0, vec![]));
                    if seq as usize == k {
                        // Inject a gap at index k.
                        op.nonce = compose_nonce(DEFAULT_NS, seq + 10);
                    }
                    op
                })
                .collect();

            let err = ledger
                .process_batch(&batch, BENEFICIARY, NOW, &mut BatchEnv {
                    accounts: &mut accounts,
                    sponsors: &mut sponsors,
                    executor: &mut executor,
                })
                .unwrap_err();

            prop_assert_eq!(err.index, k);
            let nonce_rejection = matches!(err.reason, BatchRejection::InvalidNonce { .. });
            prop_assert!(nonce_rejection, "unexpected rejection: {:?}", err.reason);
            prop_assert_eq!(ledger.balance_of(SENDER), U256::from(100_000_000u64));
            prop_assert_eq!(ledger.balance_of(BENEFICIARY), U256::zero());
            prop_assert_eq!(ledger.nonce_of(SENDER, DEFAULT_NS), 0);
        }
    }
}
