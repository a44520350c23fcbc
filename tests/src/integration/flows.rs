//! # Integration Test Flows
//!
//! Full-stack wiring: a real [`OperationLedger`] driving real [`Account`]
//! and [`SubsidyLedger`] instances through the hook traits, with a
//! recording executor standing in for the outside world.

#[cfg(test)]
mod tests {
    use aa_01_entry_ledger::{BatchEnv, BatchRejection, LedgerEvent, OperationLedger};
    use aa_02_account::AccountEvent;
    use aa_03_session_keys::{KeyMaterial, SessionKeyDescriptor};
    use aa_04_sponsorship::{SubsidyLedger, Tier};
    use shared_crypto::Secp256k1KeyPair;
    use shared_types::{selectors, Selector, U256};

    use crate::harness::*;

    const SENDER_A: [u8; 20] = [0x01; 20];
    const SENDER_B: [u8; 20] = [0x02; 20];
    const TARGET: [u8; 20] = [0x77; 20];
    const SPONSOR_ADDR: [u8; 20] = [0x50; 20];
    const SPONSOR_OWNER: [u8; 20] = [0x51; 20];

    fn process(
        ledger: &mut OperationLedger,
        batch: &[shared_types::Operation],
        accounts: &mut AccountMap,
        sponsors: &mut SponsorMap,
        executor: &mut RecordingExecutor,
    ) -> Result<aa_01_entry_ledger::BatchOutcome, aa_01_entry_ledger::BatchError> {
        init_tracing();
        ledger.process_batch(
            batch,
            BENEFICIARY,
            NOW,
            &mut BatchEnv {
                accounts,
                sponsors,
                executor,
            },
        )
    }

    // =========================================================================
    // SELF-FUNDED FLOW
    // =========================================================================

    #[test]
    fn test_deposit_execute_settle_flow() {
        let wallet = Wallet::new(SENDER_A);
        let mut accounts = AccountMap::default();
        accounts.insert(wallet.account());
        let mut sponsors = SponsorMap::default();
        let mut executor = RecordingExecutor::new(30_000);

        let mut ledger = OperationLedger::new();
        ledger.deposit(SENDER_A, U256::from(1_000_000u64)).unwrap();

        let mut op = operation(SENDER_A, 0, execute_payload(TARGET, 42, vec![]));
        wallet.sign(&mut op);

        let outcome = process(&mut ledger, &[op], &mut accounts, &mut sponsors, &mut executor)
            .unwrap();

        // Receipt: 21k pre-verification + 30k call gas at fee 2.
        let receipt = &outcome.receipts[0];
        assert!(receipt.success);
        assert_eq!(receipt.gas_used, 51_000);
        assert_eq!(receipt.actual_cost, U256::from(102_000u64));

        // The executor saw exactly one call, from the account.
        assert_eq!(executor.calls.len(), 1);
        let (caller, target, value, _) = &executor.calls[0];
        assert_eq!(*caller, SENDER_A);
        assert_eq!(*target, TARGET);
        assert_eq!(*value, U256::from(42u64));

        // Money conservation: sender cost == beneficiary credit.
        assert_eq!(ledger.balance_of(SENDER_A), U256::from(898_000u64));
        assert_eq!(ledger.balance_of(BENEFICIARY), U256::from(102_000u64));
        assert_eq!(ledger.nonce_of(SENDER_A, DEFAULT_NS), 1);

        // Events surfaced at every layer.
        let ledger_events = ledger.drain_events();
        assert!(ledger_events
            .iter()
            .any(|e| matches!(e, LedgerEvent::OperationProcessed(_))));
        assert!(ledger_events
            .iter()
            .any(|e| matches!(e, LedgerEvent::BatchSettled(_))));
        let account_events = accounts.get_mut(SENDER_A).take_events();
        assert!(account_events
            .iter()
            .any(|e| matches!(e, AccountEvent::OperationValidated(_))));
    }

    // =========================================================================
    // SPONSORED FLOW (Basic tier window semantics)
    // =========================================================================

    /// Build an operation whose estimated gas units total `estimated`.
    fn op_with_estimate(sequence: u64, estimated: u128) -> shared_types::Operation {
        let mut op = operation(SENDER_A, sequence, execute_payload(TARGET, 0, vec![]));
        op.verification_gas_limit = 50_000;
        op.pre_verification_gas = U256::from(21_000u64);
        op.call_gas_limit = estimated - 50_000 - 21_000;
        op.sponsor_payload = SPONSOR_ADDR.to_vec();
        op
    }

    #[test]
    fn test_sponsored_flow_exhausts_basic_window() {
        let wallet = Wallet::new(SENDER_A);
        let mut accounts = AccountMap::default();
        accounts.insert(wallet.account());

        let mut subsidy = SubsidyLedger::new(SPONSOR_OWNER, Box::new(OpenFactory));
        subsidy
            .grant_subscription(SPONSOR_OWNER, SENDER_A, Tier::Basic, 365 * 24 * 3_600, NOW)
            .unwrap();
        let mut sponsors = SponsorMap::default();
        sponsors.sponsors.insert(SPONSOR_ADDR, subsidy);

        let mut executor = RecordingExecutor::new(30_000);
        let mut ledger = OperationLedger::new();
        ledger
            .deposit(SPONSOR_ADDR, U256::from(10_000_000u64))
            .unwrap();

        // First operation: estimated 400,000 of the 500,000 window.
        let mut op = op_with_estimate(0, 400_000);
        wallet.sign(&mut op);
        let outcome = process(&mut ledger, &[op], &mut accounts, &mut sponsors, &mut executor)
            .unwrap();

        let receipt = &outcome.receipts[0];
        assert!(receipt.success);
        assert_eq!(receipt.sponsored, Some(SPONSOR_ADDR));
        // The penniless sender paid nothing; the sponsor covered the cost.
        assert_eq!(ledger.balance_of(SENDER_A), U256::zero());
        assert_eq!(
            ledger.balance_of(SPONSOR_ADDR),
            U256::from(10_000_000u64) - receipt.actual_cost
        );
        let subsidy = sponsors.sponsors.get_mut(&SPONSOR_ADDR).unwrap();
        assert_eq!(subsidy.usage_of(SENDER_A, NOW), Some(400_000));

        // Second operation: 200,000 more would exceed the window.
        let mut op = op_with_estimate(1, 200_000);
        wallet.sign(&mut op);
        let err = process(&mut ledger, &[op], &mut accounts, &mut sponsors, &mut executor)
            .unwrap_err();
        assert!(matches!(err.reason, BatchRejection::SponsorRejected(_)));

        // The rejected batch's staged sponsor debit was discarded, and the
        // window still shows only the first reservation.
        let sponsor_balance = ledger.balance_of(SPONSOR_ADDR);
        assert_eq!(
            sponsor_balance,
            U256::from(10_000_000u64) - U256::from(102_000u64)
        );
        let subsidy = sponsors.sponsors.get_mut(&SPONSOR_ADDR).unwrap();
        assert_eq!(subsidy.usage_of(SENDER_A, NOW), Some(400_000));
    }

    // =========================================================================
    // SESSION-KEY FLOW (value budgets)
    // =========================================================================

    #[test]
    fn test_session_key_value_budget_flow() {
        let wallet = Wallet::new(SENDER_A);
        let session = Secp256k1KeyPair::generate();

        let mut account = wallet.account();
        let allowed_selector = Selector([0x12, 0x34, 0x56, 0x78]);
        account
            .grant_session_key(
                wallet.keys.address(),
                SessionKeyDescriptor {
                    material: KeyMaterial::Secp256k1 {
                        address: session.address(),
                    },
                    valid_after: NOW - 60,
                    valid_until: NOW + 3_600,
                    allowed_targets: vec![TARGET],
                    allowed_selectors: vec![allowed_selector],
                    max_value_per_call: U256::from(1_000u64),
                    max_value_total: U256::from(1_000u64),
                    max_calls: 10,
                },
                NOW,
            )
            .unwrap();

        let mut accounts = AccountMap::default();
        accounts.insert(account);
        let mut sponsors = SponsorMap::default();
        let mut executor = RecordingExecutor::new(30_000);
        let mut ledger = OperationLedger::new();
        ledger.deposit(SENDER_A, U256::from(10_000_000u64)).unwrap();

        let session_op = |sequence: u64, value: u64| {
            let data = allowed_selector.0.to_vec();
            let mut op = operation(SENDER_A, sequence, execute_payload(TARGET, value, data));
            let hash = op.hash();
            op.authorization = session_secp_authorization(&session, &hash);
            op
        };

        // First call: 500 of the 1,000 total budget.
        let outcome = process(
            &mut ledger,
            &[session_op(0, 500)],
            &mut accounts,
            &mut sponsors,
            &mut executor,
        )
        .unwrap();
        assert!(outcome.receipts[0].success);

        // Second call: 600 fits per-call but breaks the cumulative budget.
        let err = process(
            &mut ledger,
            &[session_op(1, 600)],
            &mut accounts,
            &mut sponsors,
            &mut executor,
        )
        .unwrap_err();
        assert!(matches!(err.reason, BatchRejection::AccountRejected(_)));

        // Only the accepted call advanced the nonce.
        assert_eq!(ledger.nonce_of(SENDER_A, DEFAULT_NS), 1);
    }

    #[test]
    fn test_sensitive_selector_blocked_for_session_keys() {
        let wallet = Wallet::new(SENDER_A);
        let session = Secp256k1KeyPair::generate();

        let mut account = wallet.account();
        account
            .grant_session_key(
                wallet.keys.address(),
                SessionKeyDescriptor {
                    material: KeyMaterial::Secp256k1 {
                        address: session.address(),
                    },
                    valid_after: NOW - 60,
                    valid_until: NOW + 3_600,
                    allowed_targets: vec![TARGET],
                    allowed_selectors: vec![],
                    max_value_per_call: U256::MAX,
                    max_value_total: U256::MAX,
                    max_calls: 10,
                },
                NOW,
            )
            .unwrap();

        let mut accounts = AccountMap::default();
        accounts.insert(account);
        let mut sponsors = SponsorMap::default();
        let mut executor = RecordingExecutor::new(30_000);
        let mut ledger = OperationLedger::new();
        ledger.deposit(SENDER_A, U256::from(1_000_000u64)).unwrap();

        // An ownership-transfer payload is blocked for session keys no
        // matter what the credential's allow-lists say.
        let mut payload = selectors::transfer_ownership().0.to_vec();
        payload.extend_from_slice(&[0xAB; 20]);
        let mut op = operation(SENDER_A, 0, payload);
        let hash = op.hash();
        op.authorization = session_secp_authorization(&session, &hash);

        let err = process(&mut ledger, &[op], &mut accounts, &mut sponsors, &mut executor)
            .unwrap_err();
        assert!(matches!(err.reason, BatchRejection::AccountRejected(_)));
    }

    // =========================================================================
    // BATCH SEMANTICS
    // =========================================================================

    #[test]
    fn test_nonce_reuse_rejects_whole_batch() {
        let wallet = Wallet::new(SENDER_A);
        let mut accounts = AccountMap::default();
        accounts.insert(wallet.account());
        let mut sponsors = SponsorMap::default();
        let mut executor = RecordingExecutor::new(30_000);
        let mut ledger = OperationLedger::new();
        ledger.deposit(SENDER_A, U256::from(1_000_000u64)).unwrap();

        let mut op1 = operation(SENDER_A, 0, execute_payload(TARGET, 1, vec![]));
        wallet.sign(&mut op1);
        // Second operation reuses the pre-increment nonce.
        let mut op2 = operation(SENDER_A, 0, execute_payload(TARGET, 2, vec![]));
        wallet.sign(&mut op2);

        let err = process(
            &mut ledger,
            &[op1, op2],
            &mut accounts,
            &mut sponsors,
            &mut executor,
        )
        .unwrap_err();
        assert_eq!(err.index, 1);
        assert_eq!(err.reason, BatchRejection::InvalidNonce { expected: 1, got: 0 });

        // Nothing from the valid first operation was applied.
        assert_eq!(ledger.balance_of(SENDER_A), U256::from(1_000_000u64));
        assert_eq!(ledger.nonce_of(SENDER_A, DEFAULT_NS), 0);
        assert!(executor.calls.is_empty());
    }

    #[test]
    fn test_revert_isolated_within_batch() {
        let wallet_a = Wallet::new(SENDER_A);
        let wallet_b = Wallet::new(SENDER_B);
        let mut accounts = AccountMap::default();
        accounts.insert(wallet_a.account());
        accounts.insert(wallet_b.account());
        let mut sponsors = SponsorMap::default();

        let failing_target = [0xF0; 20];
        let mut executor = RecordingExecutor::new(30_000).failing_for(failing_target);

        let mut ledger = OperationLedger::new();
        ledger.deposit(SENDER_A, U256::from(1_000_000u64)).unwrap();
        ledger.deposit(SENDER_B, U256::from(1_000_000u64)).unwrap();

        let mut op_a = operation(SENDER_A, 0, execute_payload(failing_target, 1, vec![]));
        wallet_a.sign(&mut op_a);
        let mut op_b = operation(SENDER_B, 0, execute_payload(TARGET, 2, vec![]));
        wallet_b.sign(&mut op_b);

        let outcome = process(
            &mut ledger,
            &[op_a, op_b],
            &mut accounts,
            &mut sponsors,
            &mut executor,
        )
        .unwrap();

        // A failed: charged pre-verification only (the call reported no gas),
        // with the rest of the prefund refunded.
        let failed = &outcome.receipts[0];
        assert!(!failed.success);
        assert_eq!(failed.gas_used, 21_000);
        assert_eq!(failed.revert_reason.as_deref(), Some("target reverted"));
        assert_eq!(ledger.balance_of(SENDER_A), U256::from(1_000_000 - 42_000u64));

        // B settled normally in the same batch.
        assert!(outcome.receipts[1].success);
        assert_eq!(ledger.balance_of(SENDER_B), U256::from(1_000_000 - 102_000u64));
        assert_eq!(
            ledger.balance_of(BENEFICIARY),
            U256::from(42_000 + 102_000u64)
        );
    }
}
