//! # Sponsorship Properties
//!
//! The optimistic window accounting must be exact: a rollback restores the
//! pre-reservation usage byte-for-byte, and the rolling window never
//! resets a second early.

#[cfg(test)]
mod tests {
    use aa_04_sponsorship::{SubsidyLedger, Tier};
    use proptest::prelude::*;
    use shared_types::hooks::SponsorHook;
    use shared_types::{ExecutionOutcome, THIRTY_DAYS_SECS, U256};

    use crate::harness::{OpenFactory, NOW};

    const OWNER: [u8; 20] = [0x51; 20];
    const ACCOUNT: [u8; 20] = [0x01; 20];
    const TWO_YEARS: u64 = 2 * 365 * 24 * 3_600;

    fn subscribed(tier: Tier) -> SubsidyLedger {
        let mut ledger = SubsidyLedger::new(OWNER, Box::new(OpenFactory));
        ledger
            .grant_subscription(OWNER, ACCOUNT, tier, TWO_YEARS, NOW)
            .expect("subscription");
        ledger
    }

    proptest! {
        /// Reverting the second of two reservations restores usage to
        /// exactly the first reservation's amount.
        #[test]
        fn prop_rollback_restores_exact_usage(
            first in 1u64..200_000,
            second in 1u64..200_000,
        ) {
            let mut ledger = subscribed(Tier::Basic);
            ledger
                .reserve(ACCOUNT, first, U256::from(1u64), U256::MAX, NOW)
                .unwrap();
            let token = ledger
                .reserve(ACCOUNT, second, U256::from(1u64), U256::MAX, NOW)
                .unwrap();
            prop_assert_eq!(ledger.usage_of(ACCOUNT, NOW), Some(first + second));

            ledger
                .settle(&token, ExecutionOutcome::Reverted, U256::from(1u64), NOW)
                .unwrap();
            prop_assert_eq!(ledger.usage_of(ACCOUNT, NOW), Some(first));
        }

        /// Usage persists for any offset strictly inside the 30-day window
        /// and resets exactly at the boundary.
        #[test]
        fn prop_window_never_resets_early(
            used in 1u64..500_000,
            offset in 0u64..THIRTY_DAYS_SECS,
        ) {
            let mut ledger = subscribed(Tier::Basic);
            ledger
                .reserve(ACCOUNT, used, U256::from(1u64), U256::MAX, NOW)
                .unwrap();

            prop_assert_eq!(ledger.usage_of(ACCOUNT, NOW + offset), Some(used));
            prop_assert_eq!(ledger.usage_of(ACCOUNT, NOW + THIRTY_DAYS_SECS), Some(0));
        }

        /// A successful settlement never adjusts the window a second time:
        /// the optimistic estimate stands whatever the actual cost was.
        #[test]
        fn prop_success_keeps_the_estimate(
            estimated in 1u64..500_000,
            actual_cost in 0u64..1_000_000,
        ) {
            let mut ledger = subscribed(Tier::Basic);
            let token = ledger
                .reserve(ACCOUNT, estimated, U256::from(1u64), U256::MAX, NOW)
                .unwrap();
            ledger
                .settle(
                    &token,
                    ExecutionOutcome::Succeeded,
                    U256::from(actual_cost),
                    NOW,
                )
                .unwrap();
            prop_assert_eq!(ledger.usage_of(ACCOUNT, NOW), Some(estimated));
        }
    }
}
