//! # Subsidy Ledger
//!
//! Per-account subscription accounting with optimistic reservation.
//!
//! `reserve` commits the gas estimate to the rolling window *before*
//! execution and hands back a token carrying the pre-reservation usage;
//! `settle` either rolls the window back to that value (confirmed revert)
//! or accounts the subsidy at the time-of-reservation percentage. The
//! estimate is never re-measured on success, so accounting stays O(1).

use std::collections::HashMap;

use shared_types::{
    Address, ExecutionOutcome, Gas, HookRejection, SponsorHook, Timestamp, AccountFactory,
    THIRTY_DAYS_SECS, U256,
};
use tracing::{debug, info};

use super::entities::{ReservationToken, Subscription, Tier, TierTable};
use super::errors::SponsorError;
use crate::events::payloads::{
    GasSubsidizedPayload, ReservationRolledBackPayload, SubscriptionGrantedPayload,
    SubscriptionRevokedPayload, WindowResetPayload,
};
use crate::events::SponsorEvent;

/// Default global per-operation gas cap.
pub const DEFAULT_MAX_GAS_PER_OPERATION: Gas = 1_000_000;

/// The sponsor's subscription ledger.
pub struct SubsidyLedger {
    owner: Address,
    tiers: TierTable,
    max_gas_per_operation: Gas,
    subscriptions: HashMap<Address, Subscription>,
    factory: Box<dyn AccountFactory>,
    events: Vec<SponsorEvent>,
}

impl SubsidyLedger {
    /// Create a subsidy ledger administered by `owner`, vetting account
    /// provenance through `factory`.
    pub fn new(owner: Address, factory: Box<dyn AccountFactory>) -> Self {
        Self {
            owner,
            tiers: TierTable::default(),
            max_gas_per_operation: DEFAULT_MAX_GAS_PER_OPERATION,
            subscriptions: HashMap::new(),
            factory,
            events: Vec::new(),
        }
    }

    // =========================================================================
    // ADMINISTRATION (owner-only)
    // =========================================================================

    /// Subscribe `account` to `tier` for `duration_secs`, starting a fresh
    /// window. Refuses accounts the factory did not mint.
    pub fn grant_subscription(
        &mut self,
        caller: Address,
        account: Address,
        tier: Tier,
        duration_secs: u64,
        now: Timestamp,
    ) -> Result<(), SponsorError> {
        self.require_owner(caller)?;
        if !self.factory.is_legitimate_account(account) {
            return Err(SponsorError::UnknownAccountProvenance(account));
        }

        let subscription = Subscription {
            tier,
            expires_at: now.saturating_add(duration_secs),
            window_start: now,
            used_this_window: 0,
            window_gas_limit: self.tiers.policy(tier).window_gas_limit,
        };
        info!(
            account = %hex::encode(account),
            ?tier,
            expires_at = subscription.expires_at,
            "subscription granted"
        );
        self.events
            .push(SponsorEvent::SubscriptionGranted(SubscriptionGrantedPayload {
                account,
                tier,
                expires_at: subscription.expires_at,
            }));
        self.subscriptions.insert(account, subscription);
        Ok(())
    }

    /// Remove `account`'s subscription.
    pub fn revoke_subscription(
        &mut self,
        caller: Address,
        account: Address,
    ) -> Result<(), SponsorError> {
        self.require_owner(caller)?;
        self.subscriptions
            .remove(&account)
            .ok_or(SponsorError::NoSubscription(account))?;

        info!(account = %hex::encode(account), "subscription revoked");
        self.events
            .push(SponsorEvent::SubscriptionRevoked(SubscriptionRevokedPayload {
                account,
            }));
        Ok(())
    }

    /// Replace the policy for one tier. Affects future reservations only;
    /// in-flight reservations settle at their token's percentage, and
    /// existing subscriptions keep their snapshotted window limit.
    pub fn set_tier_policy(
        &mut self,
        caller: Address,
        tier: Tier,
        policy: super::entities::TierPolicy,
    ) -> Result<(), SponsorError> {
        self.require_owner(caller)?;
        self.tiers.set_policy(tier, policy);
        Ok(())
    }

    /// Replace the global per-operation gas cap.
    pub fn set_max_gas_per_operation(
        &mut self,
        caller: Address,
        cap: Gas,
    ) -> Result<(), SponsorError> {
        self.require_owner(caller)?;
        self.max_gas_per_operation = cap;
        Ok(())
    }

    // =========================================================================
    // INTROSPECTION
    // =========================================================================

    /// The stored subscription for `account`, if any.
    pub fn subscription_of(&self, account: Address) -> Option<&Subscription> {
        self.subscriptions.get(&account)
    }

    /// Window usage for `account` at `now`, applying the lazy reset first.
    pub fn usage_of(&mut self, account: Address, now: Timestamp) -> Option<Gas> {
        let reset = Self::maybe_reset_window(account, self.subscriptions.get_mut(&account)?, now);
        if let Some(payload) = reset {
            self.events.push(SponsorEvent::WindowReset(payload));
        }
        self.subscriptions.get(&account).map(|s| s.used_this_window)
    }

    /// Drain accumulated observability events in emission order.
    pub fn take_events(&mut self) -> Vec<SponsorEvent> {
        std::mem::take(&mut self.events)
    }

    // =========================================================================
    // RESERVATION / SETTLEMENT CORE
    // =========================================================================

    fn try_reserve(
        &mut self,
        account: Address,
        estimated_gas: Gas,
        max_cost: U256,
        sponsor_balance: U256,
        now: Timestamp,
    ) -> Result<Vec<u8>, SponsorError> {
        let cap = self.max_gas_per_operation;
        let tiers = self.tiers;

        let subscription = self
            .subscriptions
            .get_mut(&account)
            .ok_or(SponsorError::NoSubscription(account))?;
        if now >= subscription.expires_at {
            return Err(SponsorError::SubscriptionExpired(subscription.expires_at));
        }
        if estimated_gas > cap {
            return Err(SponsorError::ExceedsOperationCap {
                estimated: estimated_gas,
                cap,
            });
        }

        let reset = Self::maybe_reset_window(account, subscription, now);

        let projected = subscription
            .used_this_window
            .checked_add(estimated_gas)
            .filter(|projected| *projected <= subscription.window_gas_limit)
            .ok_or(SponsorError::WindowExceeded {
                used: subscription.used_this_window,
                estimated: estimated_gas,
                limit: subscription.window_gas_limit,
            })?;

        let subsidy_percent = tiers.policy(subscription.tier).subsidy_percent;
        let required = max_cost
            .checked_mul(U256::from(subsidy_percent))
            .ok_or(SponsorError::SubsidyOverflow)?
            / U256::from(100u8);
        if sponsor_balance < required {
            return Err(SponsorError::InsufficientSponsorBalance);
        }

        // All checks passed: reserve optimistically, before execution.
        let token = ReservationToken {
            account,
            tier: subscription.tier,
            subsidy_percent,
            usage_before: subscription.used_this_window,
            estimated_gas,
        };
        subscription.used_this_window = projected;

        if let Some(payload) = reset {
            self.events.push(SponsorEvent::WindowReset(payload));
        }
        debug!(
            account = %hex::encode(account),
            estimated_gas,
            used = projected,
            "gas reserved"
        );
        bincode::serialize(&token).map_err(|e| SponsorError::MalformedContext(e.to_string()))
    }

    fn try_settle(
        &mut self,
        context: &[u8],
        outcome: ExecutionOutcome,
        actual_cost: U256,
    ) -> Result<(), SponsorError> {
        let token: ReservationToken = bincode::deserialize(context)
            .map_err(|e| SponsorError::MalformedContext(e.to_string()))?;

        if outcome == ExecutionOutcome::Reverted {
            // Full refund of the optimistic reservation.
            let subscription = self
                .subscriptions
                .get_mut(&token.account)
                .ok_or(SponsorError::DanglingReservation(token.account))?;
            subscription.used_this_window = token.usage_before;

            debug!(
                account = %hex::encode(token.account),
                restored = token.usage_before,
                "reservation rolled back after revert"
            );
            self.events.push(SponsorEvent::ReservationRolledBack(
                ReservationRolledBackPayload {
                    account: token.account,
                    restored_usage: token.usage_before,
                },
            ));
            return Ok(());
        }

        // Success: the optimistic estimate stands as the charged amount.
        // The percentage comes from the token, not the current tier table.
        let subsidy = actual_cost
            .checked_mul(U256::from(token.subsidy_percent))
            .ok_or(SponsorError::SubsidyOverflow)?
            / U256::from(100u8);
        info!(
            account = %hex::encode(token.account),
            tier = ?token.tier,
            %subsidy,
            "gas subsidized"
        );
        self.events
            .push(SponsorEvent::GasSubsidized(GasSubsidizedPayload {
                account: token.account,
                tier: token.tier,
                subsidy,
            }));
        Ok(())
    }

    /// Reset the rolling window when 30 days have elapsed, lazily.
    fn maybe_reset_window(
        account: Address,
        subscription: &mut Subscription,
        now: Timestamp,
    ) -> Option<WindowResetPayload> {
        if now < subscription.window_start.saturating_add(THIRTY_DAYS_SECS) {
            return None;
        }
        subscription.window_start = now;
        subscription.used_this_window = 0;
        Some(WindowResetPayload {
            account,
            window_start: now,
        })
    }

    fn require_owner(&self, caller: Address) -> Result<(), SponsorError> {
        if caller != self.owner {
            return Err(SponsorError::NotOwner);
        }
        Ok(())
    }
}

impl SponsorHook for SubsidyLedger {
    fn reserve(
        &mut self,
        account: Address,
        estimated_gas: Gas,
        max_cost: U256,
        sponsor_balance: U256,
        now: Timestamp,
    ) -> Result<Vec<u8>, HookRejection> {
        self.try_reserve(account, estimated_gas, max_cost, sponsor_balance, now)
            .map_err(HookRejection::from)
    }

    fn settle(
        &mut self,
        context: &[u8],
        outcome: ExecutionOutcome,
        actual_cost: U256,
        _now: Timestamp,
    ) -> Result<(), HookRejection> {
        self.try_settle(context, outcome, actual_cost)
            .map_err(HookRejection::from)
    }
}
