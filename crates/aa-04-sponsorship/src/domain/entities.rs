//! # Sponsorship Entities
//!
//! Subscriptions are keyed by account and carry a rolling 30-day gas
//! window; the tier table maps each tier to its subsidy percentage and
//! window limit and is owner-configurable at runtime.

use serde::{Deserialize, Serialize};
use shared_types::{Address, Gas, Timestamp};

/// Subscription tier. An account without a subscription entry has no tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    /// 50 % subsidy, 500k gas per window (default policy).
    Basic,
    /// 90 % subsidy, 2M gas per window (default policy).
    Premium,
    /// 100 % subsidy, 10M gas per window (default policy).
    Ultimate,
}

/// Per-tier policy: subsidy percentage and monthly gas window limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierPolicy {
    /// Percentage of the actual cost the sponsor covers (0–100).
    pub subsidy_percent: u8,
    /// Gas budget per rolling 30-day window.
    pub window_gas_limit: Gas,
}

/// The owner-configurable tier table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierTable {
    /// Policy for [`Tier::Basic`].
    pub basic: TierPolicy,
    /// Policy for [`Tier::Premium`].
    pub premium: TierPolicy,
    /// Policy for [`Tier::Ultimate`].
    pub ultimate: TierPolicy,
}

impl Default for TierTable {
    fn default() -> Self {
        Self {
            basic: TierPolicy {
                subsidy_percent: 50,
                window_gas_limit: 500_000,
            },
            premium: TierPolicy {
                subsidy_percent: 90,
                window_gas_limit: 2_000_000,
            },
            ultimate: TierPolicy {
                subsidy_percent: 100,
                window_gas_limit: 10_000_000,
            },
        }
    }
}

impl TierTable {
    /// The policy for `tier`.
    pub fn policy(&self, tier: Tier) -> TierPolicy {
        match tier {
            Tier::Basic => self.basic,
            Tier::Premium => self.premium,
            Tier::Ultimate => self.ultimate,
        }
    }

    /// Replace the policy for `tier`.
    pub fn set_policy(&mut self, tier: Tier, policy: TierPolicy) {
        match tier {
            Tier::Basic => self.basic = policy,
            Tier::Premium => self.premium = policy,
            Tier::Ultimate => self.ultimate = policy,
        }
    }
}

/// One account's subscription record.
///
/// Invariant: `used_this_window ≤ window_gas_limit` after every successful
/// reservation. The window resets lazily on the next touch once
/// `now ≥ window_start + 30 days`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Subscribed tier.
    pub tier: Tier,
    /// Subscription end (exclusive: valid while `now < expires_at`).
    pub expires_at: Timestamp,
    /// Start of the current rolling window.
    pub window_start: Timestamp,
    /// Gas reserved in the current window.
    pub used_this_window: Gas,
    /// Window limit snapshotted from the tier policy at grant time.
    pub window_gas_limit: Gas,
}

/// The rollback token returned by `reserve` and consumed by `settle`.
///
/// Carries the time-of-reservation tier data so settlement never re-reads
/// a tier table that may have been reconfigured mid-flight.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationToken {
    /// The subsidized account.
    pub account: Address,
    /// Tier at reservation time.
    pub tier: Tier,
    /// Subsidy percentage at reservation time.
    pub subsidy_percent: u8,
    /// Window usage before this reservation (rollback target).
    pub usage_before: Gas,
    /// The optimistically-reserved estimate.
    pub estimated_gas: Gas,
}
