//! Event payload definitions.

use serde::{Deserialize, Serialize};
use shared_types::{Address, Gas, Timestamp, U256};

use crate::domain::entities::Tier;

/// Payload for [`super::SponsorEvent::SubscriptionGranted`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionGrantedPayload {
    /// The subscribed account.
    pub account: Address,
    /// Granted tier.
    pub tier: Tier,
    /// Subscription end (exclusive).
    pub expires_at: Timestamp,
}

/// Payload for [`super::SponsorEvent::SubscriptionRevoked`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionRevokedPayload {
    /// The unsubscribed account.
    pub account: Address,
}

/// Payload for [`super::SponsorEvent::WindowReset`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowResetPayload {
    /// The account whose window restarted.
    pub account: Address,
    /// Start of the new window.
    pub window_start: Timestamp,
}

/// Payload for [`super::SponsorEvent::GasSubsidized`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasSubsidizedPayload {
    /// The subsidized account.
    pub account: Address,
    /// Tier at reservation time.
    pub tier: Tier,
    /// Amount the sponsor covered.
    pub subsidy: U256,
}

/// Payload for [`super::SponsorEvent::ReservationRolledBack`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationRolledBackPayload {
    /// The account whose reservation was refunded.
    pub account: Address,
    /// Window usage after the rollback.
    pub restored_usage: Gas,
}
