//! Observability events emitted by the subsidy ledger.

pub mod payloads;

use payloads::{
    GasSubsidizedPayload, ReservationRolledBackPayload, SubscriptionGrantedPayload,
    SubscriptionRevokedPayload, WindowResetPayload,
};
use serde::{Deserialize, Serialize};

/// All events the subsidy ledger can emit, in emission order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SponsorEvent {
    /// An account was subscribed to a tier.
    SubscriptionGranted(SubscriptionGrantedPayload),
    /// An account's subscription was removed.
    SubscriptionRevoked(SubscriptionRevokedPayload),
    /// A rolling window lapsed and was restarted.
    WindowReset(WindowResetPayload),
    /// An operation's cost was subsidized after successful settlement.
    GasSubsidized(GasSubsidizedPayload),
    /// An optimistic reservation was refunded after a revert.
    ReservationRolledBack(ReservationRolledBackPayload),
}
