//! # Sponsorship Subsystem (AA-04)
//!
//! A sponsor pre-pays operation costs for subscribed accounts under tiered,
//! rate-limited policies. The subsidy ledger exposes the two hooks the
//! entry ledger drives:
//!
//! - `reserve` (pre-call): checks tier, expiry, the global per-operation
//!   cap, and the rolling 30-day gas window, then *optimistically* commits
//!   the estimate to the window and returns a rollback token.
//! - `settle` (post-call): rolls the reservation back in full when the
//!   dispatch reverted, otherwise accounts the subsidy at the
//!   time-of-reservation percentage.
//!
//! ## Accounting Model
//!
//! The estimate is charged to the window before execution and refunded
//! only on a confirmed revert. On success the estimate stands as the
//! charged amount; settlement never re-measures.

pub mod domain;
pub mod events;

// Re-export public API
pub use domain::entities::{ReservationToken, Subscription, Tier, TierPolicy, TierTable};
pub use domain::errors::SponsorError;
pub use domain::subsidy::SubsidyLedger;
pub use events::payloads::{
    GasSubsidizedPayload, ReservationRolledBackPayload, SubscriptionGrantedPayload,
    SubscriptionRevokedPayload, WindowResetPayload,
};
pub use events::SponsorEvent;
