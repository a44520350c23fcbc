//! # Sponsorship Errors

use shared_types::HookRejection;
use thiserror::Error;

/// Errors raised by the subsidy ledger.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SponsorError {
    /// The caller is not the sponsor owner.
    #[error("caller is not the sponsor owner")]
    NotOwner,

    /// The factory did not mint this account.
    #[error("account 0x{} was not minted by the factory", hex::encode(.0))]
    UnknownAccountProvenance([u8; 20]),

    /// The account has no subscription (tier None).
    #[error("account 0x{} has no subscription", hex::encode(.0))]
    NoSubscription([u8; 20]),

    /// The subscription lapsed before the reservation.
    #[error("subscription expired at {0}")]
    SubscriptionExpired(u64),

    /// The estimate exceeds the global per-operation gas cap.
    #[error("estimated gas {estimated} exceeds the per-operation cap {cap}")]
    ExceedsOperationCap {
        /// Caller-supplied gas estimate.
        estimated: u64,
        /// Configured global cap.
        cap: u64,
    },

    /// The reservation would exceed the tier's rolling window limit.
    #[error("window limit exceeded: {used} used + {estimated} requested > {limit}")]
    WindowExceeded {
        /// Gas already reserved this window.
        used: u64,
        /// Caller-supplied gas estimate.
        estimated: u64,
        /// Window limit.
        limit: u64,
    },

    /// The sponsor's ledger deposit cannot cover its subsidy share.
    #[error("sponsor balance below its subsidy share of the max cost")]
    InsufficientSponsorBalance,

    /// The subsidy share computation overflowed.
    #[error("subsidy share computation overflowed")]
    SubsidyOverflow,

    /// The settlement context failed to decode.
    #[error("malformed reservation context: {0}")]
    MalformedContext(String),

    /// Settlement references an account whose subscription vanished.
    #[error("no subscription to settle for 0x{}", hex::encode(.0))]
    DanglingReservation([u8; 20]),
}

impl From<SponsorError> for HookRejection {
    fn from(err: SponsorError) -> Self {
        match err {
            SponsorError::MalformedContext(_) => HookRejection::Unsupported(err.to_string()),
            SponsorError::NotOwner => HookRejection::Unauthorized(err.to_string()),
            _ => HookRejection::Policy(err.to_string()),
        }
    }
}
