//! # Ledger Errors
//!
//! Two families: [`LedgerError`] for the deposit/stake surface, and
//! [`BatchError`] for `process_batch`, which pins the failure to the
//! operation index that caused it.

use shared_types::{Address, HookRejection, Timestamp, U256};
use thiserror::Error;

/// Errors raised by the deposit and stake operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// The caller's spendable balance cannot cover the request.
    #[error("insufficient balance: have {available}, need {needed}")]
    InsufficientBalance {
        /// Spendable balance.
        available: U256,
        /// Requested amount.
        needed: U256,
    },

    /// A credit would overflow the target balance.
    #[error("balance overflow crediting 0x{}", hex::encode(.0))]
    BalanceOverflow(Address),

    /// The unstake delay may only grow.
    #[error("unstake delay may not shrink from {current} to {requested}")]
    DelayShrunk {
        /// Currently recorded delay.
        current: u64,
        /// Requested (smaller) delay.
        requested: u64,
    },

    /// `unlock_stake` without a locked stake.
    #[error("no locked stake to unlock")]
    NotStaked,

    /// `withdraw_stake` with nothing staked.
    #[error("no stake to withdraw")]
    NoStake,

    /// `withdraw_stake` while the stake is still locked.
    #[error("stake must be unlocked before withdrawal")]
    StakeNotUnlocked,

    /// `withdraw_stake` before the unstake delay elapsed.
    #[error("stake withdrawable at {withdraw_time}, now {now}")]
    WithdrawTooEarly {
        /// Earliest withdrawal time.
        withdraw_time: Timestamp,
        /// Caller-supplied current time.
        now: Timestamp,
    },
}

/// Why a batch was rejected. Validation-pass failures are batch-fatal:
/// no state from any operation is committed. The one exception is
/// [`BatchRejection::PayoutOverflow`], which surfaces after the execution
/// pass has already committed per-operation state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BatchRejection {
    /// A batch is already being processed.
    #[error("re-entrant batch processing")]
    Reentrant,

    /// No account is registered under the sender address.
    #[error("unknown sender account 0x{}", hex::encode(.0))]
    UnknownAccount(Address),

    /// The sponsor payload is too short to carry an address.
    #[error("sponsor payload of {0} bytes cannot carry a 20-byte address")]
    MalformedSponsorPayload(usize),

    /// No sponsor is registered under the payload's address.
    #[error("unknown sponsor 0x{}", hex::encode(.0))]
    UnknownSponsor(Address),

    /// The operation's gas/fee product overflowed.
    #[error("prefund computation overflowed")]
    PrefundOverflow,

    /// The payer's deposit cannot cover the prefund.
    #[error("payer 0x{} holds {available}, prefund needs {needed}", hex::encode(.payer))]
    InsufficientPrefund {
        /// Who would have paid.
        payer: Address,
        /// Spendable balance at validation time.
        available: U256,
        /// Required prefund.
        needed: U256,
    },

    /// The operation's sequence number does not match the expected one.
    #[error("invalid nonce: expected sequence {expected}, got {got}")]
    InvalidNonce {
        /// Next sequence for the operation's namespace.
        expected: u64,
        /// Sequence the operation carried.
        got: u64,
    },

    /// The sender's account hook refused the operation.
    #[error("account rejected operation: {0}")]
    AccountRejected(HookRejection),

    /// The sponsor's reserve hook refused the operation.
    #[error("sponsor rejected operation: {0}")]
    SponsorRejected(HookRejection),

    /// `now` falls outside the authorization's validity window.
    #[error("operation valid in [{valid_after}, {valid_until}], now {now}")]
    WindowNotActive {
        /// Window start (inclusive).
        valid_after: Timestamp,
        /// Window end (inclusive).
        valid_until: Timestamp,
        /// Batch processing time.
        now: Timestamp,
    },

    /// Crediting the beneficiary would overflow its balance.
    ///
    /// Raised after the execution pass: nonces, debits, and refunds for
    /// the batch's operations stay committed, only the payout fails.
    #[error("beneficiary payout overflowed")]
    PayoutOverflow,
}

/// A rejected batch: the offending operation index plus the reason.
///
/// Batch-level failures not attributable to one operation (re-entrancy,
/// beneficiary payout overflow) report `index == batch.len()`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("batch rejected at operation {index}: {reason}")]
pub struct BatchError {
    /// Index of the offending operation.
    pub index: usize,
    /// Why it was rejected.
    pub reason: BatchRejection,
}

impl BatchError {
    /// Pin `reason` to the operation at `index`.
    pub fn at(index: usize, reason: BatchRejection) -> Self {
        Self { index, reason }
    }
}
