//! Event payload definitions.

use serde::{Deserialize, Serialize};
use shared_types::{Address, Gas, Hash, Timestamp, U256};

/// Payload for [`super::LedgerEvent::Deposited`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositedPayload {
    /// Credited account.
    pub account: Address,
    /// Amount credited.
    pub amount: U256,
    /// Balance after the credit.
    pub new_balance: U256,
}

/// Payload for [`super::LedgerEvent::Withdrawn`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawnPayload {
    /// Debited account.
    pub account: Address,
    /// Where the funds went.
    pub to: Address,
    /// Amount moved.
    pub amount: U256,
}

/// Payload for [`super::LedgerEvent::StakeLocked`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeLockedPayload {
    /// Staking account.
    pub account: Address,
    /// Total stake after the addition.
    pub stake: U256,
    /// Recorded unstake delay.
    pub unstake_delay_secs: u64,
}

/// Payload for [`super::LedgerEvent::StakeUnlocked`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeUnlockedPayload {
    /// Unlocking account.
    pub account: Address,
    /// Earliest time the stake becomes withdrawable.
    pub withdraw_time: Timestamp,
}

/// Payload for [`super::LedgerEvent::StakeWithdrawn`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeWithdrawnPayload {
    /// Account whose stake was withdrawn.
    pub account: Address,
    /// Where the stake went.
    pub to: Address,
    /// Withdrawn amount.
    pub amount: U256,
}

/// Payload for [`super::LedgerEvent::OperationProcessed`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationProcessedPayload {
    /// Hash of the processed operation.
    pub op_hash: Hash,
    /// The operation's sender.
    pub sender: Address,
    /// The sponsor that paid, if any.
    pub sponsor: Option<Address>,
    /// Whether the dispatch succeeded.
    pub success: bool,
    /// Amount charged to the payer.
    pub actual_cost: U256,
    /// Gas consumed.
    pub gas_used: Gas,
}

/// Payload for [`super::LedgerEvent::BatchSettled`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSettledPayload {
    /// Number of operations in the batch.
    pub operations: u32,
    /// Total fees credited to the beneficiary.
    pub total_cost: U256,
    /// The credited beneficiary.
    pub beneficiary: Address,
}
