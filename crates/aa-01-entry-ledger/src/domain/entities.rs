//! # Ledger Entities
//!
//! Per-address deposit records and the receipts a processed batch yields.

use serde::{Deserialize, Serialize};
use shared_types::{Address, Gas, Hash, Timestamp, U256};

/// One address's funds held by the ledger: a spendable deposit plus an
/// optional time-locked stake.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositRecord {
    /// Spendable balance, debited for prefunds.
    pub balance: U256,
    /// Whether the stake is currently locked.
    pub staked: bool,
    /// Staked amount; untouched by prefunds.
    pub stake: U256,
    /// Delay between unlock and withdrawal.
    pub unstake_delay_secs: u64,
    /// Earliest withdrawal time once unlocked; 0 while locked.
    pub withdraw_time: Timestamp,
}

/// Per-operation result of the execution pass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationReceipt {
    /// Hash of the processed operation.
    pub op_hash: Hash,
    /// The operation's sender account.
    pub sender: Address,
    /// Whether the dispatch succeeded.
    pub success: bool,
    /// Gas consumed: pre-verification plus reported call gas.
    pub gas_used: Gas,
    /// Amount charged to the payer, clamped to the prefund.
    pub actual_cost: U256,
    /// The sponsor that paid, when the operation was sponsored.
    pub sponsored: Option<Address>,
    /// Revert reason for failed dispatches.
    pub revert_reason: Option<String>,
}

/// Result of a fully processed batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// One receipt per operation, in batch order.
    pub receipts: Vec<OperationReceipt>,
    /// Sum of all `actual_cost`s, credited to the beneficiary.
    pub total_cost: U256,
    /// The address credited with the batch's fees.
    pub beneficiary: Address,
}
