//! # Hook Traits
//!
//! The narrow seams between the entry ledger and its collaborators. The
//! ledger drives accounts and sponsors exclusively through these traits,
//! in a fixed order, synchronously: every hook call completes before the
//! pipeline advances.

use crate::entities::{
    Address, CallOutcome, ExecutionOutcome, ExecutionReceipt, Gas, Hash, Operation, Timestamp,
    ValidityWindow, U256,
};
use crate::errors::HookRejection;

/// Executes inner calls against the outside world on behalf of an account.
///
/// The pipeline forbids re-entrancy: an executor must never call back into
/// the entry ledger.
pub trait CallExecutor {
    /// Dispatch one call. A revert is an `Err`; the message is surfaced in
    /// the operation's receipt.
    fn call(
        &mut self,
        caller: Address,
        target: Address,
        value: U256,
        data: &[u8],
    ) -> Result<CallOutcome, CallRevert>;
}

/// A target-level revert. Isolated to the operation that triggered it.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("call reverted: {0}")]
pub struct CallRevert(pub String);

/// An account's validation and execution entry points.
pub trait AccountHook {
    /// Check the operation's authorization against the account's primary
    /// owner or its session-key registry.
    ///
    /// `missing_funds` is the amount the ledger debited from the account's
    /// own deposit (zero when sponsored); it is advisory.
    fn validate_operation(
        &mut self,
        operation: &Operation,
        op_hash: &Hash,
        missing_funds: U256,
        now: Timestamp,
    ) -> Result<ValidityWindow, HookRejection>;

    /// Dispatch the operation's call payload through `executor`.
    ///
    /// A reverted dispatch is reported in the receipt, not as an `Err`;
    /// `Err` means the payload could not be dispatched at all.
    fn execute_operation(
        &mut self,
        call_payload: &[u8],
        executor: &mut dyn CallExecutor,
    ) -> Result<ExecutionReceipt, HookRejection>;
}

/// A sponsor's pre-call reservation and post-call settlement hooks.
pub trait SponsorHook {
    /// Decide whether to subsidize the operation and optimistically reserve
    /// quota for it. Returns an opaque context the ledger hands back to
    /// [`SponsorHook::settle`].
    ///
    /// `sponsor_balance` is the sponsor's ledger deposit after the prefund
    /// debit for this operation.
    fn reserve(
        &mut self,
        account: Address,
        estimated_gas: Gas,
        max_cost: U256,
        sponsor_balance: U256,
        now: Timestamp,
    ) -> Result<Vec<u8>, HookRejection>;

    /// Settle after execution: roll the reservation back on a reverted
    /// dispatch, account the subsidy otherwise. Failures here are absorbed
    /// by the ledger (logged, never propagated).
    fn settle(
        &mut self,
        context: &[u8],
        outcome: ExecutionOutcome,
        actual_cost: U256,
        now: Timestamp,
    ) -> Result<(), HookRejection>;
}

/// Answers "did the factory mint this account?". Sponsors consult it to
/// refuse subsidizing accounts of unknown provenance.
pub trait AccountFactory {
    /// Whether `account` is a legitimate factory-minted account.
    fn is_legitimate_account(&self, account: Address) -> bool;
}

/// Resolves a sender identity to its account hook.
pub trait AccountDirectory {
    /// The account registered under `address`, if any.
    fn account(&mut self, address: Address) -> Option<&mut dyn AccountHook>;
}

/// Resolves a sponsor identity to its sponsor hook.
pub trait SponsorDirectory {
    /// The sponsor registered under `address`, if any.
    fn sponsor(&mut self, address: Address) -> Option<&mut dyn SponsorHook>;
}
