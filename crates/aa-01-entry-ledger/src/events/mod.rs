//! Observability events emitted by the operation ledger.

pub mod payloads;

use payloads::{
    BatchSettledPayload, DepositedPayload, OperationProcessedPayload, StakeLockedPayload,
    StakeUnlockedPayload, StakeWithdrawnPayload, WithdrawnPayload,
};
use serde::{Deserialize, Serialize};

/// All events the ledger can emit, in emission order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    /// A deposit was credited.
    Deposited(DepositedPayload),
    /// A deposit was withdrawn.
    Withdrawn(WithdrawnPayload),
    /// Stake was added or increased.
    StakeLocked(StakeLockedPayload),
    /// A stake's withdrawal timer started.
    StakeUnlocked(StakeUnlockedPayload),
    /// An unlocked stake was paid out.
    StakeWithdrawn(StakeWithdrawnPayload),
    /// One operation finished the execution pass.
    OperationProcessed(OperationProcessedPayload),
    /// A whole batch settled and the beneficiary was paid.
    BatchSettled(BatchSettledPayload),
}
