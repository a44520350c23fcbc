//! # Entry Ledger Subsystem (AA-01)
//!
//! The singleton coordinator of the operation pipeline. It is the only
//! holder of deposits, stakes, and nonces, and the only caller of the
//! account and sponsor hooks.
//!
//! ## Batch Model
//!
//! | Pass       | Failure scope | State                         |
//! |------------|---------------|-------------------------------|
//! | Validation | whole batch   | staged in an overlay          |
//! | Execution  | one operation | committed, per-op refunds     |
//!
//! Validation must be total before execution starts: a batch whose ninth
//! operation carries a bad nonce costs the other eight nothing.

pub mod domain;
pub mod events;

// Re-export public API
pub use domain::entities::{BatchOutcome, DepositRecord, OperationReceipt};
pub use domain::errors::{BatchError, BatchRejection, LedgerError};
pub use domain::ledger::{BatchEnv, OperationLedger};
pub use domain::overlay::StateOverlay;
pub use events::payloads::{
    BatchSettledPayload, DepositedPayload, OperationProcessedPayload, StakeLockedPayload,
    StakeUnlockedPayload, StakeWithdrawnPayload, WithdrawnPayload,
};
pub use events::LedgerEvent;
