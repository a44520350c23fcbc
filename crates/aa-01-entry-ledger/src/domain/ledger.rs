//! # Operation Ledger
//!
//! The pipeline's single entry point. Holds every account's deposit,
//! stake, and nonce state, and processes operation batches in two strict
//! passes:
//!
//! 1. **Validation**: nonce check, prefund debit, sponsor reservation,
//!    and account authorization for every operation, staged in a
//!    [`StateOverlay`]. Any failure rejects the whole batch with the
//!    offending index; nothing is committed.
//! 2. **Execution**: each validated operation dispatches in isolation.
//!    A revert charges the operation and moves on; it never disturbs its
//!    neighbours.
//!
//! Fees accumulate across the batch and pay out to the beneficiary once,
//! at the end.

use std::collections::HashMap;

use shared_types::{Address, ExecutionOutcome, Gas, NonceKey, Operation, Timestamp, U256};
use shared_types::hooks::{AccountDirectory, CallExecutor, SponsorDirectory};
use tracing::{debug, info, warn};

use super::entities::{BatchOutcome, DepositRecord, OperationReceipt};
use super::errors::{BatchError, BatchRejection, LedgerError};
use super::overlay::StateOverlay;
use crate::events::payloads::{
    BatchSettledPayload, DepositedPayload, OperationProcessedPayload, StakeLockedPayload,
    StakeUnlockedPayload, StakeWithdrawnPayload, WithdrawnPayload,
};
use crate::events::LedgerEvent;

/// Everything `process_batch` needs from the embedding runtime: who the
/// accounts and sponsors are, and how inner calls reach the world.
pub struct BatchEnv<'a> {
    /// Resolves sender addresses to account hooks.
    pub accounts: &'a mut dyn AccountDirectory,
    /// Resolves sponsor addresses to sponsor hooks.
    pub sponsors: &'a mut dyn SponsorDirectory,
    /// Dispatches inner calls.
    pub executor: &'a mut dyn CallExecutor,
}

/// Per-operation state carried from the validation pass into execution.
struct ValidatedOp {
    op_hash: [u8; 32],
    prefund: U256,
    payer: Address,
    sponsor: Option<Address>,
    sponsor_context: Option<Vec<u8>>,
}

/// The operation ledger.
#[derive(Default)]
pub struct OperationLedger {
    deposits: HashMap<Address, DepositRecord>,
    nonces: HashMap<(Address, NonceKey), u64>,
    processing: bool,
    events: Vec<LedgerEvent>,
}

impl OperationLedger {
    /// An empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // DEPOSITS AND STAKES
    // =========================================================================

    /// Credit `amount` to `account`'s spendable deposit.
    pub fn deposit(&mut self, account: Address, amount: U256) -> Result<(), LedgerError> {
        let record = self.deposits.entry(account).or_default();
        record.balance = record
            .balance
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow(account))?;

        let new_balance = record.balance;
        self.events.push(LedgerEvent::Deposited(DepositedPayload {
            account,
            amount,
            new_balance,
        }));
        Ok(())
    }

    /// Move `amount` from `caller`'s own deposit to `to`'s.
    pub fn withdraw(
        &mut self,
        caller: Address,
        amount: U256,
        to: Address,
    ) -> Result<(), LedgerError> {
        let available = self.balance_of(caller);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                available,
                needed: amount,
            });
        }

        // Check the credit side before mutating anything.
        let target_balance = if to == caller {
            available - amount
        } else {
            self.balance_of(to)
        };
        let credited = target_balance
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow(to))?;

        self.deposits.entry(caller).or_default().balance = available - amount;
        self.deposits.entry(to).or_default().balance = credited;
        self.events.push(LedgerEvent::Withdrawn(WithdrawnPayload {
            account: caller,
            to,
            amount,
        }));
        Ok(())
    }

    /// Add `amount` to `caller`'s locked stake. The unstake delay may only
    /// grow over the record's lifetime.
    pub fn add_stake(
        &mut self,
        caller: Address,
        amount: U256,
        unstake_delay_secs: u64,
    ) -> Result<(), LedgerError> {
        let record = self.deposits.entry(caller).or_default();
        if unstake_delay_secs < record.unstake_delay_secs {
            return Err(LedgerError::DelayShrunk {
                current: record.unstake_delay_secs,
                requested: unstake_delay_secs,
            });
        }

        record.stake = record
            .stake
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow(caller))?;
        record.staked = true;
        record.unstake_delay_secs = unstake_delay_secs;
        record.withdraw_time = 0;

        let payload = StakeLockedPayload {
            account: caller,
            stake: record.stake,
            unstake_delay_secs,
        };
        self.events.push(LedgerEvent::StakeLocked(payload));
        Ok(())
    }

    /// Start `caller`'s unstake timer: the stake becomes withdrawable at
    /// `now + unstake_delay_secs`.
    pub fn unlock_stake(&mut self, caller: Address, now: Timestamp) -> Result<(), LedgerError> {
        let record = self.deposits.entry(caller).or_default();
        if !record.staked {
            return Err(LedgerError::NotStaked);
        }

        record.staked = false;
        record.withdraw_time = now.saturating_add(record.unstake_delay_secs);

        let payload = StakeUnlockedPayload {
            account: caller,
            withdraw_time: record.withdraw_time,
        };
        self.events.push(LedgerEvent::StakeUnlocked(payload));
        Ok(())
    }

    /// Pay out `caller`'s full unlocked stake to `to`.
    pub fn withdraw_stake(
        &mut self,
        caller: Address,
        to: Address,
        now: Timestamp,
    ) -> Result<(), LedgerError> {
        let record = self.deposits.get(&caller).cloned().unwrap_or_default();
        if record.stake.is_zero() {
            return Err(LedgerError::NoStake);
        }
        if record.staked {
            return Err(LedgerError::StakeNotUnlocked);
        }
        if now < record.withdraw_time {
            return Err(LedgerError::WithdrawTooEarly {
                withdraw_time: record.withdraw_time,
                now,
            });
        }

        let amount = record.stake;
        let credited = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow(to))?;

        let caller_record = self.deposits.entry(caller).or_default();
        caller_record.stake = U256::zero();
        caller_record.withdraw_time = 0;
        self.deposits.entry(to).or_default().balance = credited;

        self.events
            .push(LedgerEvent::StakeWithdrawn(StakeWithdrawnPayload {
                account: caller,
                to,
                amount,
            }));
        Ok(())
    }

    /// `account`'s spendable deposit.
    pub fn balance_of(&self, account: Address) -> U256 {
        self.deposits
            .get(&account)
            .map(|record| record.balance)
            .unwrap_or_default()
    }

    /// `account`'s staked amount.
    pub fn stake_of(&self, account: Address) -> U256 {
        self.deposits
            .get(&account)
            .map(|record| record.stake)
            .unwrap_or_default()
    }

    /// `account`'s full deposit record, if one exists.
    pub fn deposit_record(&self, account: Address) -> Option<&DepositRecord> {
        self.deposits.get(&account)
    }

    /// The next expected sequence for `(account, namespace)`.
    pub fn nonce_of(&self, account: Address, namespace: NonceKey) -> u64 {
        self.nonces
            .get(&(account, namespace))
            .copied()
            .unwrap_or(0)
    }

    /// Drain accumulated observability events in emission order.
    pub fn drain_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }

    // =========================================================================
    // BATCH PROCESSING
    // =========================================================================

    /// Process a batch of operations against `env`, paying accumulated
    /// fees to `beneficiary`.
    ///
    /// Validation failures reject the whole batch and leave the ledger
    /// untouched. Execution failures are isolated to their operation. A
    /// beneficiary payout overflow is the one late error: it is reported
    /// after per-operation state has committed.
    pub fn process_batch(
        &mut self,
        batch: &[Operation],
        beneficiary: Address,
        now: Timestamp,
        env: &mut BatchEnv<'_>,
    ) -> Result<BatchOutcome, BatchError> {
        if self.processing {
            return Err(BatchError::at(batch.len(), BatchRejection::Reentrant));
        }
        self.processing = true;
        let result = self.process_batch_inner(batch, beneficiary, now, env);
        self.processing = false;
        result
    }

    fn process_batch_inner(
        &mut self,
        batch: &[Operation],
        beneficiary: Address,
        now: Timestamp,
        env: &mut BatchEnv<'_>,
    ) -> Result<BatchOutcome, BatchError> {
        // ---- Pass 1: validate every operation against staged state ----
        let mut overlay = StateOverlay::default();
        let mut validated = Vec::with_capacity(batch.len());

        for (index, operation) in batch.iter().enumerate() {
            let staged = self
                .validate_operation(operation, &mut overlay, env, now)
                .map_err(|reason| BatchError::at(index, reason))?;
            validated.push(staged);
        }
        overlay.apply(&mut self.deposits, &mut self.nonces);

        // ---- Pass 2: execute each operation in isolation ----
        let mut receipts = Vec::with_capacity(batch.len());
        let mut total_cost = U256::zero();

        for (operation, staged) in batch.iter().zip(validated) {
            let receipt = self.execute_operation(operation, &staged, env, now);
            total_cost = total_cost
                .checked_add(receipt.actual_cost)
                .ok_or_else(|| BatchError::at(batch.len(), BatchRejection::PayoutOverflow))?;
            receipts.push(receipt);
        }

        // Single payout: fees accumulate across the batch and credit the
        // beneficiary once.
        let record = self.deposits.entry(beneficiary).or_default();
        record.balance = record
            .balance
            .checked_add(total_cost)
            .ok_or_else(|| BatchError::at(batch.len(), BatchRejection::PayoutOverflow))?;

        info!(
            operations = batch.len(),
            %total_cost,
            beneficiary = %hex::encode(beneficiary),
            "batch settled"
        );
        self.events
            .push(LedgerEvent::BatchSettled(BatchSettledPayload {
                operations: batch.len() as u32,
                total_cost,
                beneficiary,
            }));

        Ok(BatchOutcome {
            receipts,
            total_cost,
            beneficiary,
        })
    }

    fn validate_operation(
        &self,
        operation: &Operation,
        overlay: &mut StateOverlay,
        env: &mut BatchEnv<'_>,
        now: Timestamp,
    ) -> Result<ValidatedOp, BatchRejection> {
        let op_hash = operation.hash();
        let prefund = operation
            .required_prefund()
            .ok_or(BatchRejection::PrefundOverflow)?;

        // Nonce: the sequence must match exactly, per namespace.
        let namespace = operation.nonce_namespace();
        let expected = overlay.nonce(&self.nonces, operation.sender, namespace);
        let got = operation.nonce_sequence();
        if got != expected {
            return Err(BatchRejection::InvalidNonce { expected, got });
        }
        overlay.set_nonce(operation.sender, namespace, expected + 1);

        // Sponsor payload: empty means self-funded; anything shorter than
        // an address is malformed and batch-fatal.
        let sponsor = match operation.sponsor_payload.len() {
            0 => None,
            len if len < 20 => return Err(BatchRejection::MalformedSponsorPayload(len)),
            _ => operation.sponsor(),
        };

        // Prefund is debited from the sponsor when present, the sender
        // otherwise.
        let payer = sponsor.unwrap_or(operation.sender);
        let available = overlay.balance(&self.deposits, payer);
        if available < prefund {
            return Err(BatchRejection::InsufficientPrefund {
                payer,
                available,
                needed: prefund,
            });
        }
        overlay.set_balance(payer, available - prefund);

        let sponsor_context = match sponsor {
            Some(address) => {
                let hook = env
                    .sponsors
                    .sponsor(address)
                    .ok_or(BatchRejection::UnknownSponsor(address))?;
                let context = hook
                    .reserve(
                        operation.sender,
                        estimated_gas_units(operation),
                        prefund,
                        overlay.balance(&self.deposits, address),
                        now,
                    )
                    .map_err(BatchRejection::SponsorRejected)?;
                Some(context)
            }
            None => None,
        };

        let account = env
            .accounts
            .account(operation.sender)
            .ok_or(BatchRejection::UnknownAccount(operation.sender))?;
        let missing_funds = if sponsor.is_some() {
            U256::zero()
        } else {
            prefund
        };
        let window = account
            .validate_operation(operation, &op_hash, missing_funds, now)
            .map_err(BatchRejection::AccountRejected)?;
        if !window.contains(now) {
            return Err(BatchRejection::WindowNotActive {
                valid_after: window.valid_after,
                valid_until: window.valid_until,
                now,
            });
        }

        debug!(
            sender = %hex::encode(operation.sender),
            op_hash = %hex::encode(op_hash),
            sponsored = sponsor.is_some(),
            "operation validated"
        );
        Ok(ValidatedOp {
            op_hash,
            prefund,
            payer,
            sponsor,
            sponsor_context,
        })
    }

    fn execute_operation(
        &mut self,
        operation: &Operation,
        staged: &ValidatedOp,
        env: &mut BatchEnv<'_>,
        now: Timestamp,
    ) -> OperationReceipt {
        let (outcome, call_gas, revert_reason) =
            match env.accounts.account(operation.sender) {
                Some(account) => {
                    match account.execute_operation(&operation.call_payload, env.executor) {
                        Ok(receipt) => (receipt.outcome, receipt.gas_used, receipt.revert_reason),
                        // Undispatchable payload: charged like a revert
                        // that never reached the executor.
                        Err(rejection) => {
                            (ExecutionOutcome::Reverted, 0, Some(rejection.to_string()))
                        }
                    }
                }
                None => (
                    ExecutionOutcome::Reverted,
                    0,
                    Some("account unavailable at execution".to_string()),
                ),
            };

        // Even a reverted dispatch consumed pre-verification work and
        // whatever the executor reports for the failed call.
        let gas_used = pre_verification_units(operation).saturating_add(call_gas);
        let cost = U256::from(gas_used) * U256::from(operation.max_fee_per_gas);
        let actual_cost = cost.min(staged.prefund);

        // Refund the unused prefund slice to whoever paid. The refund
        // never exceeds what was debited, so this cannot overflow.
        let refund = staged.prefund - actual_cost;
        if !refund.is_zero() {
            let record = self.deposits.entry(staged.payer).or_default();
            record.balance = record.balance.saturating_add(refund);
        }

        // Sponsor settlement is best-effort: a failing sponsor must not
        // poison the batch.
        if let (Some(sponsor_address), Some(context)) = (staged.sponsor, &staged.sponsor_context) {
            match env.sponsors.sponsor(sponsor_address) {
                Some(hook) => {
                    if let Err(rejection) = hook.settle(context, outcome, actual_cost, now) {
                        warn!(
                            sponsor = %hex::encode(sponsor_address),
                            %rejection,
                            "sponsor settlement failed"
                        );
                    }
                }
                None => warn!(
                    sponsor = %hex::encode(sponsor_address),
                    "sponsor vanished before settlement"
                ),
            }
        }

        let success = outcome == ExecutionOutcome::Succeeded;
        self.events
            .push(LedgerEvent::OperationProcessed(OperationProcessedPayload {
                op_hash: staged.op_hash,
                sender: operation.sender,
                sponsor: staged.sponsor,
                success,
                actual_cost,
                gas_used,
            }));

        OperationReceipt {
            op_hash: staged.op_hash,
            sender: operation.sender,
            success,
            gas_used,
            actual_cost,
            sponsored: staged.sponsor,
            revert_reason,
        }
    }
}

/// Total gas units an operation may consume, for sponsor reservations.
fn estimated_gas_units(operation: &Operation) -> Gas {
    let total = U256::from(operation.verification_gas_limit)
        .saturating_add(U256::from(operation.call_gas_limit))
        .saturating_add(operation.pre_verification_gas);
    saturate_to_gas(total)
}

/// The operation's pre-verification overhead as gas units.
fn pre_verification_units(operation: &Operation) -> Gas {
    saturate_to_gas(operation.pre_verification_gas)
}

fn saturate_to_gas(value: U256) -> Gas {
    if value > U256::from(u64::MAX) {
        u64::MAX
    } else {
        value.as_u64()
    }
}
