//! # Validation-Pass State Overlay
//!
//! The validation pass must see its own staged mutations (nonce
//! increments, prefund debits) without touching committed state, because
//! any later operation can still abort the whole batch. The overlay is a
//! read-through cache over the committed maps; `apply` folds it back in
//! only once every operation has validated.

use std::collections::HashMap;

use shared_types::{Address, NonceKey, U256};

use super::entities::DepositRecord;

/// Staged balances and nonces layered over the committed maps.
#[derive(Debug, Default)]
pub struct StateOverlay {
    balances: HashMap<Address, U256>,
    nonces: HashMap<(Address, NonceKey), u64>,
}

impl StateOverlay {
    /// Staged balance for `address`, falling through to committed state.
    pub fn balance(&self, committed: &HashMap<Address, DepositRecord>, address: Address) -> U256 {
        self.balances.get(&address).copied().unwrap_or_else(|| {
            committed
                .get(&address)
                .map(|record| record.balance)
                .unwrap_or_default()
        })
    }

    /// Stage a new balance for `address`.
    pub fn set_balance(&mut self, address: Address, balance: U256) {
        self.balances.insert(address, balance);
    }

    /// Staged next sequence for `(address, namespace)`, falling through to
    /// committed state. A namespace never used before starts at 0.
    pub fn nonce(
        &self,
        committed: &HashMap<(Address, NonceKey), u64>,
        address: Address,
        namespace: NonceKey,
    ) -> u64 {
        self.nonces
            .get(&(address, namespace))
            .copied()
            .unwrap_or_else(|| committed.get(&(address, namespace)).copied().unwrap_or(0))
    }

    /// Stage the next sequence for `(address, namespace)`.
    pub fn set_nonce(&mut self, address: Address, namespace: NonceKey, sequence: u64) {
        self.nonces.insert((address, namespace), sequence);
    }

    /// Fold every staged mutation into the committed maps.
    pub fn apply(
        self,
        deposits: &mut HashMap<Address, DepositRecord>,
        nonces: &mut HashMap<(Address, NonceKey), u64>,
    ) {
        for (address, balance) in self.balances {
            deposits.entry(address).or_default().balance = balance;
        }
        for (key, sequence) in self.nonces {
            nonces.insert(key, sequence);
        }
    }
}
