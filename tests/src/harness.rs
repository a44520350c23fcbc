//! # Shared Test Fixtures
//!
//! Wallets (keypair + account), directory implementations backed by plain
//! maps, a recording call executor, and operation builders used across the
//! integration and property suites.

use std::collections::{HashMap, HashSet};

use aa_02_account::Account;
use aa_04_sponsorship::SubsidyLedger;
use shared_crypto::Secp256k1KeyPair;
use shared_types::hooks::{
    AccountDirectory, AccountFactory, AccountHook, CallExecutor, SponsorDirectory, SponsorHook,
};
use shared_types::{
    compose_nonce, Address, CallOutcome, CallPayload, CallRevert, ExecutionReceipt, Hash,
    HookRejection, InnerCall, NonceKey, Operation, Timestamp, ValidityWindow, U256,
    AUTH_TAG_SECP256K1,
};

/// Install a test-friendly subscriber once; later calls are no-ops.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Default nonce namespace used by most fixtures.
pub const DEFAULT_NS: NonceKey = [0u8; 24];

/// A fixed "current time" for deterministic tests.
pub const NOW: Timestamp = 1_700_000_000;

/// Fee collector address.
pub const BENEFICIARY: Address = [0xBE; 20];

// Default operation gas figures:
//   prefund = (50_000 + 100_000 + 21_000) × 2 = 342_000
//   estimated gas units for sponsors = 171_000
pub const DEFAULT_PREFUND: u64 = 342_000;
pub const DEFAULT_ESTIMATED_GAS: u64 = 171_000;

/// An owner keypair bound to an account address.
pub struct Wallet {
    pub keys: Secp256k1KeyPair,
    pub account_address: Address,
}

impl Wallet {
    pub fn new(account_address: Address) -> Self {
        Self {
            keys: Secp256k1KeyPair::generate(),
            account_address,
        }
    }

    /// A fresh account controlled by this wallet's key.
    pub fn account(&self) -> Account {
        Account::new(self.account_address, self.keys.address())
    }

    /// Sign `operation` as the primary owner (untagged authorization).
    pub fn sign(&self, operation: &mut Operation) {
        let hash = operation.hash();
        operation.authorization = self
            .keys
            .sign_prehash(&hash)
            .expect("owner signing")
            .to_vec();
    }
}

/// Build a tagged secp256k1 session authorization over `hash`.
pub fn session_secp_authorization(keys: &Secp256k1KeyPair, hash: &Hash) -> Vec<u8> {
    let signature = keys.sign_prehash(hash).expect("session signing");
    let mut authorization = AUTH_TAG_SECP256K1.to_vec();
    authorization.extend_from_slice(&keys.address());
    authorization.extend_from_slice(&signature);
    authorization
}

/// An operation with the default gas figures and an empty authorization.
pub fn operation(sender: Address, sequence: u64, call_payload: Vec<u8>) -> Operation {
    Operation {
        sender,
        nonce: compose_nonce(DEFAULT_NS, sequence),
        call_payload,
        verification_gas_limit: 50_000,
        call_gas_limit: 100_000,
        pre_verification_gas: U256::from(21_000u64),
        max_fee_per_gas: 2,
        priority_fee_per_gas: 1,
        sponsor_payload: vec![],
        authorization: vec![],
    }
}

/// A single-call payload: `execute(target, value, data)`.
pub fn execute_payload(target: Address, value: u64, data: Vec<u8>) -> Vec<u8> {
    CallPayload::Execute(InnerCall {
        target,
        value: U256::from(value),
        data,
    })
    .encode()
}

/// Account directory over real [`Account`] instances.
#[derive(Default)]
pub struct AccountMap {
    pub accounts: HashMap<Address, Account>,
}

impl AccountMap {
    pub fn insert(&mut self, account: Account) {
        self.accounts.insert(account.address(), account);
    }

    pub fn get(&self, address: Address) -> &Account {
        &self.accounts[&address]
    }

    pub fn get_mut(&mut self, address: Address) -> &mut Account {
        self.accounts.get_mut(&address).expect("account registered")
    }
}

impl AccountDirectory for AccountMap {
    fn account(&mut self, address: Address) -> Option<&mut dyn AccountHook> {
        self.accounts
            .get_mut(&address)
            .map(|account| account as &mut dyn AccountHook)
    }
}

/// Sponsor directory over real [`SubsidyLedger`] instances.
#[derive(Default)]
pub struct SponsorMap {
    pub sponsors: HashMap<Address, SubsidyLedger>,
}

impl SponsorDirectory for SponsorMap {
    fn sponsor(&mut self, address: Address) -> Option<&mut dyn SponsorHook> {
        self.sponsors
            .get_mut(&address)
            .map(|sponsor| sponsor as &mut dyn SponsorHook)
    }
}

/// Executor that records every dispatched call and reverts for a
/// configurable set of targets.
#[derive(Default)]
pub struct RecordingExecutor {
    pub calls: Vec<(Address, Address, U256, Vec<u8>)>,
    pub gas_per_call: u64,
    pub failing_targets: HashSet<Address>,
}

impl RecordingExecutor {
    pub fn new(gas_per_call: u64) -> Self {
        Self {
            gas_per_call,
            ..Default::default()
        }
    }

    pub fn failing_for(mut self, target: Address) -> Self {
        self.failing_targets.insert(target);
        self
    }
}

impl CallExecutor for RecordingExecutor {
    fn call(
        &mut self,
        caller: Address,
        target: Address,
        value: U256,
        data: &[u8],
    ) -> Result<CallOutcome, CallRevert> {
        if self.failing_targets.contains(&target) {
            return Err(CallRevert("target reverted".into()));
        }
        self.calls.push((caller, target, value, data.to_vec()));
        Ok(CallOutcome {
            gas_used: self.gas_per_call,
            output: Vec::new(),
        })
    }
}

/// Factory that vouches for every account.
pub struct OpenFactory;

impl AccountFactory for OpenFactory {
    fn is_legitimate_account(&self, _account: Address) -> bool {
        true
    }
}

/// Account hook that accepts everything, for property suites that probe
/// ledger semantics without real signatures.
pub struct AcceptAllAccount;

impl AccountHook for AcceptAllAccount {
    fn validate_operation(
        &mut self,
        _operation: &Operation,
        _op_hash: &Hash,
        _missing_funds: U256,
        _now: Timestamp,
    ) -> Result<ValidityWindow, HookRejection> {
        Ok(ValidityWindow::unbounded())
    }

    fn execute_operation(
        &mut self,
        _call_payload: &[u8],
        _executor: &mut dyn CallExecutor,
    ) -> Result<ExecutionReceipt, HookRejection> {
        Ok(ExecutionReceipt::succeeded(10_000))
    }
}

/// Directory over boxed hooks, for mixing stub behaviors.
#[derive(Default)]
pub struct BoxedAccounts {
    pub accounts: HashMap<Address, Box<dyn AccountHook>>,
}

impl AccountDirectory for BoxedAccounts {
    fn account(&mut self, address: Address) -> Option<&mut dyn AccountHook> {
        self.accounts
            .get_mut(&address)
            .map(|boxed| &mut **boxed as &mut dyn AccountHook)
    }
}
