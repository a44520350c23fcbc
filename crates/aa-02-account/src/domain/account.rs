//! # Account Entity
//!
//! One smart account: a primary secp256k1 owner plus an embedded
//! session-key registry. Authorization routing is decided by the
//! authorization's scheme tag, never by trial and error.

use aa_03_session_keys::{KeyIdentity, SessionKeyDescriptor, SessionKeyRegistry};
use shared_crypto::ecdsa;
use shared_types::{
    Address, CallExecutor, CallPayload, ExecutionReceipt, Gas, Hash, HookRejection, Operation,
    ParsedAuthorization, Timestamp, ValidityWindow, U256,
};
use shared_types::hooks::AccountHook;
use tracing::{debug, info};

use super::errors::AccountError;
use crate::events::payloads::{
    AuthScheme, OperationValidatedPayload, OwnershipTransferredPayload, SessionKeyGrantedPayload,
    SessionKeyRevokedPayload,
};
use crate::events::AccountEvent;

/// A deployed smart account.
pub struct Account {
    address: Address,
    owner: Address,
    session_keys: SessionKeyRegistry,
    events: Vec<AccountEvent>,
}

impl Account {
    /// Create an account at `address` controlled by `owner`.
    pub fn new(address: Address, owner: Address) -> Self {
        Self {
            address,
            owner,
            session_keys: SessionKeyRegistry::new(address),
            events: Vec::new(),
        }
    }

    /// The account's own address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// The current primary owner.
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Read access to the embedded session-key registry.
    pub fn session_keys(&self) -> &SessionKeyRegistry {
        &self.session_keys
    }

    // =========================================================================
    // OWNER-ONLY SURFACE
    // =========================================================================

    /// Register a delegated credential. Owner-only.
    pub fn grant_session_key(
        &mut self,
        caller: Address,
        descriptor: SessionKeyDescriptor,
        now: Timestamp,
    ) -> Result<KeyIdentity, AccountError> {
        self.require_owner(caller)?;
        let identity = self.session_keys.grant(descriptor, now)?;
        self.events
            .push(AccountEvent::SessionKeyGranted(SessionKeyGrantedPayload {
                identity,
            }));
        Ok(identity)
    }

    /// Permanently revoke a delegated credential. Owner-only.
    pub fn revoke_session_key(
        &mut self,
        caller: Address,
        identity: KeyIdentity,
    ) -> Result<(), AccountError> {
        self.require_owner(caller)?;
        self.session_keys.revoke(identity)?;
        self.events
            .push(AccountEvent::SessionKeyRevoked(SessionKeyRevokedPayload {
                identity,
            }));
        Ok(())
    }

    /// Hand the account to a new primary owner. Owner-only; the zero
    /// address is refused.
    pub fn transfer_ownership(
        &mut self,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), AccountError> {
        self.require_owner(caller)?;
        if new_owner == [0u8; 20] {
            return Err(AccountError::ZeroAddressOwner);
        }

        let previous = self.owner;
        self.owner = new_owner;
        info!(
            account = %hex::encode(self.address),
            previous = %hex::encode(previous),
            new = %hex::encode(new_owner),
            "ownership transferred"
        );
        self.events
            .push(AccountEvent::OwnershipTransferred(OwnershipTransferredPayload {
                previous,
                new_owner,
            }));
        Ok(())
    }

    /// Drain accumulated observability events in emission order.
    pub fn take_events(&mut self) -> Vec<AccountEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drain the embedded registry's events.
    pub fn take_session_key_events(&mut self) -> Vec<aa_03_session_keys::SessionKeyEvent> {
        self.session_keys.take_events()
    }

    fn require_owner(&self, caller: Address) -> Result<(), AccountError> {
        if caller != self.owner {
            return Err(AccountError::NotOwner);
        }
        Ok(())
    }
}

impl AccountHook for Account {
    fn validate_operation(
        &mut self,
        operation: &Operation,
        op_hash: &Hash,
        missing_funds: U256,
        now: Timestamp,
    ) -> Result<ValidityWindow, HookRejection> {
        debug!(
            account = %hex::encode(self.address),
            %missing_funds,
            "validating operation"
        );

        let parsed = ParsedAuthorization::parse(&operation.authorization)
            .map_err(|e| HookRejection::Unauthorized(e.to_string()))?;

        let (window, scheme) = match parsed {
            ParsedAuthorization::Owner(signature) => {
                let signature: [u8; 65] = signature.as_slice().try_into().map_err(|_| {
                    HookRejection::Unauthorized(format!(
                        "owner signature must be 65 bytes, got {}",
                        operation.authorization.len()
                    ))
                })?;
                ecdsa::verify_signer(op_hash, &signature, self.owner)
                    .map_err(|e| HookRejection::Unauthorized(e.to_string()))?;
                (ValidityWindow::unbounded(), AuthScheme::Owner)
            }
            ParsedAuthorization::SessionSecp256k1 { .. } => {
                let window = self.session_keys.authorize(
                    op_hash,
                    &operation.authorization,
                    &operation.call_payload,
                    now,
                )?;
                (window, AuthScheme::SessionSecp256k1)
            }
            ParsedAuthorization::SessionP256 { .. } => {
                let window = self.session_keys.authorize(
                    op_hash,
                    &operation.authorization,
                    &operation.call_payload,
                    now,
                )?;
                (window, AuthScheme::SessionP256)
            }
        };

        self.events
            .push(AccountEvent::OperationValidated(OperationValidatedPayload {
                op_hash: *op_hash,
                scheme,
            }));
        Ok(window)
    }

    fn execute_operation(
        &mut self,
        call_payload: &[u8],
        executor: &mut dyn CallExecutor,
    ) -> Result<ExecutionReceipt, HookRejection> {
        let payload = CallPayload::decode(call_payload)
            .map_err(|e| HookRejection::Unsupported(e.to_string()))?;

        if let CallPayload::Other { selector, .. } = &payload {
            return Err(HookRejection::Unsupported(format!(
                "selector {selector} is not dispatchable"
            )));
        }

        let mut gas_used: Gas = 0;
        for call in payload.inner_calls() {
            match executor.call(self.address, call.target, call.value, &call.data) {
                Ok(outcome) => gas_used = gas_used.saturating_add(outcome.gas_used),
                // First revert fails the whole operation; gas spent on
                // earlier calls is still reported.
                Err(revert) => return Ok(ExecutionReceipt::reverted(gas_used, revert.0)),
            }
        }
        Ok(ExecutionReceipt::succeeded(gas_used))
    }
}
