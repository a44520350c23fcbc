//! # Call-Payload Codec
//!
//! An operation's `call_payload` is a 4-byte [`Selector`] followed by a
//! bincode-encoded body. Accounts understand two shapes:
//!
//! - `execute(address,uint256,bytes)`: one [`InnerCall`]
//! - `executeBatch(address[],uint256[],bytes[])`: a vector of them
//!
//! Unknown selectors decode losslessly into [`CallPayload::Other`] so the
//! session-key engine and accounts can reject them with a precise reason.

use serde::{Deserialize, Serialize};

use crate::entities::{Address, U256};
use crate::errors::CodecError;
use crate::selectors::{self, Selector};

/// One call a dispatched operation makes: `(target, value, data)`.
///
/// When `data` is non-empty, its leading 4 bytes are the inner call's
/// selector; the session-key allow-lists match against it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InnerCall {
    /// The contract/account being called.
    pub target: Address,
    /// Native value transferred with the call.
    pub value: U256,
    /// Call data forwarded to the target (selector-prefixed when non-empty).
    pub data: Vec<u8>,
}

impl InnerCall {
    /// The inner call's own selector, when call data is present.
    pub fn selector(&self) -> Option<Selector> {
        Selector::read(&self.data)
    }
}

/// A decoded call payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallPayload {
    /// Single-call dispatch.
    Execute(InnerCall),
    /// Batch dispatch; calls run in order.
    ExecuteBatch(Vec<InnerCall>),
    /// Unknown selector; preserved for diagnostics, never dispatched.
    Other { selector: Selector, body: Vec<u8> },
}

impl CallPayload {
    /// Encode as `selector ‖ bincode(body)`.
    pub fn encode(&self) -> Vec<u8> {
        let (selector, body) = match self {
            CallPayload::Execute(call) => (
                selectors::execute(),
                bincode::serialize(call).unwrap_or_default(),
            ),
            CallPayload::ExecuteBatch(calls) => (
                selectors::execute_batch(),
                bincode::serialize(calls).unwrap_or_default(),
            ),
            CallPayload::Other { selector, body } => (*selector, body.clone()),
        };
        let mut encoded = Vec::with_capacity(4 + body.len());
        encoded.extend_from_slice(&selector.0);
        encoded.extend_from_slice(&body);
        encoded
    }

    /// Decode a payload, classifying it by its leading selector.
    pub fn decode(payload: &[u8]) -> Result<Self, CodecError> {
        let selector = Selector::read(payload).ok_or(CodecError::MissingSelector)?;
        let body = &payload[4..];

        if selector == selectors::execute() {
            let call: InnerCall = bincode::deserialize(body)
                .map_err(|e| CodecError::MalformedBody(e.to_string()))?;
            Ok(CallPayload::Execute(call))
        } else if selector == selectors::execute_batch() {
            let calls: Vec<InnerCall> = bincode::deserialize(body)
                .map_err(|e| CodecError::MalformedBody(e.to_string()))?;
            Ok(CallPayload::ExecuteBatch(calls))
        } else {
            Ok(CallPayload::Other {
                selector,
                body: body.to_vec(),
            })
        }
    }

    /// The inner calls this payload would dispatch, in order.
    ///
    /// `Other` payloads have no analyzable calls and yield an empty slice.
    pub fn inner_calls(&self) -> &[InnerCall] {
        match self {
            CallPayload::Execute(call) => std::slice::from_ref(call),
            CallPayload::ExecuteBatch(calls) => calls.as_slice(),
            CallPayload::Other { .. } => &[],
        }
    }
}
