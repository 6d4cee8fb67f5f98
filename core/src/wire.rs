//! Compact wire encodings for actions and responses.
//!
//! Encoded values travel through replay logs, saved games, and the worker
//! boundary. Decoding at system boundaries is best-effort: a malformed
//! response payload yields the safe default [`ActionResponse::Start`]
//! instead of throwing into caller code.

use crate::action::{Action, ActionResponse};

/// JSON wire form of an [`ActionResponse`].
pub type EncodedActionResponse = String;

/// JSON wire form of an [`Action`].
pub type EncodedAction = String;

/// Encodes a response for persistence or transport.
#[must_use]
pub fn encode_action_response(response: &ActionResponse) -> EncodedActionResponse {
    serde_json::to_string(response).expect("action response serialization never fails")
}

/// Encodes an action for persistence or transport.
#[must_use]
pub fn encode_action(action: &Action) -> EncodedAction {
    serde_json::to_string(action).expect("action serialization never fails")
}

/// Decodes a response, substituting [`ActionResponse::Start`] when the
/// payload does not parse. Boundary code relies on this never panicking.
#[must_use]
pub fn maybe_decode_action_response(encoded: &str) -> ActionResponse {
    serde_json::from_str(encoded).unwrap_or(ActionResponse::Start)
}

/// Decodes an action, reporting malformed payloads to the caller.
pub fn decode_action(encoded: &str) -> Result<Action, serde_json::Error> {
    serde_json::from_str(encoded)
}
