//! Response parsing helpers.
//!
//! Mutation responses carry a `results` array aligned with the
//! request's `action_list`; enumeration responses carry `lists` or
//! `tasks` arrays. All helpers return typed errors rather than
//! panicking, so a malformed body surfaces as an action failure.

use crate::error::{ProtocolError, ProtocolResult};
use crate::keys;
use serde_json::Value;

/// Extracts the service-assigned identity from the first result of a
/// create response.
pub fn first_new_id(response: &Value) -> ProtocolResult<String> {
    let results = response
        .get(keys::RESULTS)
        .and_then(Value::as_array)
        .ok_or_else(|| ProtocolError::missing(keys::RESULTS, "create response"))?;

    results
        .first()
        .and_then(|result| result.get(keys::NEW_ID))
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| ProtocolError::missing(keys::NEW_ID, "create result"))
}

/// Extracts the remote list descriptors from a scraped setup payload.
///
/// The payload nests the lists under the per-user state object.
pub fn remote_lists(setup: &Value) -> ProtocolResult<Vec<Value>> {
    setup
        .get(keys::SETUP_USER_STATE)
        .and_then(|state| state.get(keys::LISTS))
        .and_then(Value::as_array)
        .cloned()
        .ok_or_else(|| ProtocolError::missing(keys::LISTS, "setup payload"))
}

/// Extracts the remote task descriptors from a `get_all` response.
pub fn remote_tasks(response: &Value) -> ProtocolResult<Vec<Value>> {
    response
        .get(keys::TASKS)
        .and_then(Value::as_array)
        .cloned()
        .ok_or_else(|| ProtocolError::missing(keys::TASKS, "get_all response"))
}
