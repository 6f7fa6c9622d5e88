//! Scraping of the script-embedded setup payload.
//!
//! The login exchange does not answer with clean JSON: the session
//! state arrives embedded in an HTML body, inside a fixed script-call
//! wrapper of the form `_setup({...})}</script>`. This is the single
//! most fragile piece of the integration, so all knowledge of the
//! wrapper lives here and nowhere else.

use crate::error::{ProtocolError, ProtocolResult};
use crate::keys;
use serde_json::Value;

const SETUP_BEGIN: &str = "_setup(";
const SETUP_END: &str = ")}</script>";

/// Extracts the JSON setup payload from a login or enumeration
/// response body.
///
/// Looks for the first `_setup(` and the last `)}</script>` so that
/// script content inside the payload cannot truncate it.
pub fn extract_setup_payload(body: &str) -> ProtocolResult<Value> {
    let begin = body.find(SETUP_BEGIN);
    let end = body.rfind(SETUP_END);

    let json_text = match (begin, end) {
        (Some(begin), Some(end)) if begin + SETUP_BEGIN.len() < end => {
            &body[begin + SETUP_BEGIN.len()..end]
        }
        _ => return Err(ProtocolError::NoSetupPayload),
    };

    Ok(serde_json::from_str(json_text)?)
}

/// Extracts the numeric client protocol version from a login response
/// body.
pub fn client_version_from_login(body: &str) -> ProtocolResult<i64> {
    let setup = extract_setup_payload(body)?;
    setup
        .get(keys::SETUP_VERSION)
        .and_then(Value::as_i64)
        .ok_or_else(|| ProtocolError::missing(keys::SETUP_VERSION, "setup payload"))
}
