//! Error types for protocol parsing.

use thiserror::Error;

/// Result type for protocol parsing operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors produced while building or parsing wire payloads.
///
/// These are all "action failure" class errors from the caller's
/// point of view: the bytes arrived, but did not have the expected
/// shape. Transport problems never originate here.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// The response body was not a JSON object.
    #[error("response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A field the protocol requires was absent or had the wrong type.
    #[error("missing or malformed field `{field}` in {context}")]
    MissingField {
        /// The wire key that was expected.
        field: &'static str,
        /// Where in the payload it was expected.
        context: &'static str,
    },

    /// The login body did not contain the script-embedded setup call.
    #[error("no setup payload found in login response body")]
    NoSetupPayload,
}

impl ProtocolError {
    pub(crate) fn missing(field: &'static str, context: &'static str) -> Self {
        Self::MissingField { field, context }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ProtocolError::missing("new_id", "create result");
        assert!(err.to_string().contains("new_id"));
        assert!(err.to_string().contains("create result"));

        assert_eq!(
            ProtocolError::NoSetupPayload.to_string(),
            "no setup payload found in login response body"
        );
    }
}
