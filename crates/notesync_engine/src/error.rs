//! Error types for the sync engine.

use notesync_protocol::ProtocolError;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur during sync operations.
///
/// The taxonomy distinguishes "retry the pass later, state unchanged"
/// (network) from "this entity's action did not apply, investigate"
/// (action). Programming faults such as issuing a remote call before
/// login are not represented here; they panic.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Transport-level failure: connection refused, timeout, protocol
    /// error below the JSON layer. The session state is still valid.
    #[error("network failure: {0}")]
    Network(String),

    /// The remote service rejected an action or returned a body that
    /// did not have the expected shape.
    #[error("remote action failed: {0}")]
    Action(String),

    /// The local store's recorded remote id does not match the node's.
    /// The entity is excluded from automated sync until the
    /// orchestrator re-links or recreates it.
    #[error("remote identity mismatch: local store has `{local}`, node has `{remote}`")]
    Identity {
        /// Remote id recorded in the local store row.
        local: String,
        /// Remote id carried by the in-memory node.
        remote: String,
    },

    /// The credential provider could not supply a bearer token.
    #[error("credential provider failure: {0}")]
    Credential(String),

    /// The sync pass was cancelled; pending queued actions were
    /// dropped, not retried.
    #[error("sync pass cancelled")]
    Cancelled,
}

impl SyncError {
    /// Returns true if the whole pass may be retried later with the
    /// expectation that no per-entity state was corrupted.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SyncError::Network(_))
    }
}

impl From<ProtocolError> for SyncError {
    fn from(err: ProtocolError) -> Self {
        SyncError::Action(err.to_string())
    }
}
