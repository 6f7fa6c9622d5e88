//! Request envelope for the batched action-list format.

use crate::keys;
use serde_json::{json, Value};

/// Source of client-assigned action ids.
///
/// Action ids are monotonically increasing per session and shared by
/// every action the session issues, whatever the request they end up
/// batched into.
#[derive(Debug, Clone)]
pub struct ActionIdSource {
    next: u64,
}

impl ActionIdSource {
    /// Creates a new source starting at 1.
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Returns the next action id, advancing the counter.
    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

impl Default for ActionIdSource {
    fn default() -> Self {
        Self::new()
    }
}

/// One outbound request: a list of action objects plus the client
/// protocol version obtained at login.
#[derive(Debug, Clone)]
pub struct RequestEnvelope {
    actions: Vec<Value>,
    client_version: i64,
}

impl RequestEnvelope {
    /// Creates an empty envelope for the given protocol version.
    pub fn new(client_version: i64) -> Self {
        Self {
            actions: Vec::new(),
            client_version,
        }
    }

    /// Appends one action object.
    pub fn push(&mut self, action: Value) {
        self.actions.push(action);
    }

    /// Creates an envelope holding a single action.
    pub fn single(client_version: i64, action: Value) -> Self {
        let mut envelope = Self::new(client_version);
        envelope.push(action);
        envelope
    }

    /// Creates an envelope from an already-built batch of actions.
    pub fn batch(client_version: i64, actions: Vec<Value>) -> Self {
        Self {
            actions,
            client_version,
        }
    }

    /// Number of actions queued in this envelope.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns true if no actions have been queued.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Consumes the envelope into the request body object.
    pub fn into_body(self) -> Value {
        json!({
            keys::ACTION_LIST: self.actions,
            keys::CLIENT_VERSION: self.client_version,
        })
    }
}
