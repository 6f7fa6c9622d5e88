//! The MetaData node variant: a disguised task carrying local-only
//! folder bookkeeping.

use crate::error::SyncResult;
use crate::local;
use crate::node::{LocalSnapshot, NodeFields, SyncAction, SyncNode};
use crate::task::Task;
use crate::tasklist::TaskList;
use serde_json::Value;

/// A sentinel task whose notes field smuggles a serialized key/value
/// payload through a remote service that has no folder-metadata
/// concept.
///
/// Exactly one sentinel exists per synchronized local folder that has
/// no natural remote equivalent; it lives in the dedicated
/// [`local::FOLDER_META`] list. The sentinel is not a real task from
/// the orchestrator's point of view: the local-representation and
/// resolver capabilities are programming errors on this variant and
/// panic when invoked.
#[derive(Debug, Clone, Default)]
pub struct MetaData {
    task: Task,
    related_remote_id: Option<String>,
}

impl MetaData {
    /// Creates an empty sentinel.
    pub fn new() -> Self {
        Self {
            task: Task::new(),
            related_remote_id: None,
        }
    }

    /// Fills the sentinel with a payload and the remote id of the
    /// entity it describes.
    pub fn set_meta(&mut self, related_remote_id: &str, mut payload: Value) {
        payload[local::META_RELATED_ID] = Value::String(related_remote_id.to_owned());
        self.related_remote_id = Some(related_remote_id.to_owned());
        self.task.set_notes(payload.to_string());
        self.task.set_name(local::META_NOTE_NAME);
    }

    /// The remote id of the entity this sentinel describes, if the
    /// payload carried one. Unknown is not an error: the caller
    /// re-derives or recreates the link.
    pub fn related_remote_id(&self) -> Option<&str> {
        self.related_remote_id.as_deref()
    }

    /// The deserialized payload, if the notes content parses.
    pub fn payload(&self) -> Option<Value> {
        serde_json::from_str(self.task.notes()?.trim()).ok()
    }
}

impl SyncNode for MetaData {
    fn fields(&self) -> &NodeFields {
        self.task.fields()
    }

    fn fields_mut(&mut self) -> &mut NodeFields {
        self.task.fields_mut()
    }

    fn create_action(&self, action_id: u64, parent: Option<&TaskList>) -> SyncResult<Value> {
        self.task.create_action(action_id, parent)
    }

    fn update_action(&self, action_id: u64) -> Value {
        self.task.update_action(action_id)
    }

    fn apply_remote_json(&mut self, descriptor: &Value) -> SyncResult<()> {
        self.task.apply_remote_json(descriptor)?;
        self.related_remote_id = match self.payload() {
            Some(payload) => payload
                .get(local::META_RELATED_ID)
                .and_then(Value::as_str)
                .map(str::to_owned),
            None => None,
        };
        if self.task.notes().is_some() && self.related_remote_id.is_none() {
            tracing::warn!("sentinel payload did not carry a back-reference");
        }
        Ok(())
    }

    fn apply_local_json(&mut self, _representation: &Value) -> SyncResult<()> {
        unreachable!("MetaData has no local representation to apply");
    }

    fn to_local_json(&self) -> Option<Value> {
        unreachable!("MetaData has no local representation to produce");
    }

    fn resolve_sync_action(&self, _snapshot: &LocalSnapshot) -> SyncAction {
        unreachable!("MetaData opts out of sync-action resolution");
    }

    fn is_worth_saving(&self) -> bool {
        self.task.notes().is_some()
    }
}
