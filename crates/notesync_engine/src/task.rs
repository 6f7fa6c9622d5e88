//! The Task node variant: a single synchronizable item.

use crate::error::{SyncError, SyncResult};
use crate::local;
use crate::node::{NodeFields, NodeKey, SyncNode};
use crate::tasklist::TaskList;
use notesync_protocol::keys;
use serde_json::{json, Value};
use uuid::Uuid;

/// A single item belonging to exactly one [`TaskList`].
///
/// The prior-sibling link identifies the ordering predecessor within
/// the owning list by node key; it never implies ownership and is
/// maintained by the list's add/remove/move operations.
#[derive(Debug, Clone)]
pub struct Task {
    fields: NodeFields,
    key: NodeKey,
    prior_sibling: Option<NodeKey>,
    notes: Option<String>,
    completed: bool,
}

impl Task {
    /// Creates an empty, never-synchronized task.
    pub fn new() -> Self {
        Self {
            fields: NodeFields::new(),
            key: Uuid::new_v4(),
            prior_sibling: None,
            notes: None,
            completed: false,
        }
    }

    /// The stable in-memory key of this task.
    pub fn key(&self) -> NodeKey {
        self.key
    }

    /// The key of this task's ordering predecessor, `None` for the
    /// head of the sequence.
    pub fn prior_sibling(&self) -> Option<NodeKey> {
        self.prior_sibling
    }

    pub(crate) fn set_prior_sibling(&mut self, prior: Option<NodeKey>) {
        self.prior_sibling = prior;
    }

    /// Free-form text content.
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Sets the free-form text content.
    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = Some(notes.into());
    }

    /// Completion flag.
    pub fn completed(&self) -> bool {
        self.completed
    }

    /// Sets the completion flag.
    pub fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }

    /// Sets the display name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.fields.set_name(name);
    }
}

impl Default for Task {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncNode for Task {
    fn fields(&self) -> &NodeFields {
        &self.fields
    }

    fn fields_mut(&mut self) -> &mut NodeFields {
        &mut self.fields
    }

    fn create_action(&self, action_id: u64, parent: Option<&TaskList>) -> SyncResult<Value> {
        let parent = parent
            .ok_or_else(|| SyncError::Action("task create action without owning list".into()))?;
        let parent_id = parent.remote_id().ok_or_else(|| {
            SyncError::Action("task create action before the owning list was created".into())
        })?;
        let position = parent.position_of(self.key).ok_or_else(|| {
            SyncError::Action("task create action for a task outside the list".into())
        })?;

        let mut entity = json!({
            keys::NAME: self.name(),
            keys::CREATOR_ID: "null",
            keys::ENTITY_TYPE: keys::TYPE_TASK,
        });
        if let Some(notes) = &self.notes {
            entity[keys::NOTES] = json!(notes);
        }

        let mut action = json!({
            keys::ACTION_TYPE: keys::ACTION_TYPE_CREATE,
            keys::ACTION_ID: action_id,
            keys::INDEX: position,
            keys::ENTITY_DELTA: entity,
            keys::PARENT_ID: parent_id,
            keys::DEST_PARENT_TYPE: keys::TYPE_GROUP,
            keys::LIST_ID: parent_id,
        });
        if let Some(prior_id) = parent.prior_sibling_remote_id(self.key) {
            action[keys::PRIOR_SIBLING_ID] = json!(prior_id);
        }
        Ok(action)
    }

    fn update_action(&self, action_id: u64) -> Value {
        let mut entity = json!({
            keys::NAME: self.name(),
            keys::DELETED: self.deleted(),
        });
        if let Some(notes) = &self.notes {
            entity[keys::NOTES] = json!(notes);
        }
        json!({
            keys::ACTION_TYPE: keys::ACTION_TYPE_UPDATE,
            keys::ACTION_ID: action_id,
            keys::ID: self.remote_id(),
            keys::ENTITY_DELTA: entity,
        })
    }

    fn apply_remote_json(&mut self, descriptor: &Value) -> SyncResult<()> {
        if let Some(id) = descriptor.get(keys::ID).and_then(Value::as_str) {
            self.fields.set_remote_id(id);
        }
        if let Some(stamp) = descriptor.get(keys::LAST_MODIFIED).and_then(Value::as_i64) {
            self.fields.set_last_modified(stamp);
        }
        if let Some(name) = descriptor.get(keys::NAME).and_then(Value::as_str) {
            self.fields.set_name(name);
        }
        if let Some(notes) = descriptor.get(keys::NOTES).and_then(Value::as_str) {
            self.notes = Some(notes.to_owned());
        }
        if let Some(deleted) = descriptor.get(keys::DELETED).and_then(Value::as_bool) {
            self.fields.set_deleted(deleted);
        }
        if let Some(completed) = descriptor.get(keys::COMPLETED).and_then(Value::as_bool) {
            self.completed = completed;
        }
        Ok(())
    }

    fn apply_local_json(&mut self, representation: &Value) -> SyncResult<()> {
        let note = representation
            .get(local::NOTE)
            .ok_or_else(|| SyncError::Action("local representation has no note row".into()))?;
        let kind = note
            .get(local::KIND)
            .and_then(Value::as_i64)
            .and_then(local::NoteKind::from_code);
        if kind != Some(local::NoteKind::Note) {
            return Err(SyncError::Action(format!(
                "local representation is not a note row: {kind:?}"
            )));
        }

        let data = representation
            .get(local::DATA)
            .and_then(Value::as_array)
            .ok_or_else(|| SyncError::Action("local representation has no data rows".into()))?;
        for row in data {
            let mime = row.get(local::MIME_TYPE).and_then(Value::as_str);
            if mime == Some(local::MIME_TEXT_NOTE) {
                if let Some(content) = row.get(local::CONTENT).and_then(Value::as_str) {
                    self.fields.set_name(content);
                }
            }
        }

        self.fields.set_deleted(false);
        self.completed = false;
        Ok(())
    }

    fn to_local_json(&self) -> Option<Value> {
        if !self.is_worth_saving() {
            return None;
        }
        Some(json!({
            local::NOTE: {
                local::KIND: local::NoteKind::Note.code(),
            },
            local::DATA: [
                {
                    local::MIME_TYPE: local::MIME_TEXT_NOTE,
                    local::CONTENT: self.name(),
                }
            ],
        }))
    }
}
