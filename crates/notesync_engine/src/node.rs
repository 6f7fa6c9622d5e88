//! The sync node model and the per-entity sync-action resolver.

use crate::error::{SyncError, SyncResult};
use crate::tasklist::TaskList;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Stable in-memory key of a node, used for weak references between
/// nodes (a task's prior sibling) without a second owning pointer.
pub type NodeKey = Uuid;

/// The outcome of resolving one entity's sync state.
///
/// Outcomes are mutually exclusive; there is no precedence order
/// among them. The resolver only ever produces a subset
/// (`AddLocal` and `UpdateConflict` exist for the orchestrator's
/// vocabulary when it walks the remote side).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncAction {
    /// No change on either side.
    None,
    /// The entity has never been created remotely.
    AddRemote,
    /// The entity exists remotely but not locally.
    AddLocal,
    /// The entity was deleted locally; delete it remotely.
    DelRemote,
    /// The entity was deleted remotely; delete it locally.
    DelLocal,
    /// Push the local state to the remote service.
    UpdateRemote,
    /// Pull the remote state into the local store.
    UpdateLocal,
    /// Both sides changed and no automatic policy applies.
    UpdateConflict,
    /// The entity cannot be synchronized automatically.
    Error,
}

/// A row snapshot from the local store, as the orchestrator read it
/// at the start of the pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalSnapshot {
    /// Local row id.
    pub local_id: i64,
    /// True if the row changed locally since the last successful sync.
    pub dirty: bool,
    /// The remote `last_modified` value observed at the previous
    /// successful sync.
    pub sync_marker: i64,
    /// The remote id recorded in the local store, if any.
    pub remote_id: Option<String>,
    /// True if the row is tombstoned locally.
    pub deleted: bool,
}

/// Fields shared by every node variant.
///
/// `last_modified` always holds the last known remote value, never a
/// local clock reading.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeFields {
    remote_id: Option<String>,
    name: String,
    last_modified: i64,
    deleted: bool,
}

impl NodeFields {
    /// Creates empty fields for a never-synchronized entity.
    pub fn new() -> Self {
        Self::default()
    }

    /// The remote identity, absent until the first successful create.
    pub fn remote_id(&self) -> Option<&str> {
        self.remote_id.as_deref()
    }

    /// Assigns the remote identity. Once set it never changes for the
    /// entity's lifetime; reassigning a different id is a defect.
    pub fn set_remote_id(&mut self, remote_id: impl Into<String>) {
        let remote_id = remote_id.into();
        debug_assert!(
            self.remote_id
                .as_ref()
                .map_or(true, |current| *current == remote_id),
            "remote id is immutable once assigned"
        );
        self.remote_id = Some(remote_id);
    }

    /// The display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the display name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// The service-assigned modification stamp.
    pub fn last_modified(&self) -> i64 {
        self.last_modified
    }

    /// Records a modification stamp received from the service.
    pub fn set_last_modified(&mut self, last_modified: i64) {
        self.last_modified = last_modified;
    }

    /// The tombstone flag.
    pub fn deleted(&self) -> bool {
        self.deleted
    }

    /// Sets the tombstone flag.
    pub fn set_deleted(&mut self, deleted: bool) {
        self.deleted = deleted;
    }
}

/// Capability set of a synchronizable entity.
///
/// Implemented by [`Task`](crate::Task), [`TaskList`](crate::TaskList)
/// and [`MetaData`](crate::MetaData). Variants compose a
/// [`NodeFields`] rather than inheriting from a collection base.
pub trait SyncNode {
    /// Shared field access.
    fn fields(&self) -> &NodeFields;

    /// Shared mutable field access.
    fn fields_mut(&mut self) -> &mut NodeFields;

    /// Builds the wire action that creates this entity remotely.
    ///
    /// Tasks need their owning list for position and identity
    /// context; lists ignore `parent`.
    fn create_action(&self, action_id: u64, parent: Option<&TaskList>) -> SyncResult<Value>;

    /// Builds the wire action that updates (or tombstones) this
    /// entity remotely.
    fn update_action(&self, action_id: u64) -> Value;

    /// Applies a remote descriptor to this node's fields. Absent
    /// fields are left untouched.
    fn apply_remote_json(&mut self, descriptor: &Value) -> SyncResult<()>;

    /// Applies a local-store representation to this node's content.
    fn apply_local_json(&mut self, representation: &Value) -> SyncResult<()>;

    /// Produces the local-store representation of this node's
    /// content, or `None` if it cannot be represented.
    fn to_local_json(&self) -> Option<Value>;

    /// Resolves which sync action this entity needs, comparing the
    /// node's remote-derived state against the local snapshot.
    fn resolve_sync_action(&self, snapshot: &LocalSnapshot) -> SyncAction {
        resolve(self.fields(), snapshot)
    }

    /// The remote identity, absent until the first successful create.
    fn remote_id(&self) -> Option<&str> {
        self.fields().remote_id()
    }

    /// Assigns the remote identity.
    fn set_remote_id(&mut self, remote_id: String) {
        self.fields_mut().set_remote_id(remote_id);
    }

    /// The display name.
    fn name(&self) -> &str {
        self.fields().name()
    }

    /// The last known remote modification stamp.
    fn last_modified(&self) -> i64 {
        self.fields().last_modified()
    }

    /// The tombstone flag.
    fn deleted(&self) -> bool {
        self.fields().deleted()
    }

    /// Sets the tombstone flag.
    fn set_deleted(&mut self, deleted: bool) {
        self.fields_mut().set_deleted(deleted);
    }

    /// Returns true if the orchestrator should persist this node at
    /// all. Nodes with no content are skipped.
    fn is_worth_saving(&self) -> bool {
        !self.fields().name().trim().is_empty()
    }
}

/// The per-entity sync-action resolver.
///
/// Total over its inputs: every combination of snapshot and node
/// state maps to exactly one action, never a fault.
pub fn resolve(fields: &NodeFields, snapshot: &LocalSnapshot) -> SyncAction {
    // Never created remotely: nothing else matters.
    if fields.remote_id().map_or(true, str::is_empty) {
        return SyncAction::AddRemote;
    }

    if snapshot.deleted {
        return SyncAction::DelRemote;
    }
    if fields.deleted() {
        return SyncAction::DelLocal;
    }

    if !snapshot.dirty {
        if snapshot.sync_marker == fields.last_modified() {
            // No update on either side.
            SyncAction::None
        } else {
            // Remote moved ahead; pull it into the local store.
            SyncAction::UpdateLocal
        }
    } else {
        if snapshot.remote_id.as_deref() != fields.remote_id() {
            let err = SyncError::Identity {
                local: snapshot.remote_id.clone().unwrap_or_default(),
                remote: fields.remote_id().unwrap_or_default().to_owned(),
            };
            tracing::error!(error = %err, local_id = snapshot.local_id, "excluding entity from sync");
            return SyncAction::Error;
        }
        if snapshot.sync_marker != fields.last_modified() {
            // Both sides changed. Policy is local-wins: the local
            // edit is pushed and the remote edit is overwritten.
            tracing::debug!(local_id = snapshot.local_id, "conflict, applying local modification");
        }
        // Otherwise only the local side changed; either way the
        // outcome is the same push.
        SyncAction::UpdateRemote
    }
}
