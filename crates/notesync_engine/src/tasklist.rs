//! The TaskList node variant: an ordered collection of tasks
//! representing a folder.

use crate::error::{SyncError, SyncResult};
use crate::local;
use crate::node::{NodeFields, NodeKey, SyncNode};
use crate::task::Task;
use notesync_protocol::keys;
use serde_json::{json, Value};

/// An ordered collection of [`Task`]s, mirroring one remote list.
///
/// The child sequence is an insertion-order list, not a set; a task
/// appears in at most one list at a time (ownership enforces it) and
/// at most once per list (duplicates by key are rejected). Every
/// child except the head carries a prior-sibling link to its
/// immediate predecessor, kept consistent across add, remove, and
/// move.
#[derive(Debug, Clone, Default)]
pub struct TaskList {
    fields: NodeFields,
    index: i64,
    children: Vec<Task>,
}

impl TaskList {
    /// Creates an empty, never-synchronized list.
    pub fn new() -> Self {
        Self {
            fields: NodeFields::new(),
            index: 1,
            children: Vec::new(),
        }
    }

    /// Ordering hint among sibling lists.
    pub fn index(&self) -> i64 {
        self.index
    }

    /// Sets the ordering hint among sibling lists.
    pub fn set_index(&mut self, index: i64) {
        self.index = index;
    }

    /// Sets the display name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.fields.set_name(name);
    }

    /// Number of child tasks.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Iterates the child tasks in sequence order.
    pub fn children(&self) -> impl Iterator<Item = &Task> {
        self.children.iter()
    }

    /// Appends a task to the end of the sequence.
    ///
    /// Returns the task's key, or `None` if a child with the same
    /// key is already present (the duplicate is dropped).
    pub fn add_child(&mut self, mut task: Task) -> Option<NodeKey> {
        if self.position_of(task.key()).is_some() {
            tracing::warn!(key = %task.key(), "duplicate child rejected");
            return None;
        }
        task.set_prior_sibling(self.children.last().map(Task::key));
        let key = task.key();
        self.children.push(task);
        Some(key)
    }

    /// Inserts a task at the given position, re-linking the follower.
    pub fn insert_child(&mut self, position: usize, mut task: Task) -> Option<NodeKey> {
        if position > self.children.len() {
            tracing::warn!(position, "insert child: invalid position");
            return None;
        }
        if self.position_of(task.key()).is_some() {
            tracing::warn!(key = %task.key(), "duplicate child rejected");
            return None;
        }

        task.set_prior_sibling(position.checked_sub(1).map(|p| self.children[p].key()));
        let key = task.key();
        self.children.insert(position, task);
        if let Some(follower) = self.children.get_mut(position + 1) {
            follower.set_prior_sibling(Some(key));
        }
        Some(key)
    }

    /// Removes a task, re-linking its follower to its predecessor.
    pub fn remove_child(&mut self, key: NodeKey) -> Option<Task> {
        let position = self.position_of(key)?;
        let mut removed = self.children.remove(position);
        removed.set_prior_sibling(None);

        if let Some(follower_prior) = position.checked_sub(1).map(|p| self.children[p].key()) {
            if let Some(follower) = self.children.get_mut(position) {
                follower.set_prior_sibling(Some(follower_prior));
            }
        } else if let Some(new_head) = self.children.get_mut(0) {
            new_head.set_prior_sibling(None);
        }
        Some(removed)
    }

    /// Moves a child to the given position within this list.
    ///
    /// Returns false if the task is not a child or the position is
    /// out of range.
    pub fn move_child(&mut self, key: NodeKey, position: usize) -> bool {
        if position >= self.children.len() {
            tracing::warn!(position, "move child: invalid position");
            return false;
        }
        let Some(current) = self.position_of(key) else {
            tracing::warn!(%key, "move child: not a child of this list");
            return false;
        };
        if current == position {
            return true;
        }
        let Some(task) = self.remove_child(key) else {
            return false;
        };
        self.insert_child(position.min(self.children.len()), task)
            .is_some()
    }

    /// Position of a child in the sequence.
    pub fn position_of(&self, key: NodeKey) -> Option<usize> {
        self.children.iter().position(|child| child.key() == key)
    }

    /// Looks up a child by key.
    pub fn child_by_key(&self, key: NodeKey) -> Option<&Task> {
        self.children.iter().find(|child| child.key() == key)
    }

    /// Looks up a child by key, mutably.
    pub fn child_by_key_mut(&mut self, key: NodeKey) -> Option<&mut Task> {
        self.children.iter_mut().find(|child| child.key() == key)
    }

    /// Looks up a child by its remote id.
    pub fn child_by_remote_id(&self, remote_id: &str) -> Option<&Task> {
        self.children
            .iter()
            .find(|child| child.remote_id() == Some(remote_id))
    }

    /// Looks up a child by position.
    pub fn child_by_position(&self, position: usize) -> Option<&Task> {
        self.children.get(position)
    }

    /// The remote id of a child's ordering predecessor, if the child
    /// has one and the predecessor has been created remotely.
    pub fn prior_sibling_remote_id(&self, key: NodeKey) -> Option<String> {
        let prior_key = self.child_by_key(key)?.prior_sibling()?;
        self.child_by_key(prior_key)?.remote_id().map(str::to_owned)
    }
}

impl SyncNode for TaskList {
    fn fields(&self) -> &NodeFields {
        &self.fields
    }

    fn fields_mut(&mut self) -> &mut NodeFields {
        &mut self.fields
    }

    fn create_action(&self, action_id: u64, _parent: Option<&TaskList>) -> SyncResult<Value> {
        Ok(json!({
            keys::ACTION_TYPE: keys::ACTION_TYPE_CREATE,
            keys::ACTION_ID: action_id,
            keys::INDEX: self.index,
            keys::ENTITY_DELTA: {
                keys::NAME: self.name(),
                keys::CREATOR_ID: "null",
                keys::ENTITY_TYPE: keys::TYPE_GROUP,
            },
        }))
    }

    fn update_action(&self, action_id: u64) -> Value {
        json!({
            keys::ACTION_TYPE: keys::ACTION_TYPE_UPDATE,
            keys::ACTION_ID: action_id,
            keys::ID: self.remote_id(),
            keys::ENTITY_DELTA: {
                keys::NAME: self.name(),
                keys::DELETED: self.deleted(),
            },
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

        match kind {
            Some(local::NoteKind::Folder) => {
                let name = note
                    .get(local::SNIPPET)
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                self.fields
                    .set_name(format!("{}{}", local::FOLDER_PREFIX, name));
                Ok(())
            }
            Some(local::NoteKind::System) => {
                let id = note.get(local::ID).and_then(Value::as_i64);
                if id == Some(local::ROOT_FOLDER_ID) {
                    self.fields.set_name(format!(
                        "{}{}",
                        local::FOLDER_PREFIX,
                        local::FOLDER_DEFAULT
                    ));
                    Ok(())
                } else {
                    Err(SyncError::Action(format!(
                        "unknown system folder id {id:?}"
                    )))
                }
            }
            _ => Err(SyncError::Action(format!(
                "local representation is not a folder row: {kind:?}"
            ))),
        }
    }

    fn to_local_json(&self) -> Option<Value> {
        let folder_name = self
            .name()
            .strip_prefix(local::FOLDER_PREFIX)
            .unwrap_or_else(|| self.name());
        let kind = if folder_name == local::FOLDER_DEFAULT {
            local::NoteKind::System
        } else {
            local::NoteKind::Folder
        };
        Some(json!({
            local::NOTE: {
                local::SNIPPET: folder_name,
                local::KIND: kind.code(),
            },
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn named_task(name: &str) -> Task {
        let mut task = Task::new();
        task.set_name(name);
        task
    }

    /// Asserts the chain invariant: exactly one head, and
    /// every child reaches the head through prior-sibling links in at
    /// most `len` steps.
    fn assert_single_chain(list: &TaskList) {
        let heads = list
            .children()
            .filter(|child| child.prior_sibling().is_none())
            .count();
        if list.child_count() == 0 {
            assert_eq!(heads, 0);
            return;
        }
        assert_eq!(heads, 1, "exactly one head expected");

        for child in list.children() {
            let mut cursor = child.key();
            let mut steps = 0;
            while let Some(prior) = list.child_by_key(cursor).unwrap().prior_sibling() {
                cursor = prior;
                steps += 1;
                assert!(steps <= list.child_count(), "cycle in prior-sibling chain");
            }
            assert!(list.child_by_key(cursor).unwrap().prior_sibling().is_none());
        }

        // Links agree with sequence order.
        let child_keys: Vec<_> = list.children().map(Task::key).collect();
        for (position, child) in list.children().enumerate() {
            let expected = position.checked_sub(1).map(|p| child_keys[p]);
            assert_eq!(child.prior_sibling(), expected);
        }
    }

    #[test]
    fn add_links_to_previous_tail() {
        let mut list = TaskList::new();
        let a = list.add_child(named_task("a")).unwrap();
        let b = list.add_child(named_task("b")).unwrap();

        assert_eq!(list.child_by_key(a).unwrap().prior_sibling(), None);
        assert_eq!(list.child_by_key(b).unwrap().prior_sibling(), Some(a));
        assert_single_chain(&list);
    }

    #[test]
    fn duplicate_child_is_rejected() {
        let mut list = TaskList::new();
        let task = named_task("a");
        let duplicate = task.clone();
        assert!(list.add_child(task).is_some());
        assert!(list.add_child(duplicate).is_none());
        assert_eq!(list.child_count(), 1);
    }

    #[test]
    fn remove_relinks_follower() {
        let mut list = TaskList::new();
        let a = list.add_child(named_task("a")).unwrap();
        let b = list.add_child(named_task("b")).unwrap();
        let c = list.add_child(named_task("c")).unwrap();

        let removed = list.remove_child(b).unwrap();
        assert_eq!(removed.prior_sibling(), None);
        assert_eq!(list.child_by_key(c).unwrap().prior_sibling(), Some(a));
        assert_single_chain(&list);

        // Removing the head promotes the follower.
        list.remove_child(a).unwrap();
        assert_eq!(list.child_by_key(c).unwrap().prior_sibling(), None);
        assert_single_chain(&list);
    }

    #[test]
    fn insert_at_head_and_middle() {
        let mut list = TaskList::new();
        let a = list.add_child(named_task("a")).unwrap();
        let c = list.add_child(named_task("c")).unwrap();

        let b = list.insert_child(1, named_task("b")).unwrap();
        assert_eq!(list.position_of(b), Some(1));
        assert_eq!(list.child_by_key(b).unwrap().prior_sibling(), Some(a));
        assert_eq!(list.child_by_key(c).unwrap().prior_sibling(), Some(b));

        let head = list.insert_child(0, named_task("head")).unwrap();
        assert_eq!(list.child_by_key(head).unwrap().prior_sibling(), None);
        assert_eq!(list.child_by_key(a).unwrap().prior_sibling(), Some(head));
        assert_single_chain(&list);
    }

    #[test]
    fn move_within_list() {
        let mut list = TaskList::new();
        let a = list.add_child(named_task("a")).unwrap();
        let b = list.add_child(named_task("b")).unwrap();
        let c = list.add_child(named_task("c")).unwrap();

        assert!(list.move_child(c, 0));
        assert_eq!(list.position_of(c), Some(0));
        assert_single_chain(&list);

        assert!(list.move_child(a, 2));
        assert_eq!(
            list.children().map(|t| t.key()).collect::<Vec<_>>(),
            vec![c, b, a]
        );
        assert_single_chain(&list);

        // No-op move.
        assert!(list.move_child(b, 1));
        assert_single_chain(&list);

        // Out-of-range and foreign keys are rejected.
        assert!(!list.move_child(b, 9));
        assert!(!list.move_child(NodeKey::new_v4(), 0));
    }

    #[test]
    fn prior_sibling_remote_id_needs_created_sibling() {
        let mut list = TaskList::new();
        let mut first = named_task("a");
        first.set_remote_id("task-a".to_owned());
        let a = list.add_child(first).unwrap();
        let b = list.add_child(named_task("b")).unwrap();
        let c = list.add_child(named_task("c")).unwrap();

        assert_eq!(list.prior_sibling_remote_id(a), None);
        assert_eq!(list.prior_sibling_remote_id(b), Some("task-a".to_owned()));
        // b has no remote id yet, so c's predecessor is unknown.
        assert_eq!(list.prior_sibling_remote_id(c), None);
    }

    #[test]
    fn create_and_update_action_shape() {
        let mut list = TaskList::new();
        list.set_name("[notesync]Groceries");
        list.set_index(3);

        let create = list.create_action(1, None).unwrap();
        assert_eq!(create[keys::ACTION_TYPE], keys::ACTION_TYPE_CREATE);
        assert_eq!(create[keys::INDEX], 3);
        assert_eq!(create[keys::ENTITY_DELTA][keys::ENTITY_TYPE], keys::TYPE_GROUP);
        assert_eq!(create[keys::ENTITY_DELTA][keys::NAME], "[notesync]Groceries");

        list.set_remote_id("list-7".to_owned());
        list.set_deleted(true);
        let update = list.update_action(2);
        assert_eq!(update[keys::ID], "list-7");
        assert_eq!(update[keys::ENTITY_DELTA][keys::DELETED], true);
    }

    #[test]
    fn local_folder_representation_round_trip() {
        let mut list = TaskList::new();
        list.apply_local_json(&json!({
            local::NOTE: { local::KIND: 1, local::SNIPPET: "Groceries", local::ID: 12 },
        }))
        .unwrap();
        assert_eq!(list.name(), "[notesync]Groceries");

        let representation = list.to_local_json().unwrap();
        assert_eq!(representation[local::NOTE][local::SNIPPET], "Groceries");
        assert_eq!(
            representation[local::NOTE][local::KIND],
            local::NoteKind::Folder.code()
        );
    }

    #[test]
    fn root_folder_maps_to_default_list() {
        let mut list = TaskList::new();
        list.apply_local_json(&json!({
            local::NOTE: { local::KIND: 2, local::ID: local::ROOT_FOLDER_ID },
        }))
        .unwrap();
        assert_eq!(list.name(), "[notesync]Default");

        let representation = list.to_local_json().unwrap();
        assert_eq!(
            representation[local::NOTE][local::KIND],
            local::NoteKind::System.code()
        );
    }

    #[test]
    fn unknown_system_folder_is_rejected() {
        let mut list = TaskList::new();
        let err = list.apply_local_json(&json!({
            local::NOTE: { local::KIND: 2, local::ID: 99 },
        }));
        assert!(matches!(err, Err(SyncError::Action(_))));
    }

    #[test]
    fn remote_descriptor_application() {
        let mut list = TaskList::new();
        list.apply_remote_json(&json!({
            "id": "list-1",
            "name": "[notesync]Groceries",
            "last_modified": 77,
        }))
        .unwrap();
        assert_eq!(list.remote_id(), Some("list-1"));
        assert_eq!(list.last_modified(), 77);
        assert_eq!(list.name(), "[notesync]Groceries");
    }

    proptest! {
        /// After any sequence of add/remove/move operations the
        /// prior-sibling links stay a single acyclic chain matching
        /// the sequence order.
        #[test]
        fn chain_invariant_holds_under_random_edits(ops in prop::collection::vec((0u8..3, 0usize..8), 0..40)) {
            let mut list = TaskList::new();
            let mut serial = 0u32;
            for (op, position) in ops {
                match op {
                    0 => {
                        serial += 1;
                        let position = position.min(list.child_count());
                        list.insert_child(position, named_task(&format!("t{serial}")));
                    }
                    1 => {
                        if list.child_count() > 0 {
                            let key = list
                                .child_by_position(position % list.child_count())
                                .unwrap()
                                .key();
                            list.remove_child(key);
                        }
                    }
                    _ => {
                        if list.child_count() > 0 {
                            let from = position % list.child_count();
                            let to = (position / 2) % list.child_count();
                            let key = list.child_by_position(from).unwrap().key();
                            list.move_child(key, to);
                        }
                    }
                }
                assert_single_chain(&list);
            }
        }
    }
}
