//! JSON key constants of the remote service's batched action-list
//! wire format.
//!
//! Every request is a single object carrying an `action_list` array
//! and a `client_version`; each element of the array is one per-entity
//! action object keyed by the constants below.

/// Per-request, client-assigned monotonically increasing action id.
pub const ACTION_ID: &str = "action_id";

/// The array of per-entity action objects inside one request.
pub const ACTION_LIST: &str = "action_list";

/// Discriminator of an action object.
pub const ACTION_TYPE: &str = "action_type";

/// `action_type` value: create a new entity.
pub const ACTION_TYPE_CREATE: &str = "create";

/// `action_type` value: enumerate all tasks of a list.
pub const ACTION_TYPE_GETALL: &str = "get_all";

/// `action_type` value: move a task between or within lists.
pub const ACTION_TYPE_MOVE: &str = "move";

/// `action_type` value: update fields of an existing entity.
pub const ACTION_TYPE_UPDATE: &str = "update";

/// Creator field inside an entity delta; the service expects the
/// literal string `"null"` for client-created entities.
pub const CREATOR_ID: &str = "creator_id";

/// Numeric protocol version scraped from the login response.
pub const CLIENT_VERSION: &str = "client_version";

/// Completion flag on a task entity.
pub const COMPLETED: &str = "completed";

/// Tombstone flag on an entity delta.
pub const DELETED: &str = "deleted";

/// Destination list of a cross-list move.
pub const DEST_LIST: &str = "dest_list";

/// Destination parent of a move.
pub const DEST_PARENT: &str = "dest_parent";

/// Entity type of a move destination parent.
pub const DEST_PARENT_TYPE: &str = "dest_parent_type";

/// Partial field set carried by create and update actions.
pub const ENTITY_DELTA: &str = "entity_delta";

/// Entity-type discriminator inside a delta.
pub const ENTITY_TYPE: &str = "entity_type";

/// Whether a `get_all` should include tombstoned tasks.
pub const GET_DELETED: &str = "get_deleted";

/// Remote identity of an existing entity.
pub const ID: &str = "id";

/// Ordering hint among sibling lists.
pub const INDEX: &str = "index";

/// Service-assigned modification stamp on an entity.
pub const LAST_MODIFIED: &str = "last_modified";

/// Target list of a `get_all` action.
pub const LIST_ID: &str = "list_id";

/// Array of remote list descriptors in the setup payload.
pub const LISTS: &str = "lists";

/// Display name of an entity.
pub const NAME: &str = "name";

/// Service-assigned identity returned by a create result.
pub const NEW_ID: &str = "new_id";

/// Free-form text content of a task.
pub const NOTES: &str = "notes";

/// Owning list of a task create action.
pub const PARENT_ID: &str = "parent_id";

/// Ordering predecessor of a task within its list.
pub const PRIOR_SIBLING_ID: &str = "prior_sibling_id";

/// Per-action results array of a mutation response.
pub const RESULTS: &str = "results";

/// Source list of a move action.
pub const SOURCE_LIST: &str = "source_list";

/// Array of remote task descriptors in a `get_all` response.
pub const TASKS: &str = "tasks";

/// `entity_type` value for a list.
pub const TYPE_GROUP: &str = "GROUP";

/// `entity_type` value for a task.
pub const TYPE_TASK: &str = "TASK";

/// Key of the per-user state object inside the setup payload.
pub const SETUP_USER_STATE: &str = "t";

/// Key of the protocol version inside the setup payload.
pub const SETUP_VERSION: &str = "v";
