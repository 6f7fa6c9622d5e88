//! Local-store JSON representation.
//!
//! The local persistent store is out of scope for this crate; the
//! orchestrator hands nodes their local state as a JSON object with a
//! `note` row and a `data` array, and reads the same shape back. The
//! key names and note kinds here are that boundary contract.

/// Key of the note-row object inside a local representation.
pub const NOTE: &str = "note";

/// Key of the data-row array inside a local representation.
pub const DATA: &str = "data";

/// Local row id of a note or data row.
pub const ID: &str = "id";

/// Note kind column, one of [`NoteKind`].
pub const KIND: &str = "type";

/// Display text of a note row (a folder's name, a note's first line).
pub const SNIPPET: &str = "snippet";

/// Local row id of a note's parent folder.
pub const PARENT_ID: &str = "parent_id";

/// MIME type of a data row.
pub const MIME_TYPE: &str = "mime_type";

/// Text content of a data row.
pub const CONTENT: &str = "content";

/// MIME type of plain note text.
pub const MIME_TEXT_NOTE: &str = "vnd.notesync.note/text_note";

/// Prefix stamped on the remote name of every synchronized folder
/// list, so locally-created folders can be told apart from foreign
/// remote lists.
pub const FOLDER_PREFIX: &str = "[notesync]";

/// Remote name of the list mirroring the local root folder.
pub const FOLDER_DEFAULT: &str = "Default";

/// Remote name of the list holding MetaData sentinel tasks.
pub const FOLDER_META: &str = "METADATA";

/// Display name of every MetaData sentinel task.
pub const META_NOTE_NAME: &str = "[META INFO] DON'T UPDATE AND DELETE";

/// Key of the back-reference inside a MetaData payload.
pub const META_RELATED_ID: &str = "meta_related_id";

/// Local row id of the root folder.
pub const ROOT_FOLDER_ID: i64 = 0;

/// Kind of a local note row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteKind {
    /// A plain note, synchronized as a task.
    Note,
    /// A user-created folder, synchronized as a list.
    Folder,
    /// A system folder (the root folder), synchronized as the
    /// default list.
    System,
}

impl NoteKind {
    /// Wire value of this kind in the local representation.
    pub fn code(self) -> i64 {
        match self {
            NoteKind::Note => 0,
            NoteKind::Folder => 1,
            NoteKind::System => 2,
        }
    }

    /// Parses a wire value back into a kind.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(NoteKind::Note),
            1 => Some(NoteKind::Folder),
            2 => Some(NoteKind::System),
            _ => None,
        }
    }
}
