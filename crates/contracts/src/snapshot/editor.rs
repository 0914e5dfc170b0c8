use super::node::SerializedNode;
use super::selection::SerializedSelection;
use serde::{Deserialize, Serialize};

/// Schema version stamped on every snapshot.
pub const SNAPSHOT_VERSION: f64 = 0.1;

/// Immutable snapshot of one editor instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedEditorState {
    pub id: String,
    pub namespace: String,
    pub root: SerializedNode,
    pub selection: Option<SerializedSelection>,
    pub version: f64,
    /// Monotonic counter stamped by the agent; absent on snapshots from older agents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<u64>,
}

impl SerializedEditorState {
    /// Whether this snapshot was taken before `current`. Snapshots without a
    /// revision are never considered older.
    pub fn is_older_than(&self, current: &SerializedEditorState) -> bool {
        matches!(
            (self.revision, current.revision),
            (Some(incoming), Some(existing)) if incoming < existing
        )
    }
}
