use crate::snapshot::SerializedEditorState;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

/// Known editors keyed by id.
pub type EditorMap = BTreeMap<String, Arc<SerializedEditorState>>;

/// Why a full pull of editor snapshots failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RevalidateError {
    #[error("could not run the snapshot query in the inspected page: {0}")]
    Injection(String),
    #[error("inspected page returned malformed snapshots: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for RevalidateError {
    fn from(e: serde_json::Error) -> Self {
        RevalidateError::Malformed(e.to_string())
    }
}

/// Payload of the panel's root store.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorsState {
    /// First pull still in flight; nothing to show yet.
    Loading,
    Resolved {
        is_revalidating: bool,
        editors: EditorMap,
        error: Option<RevalidateError>,
    },
}

impl EditorsState {
    pub fn resolved(editors: EditorMap) -> Self {
        EditorsState::Resolved {
            is_revalidating: false,
            editors,
            error: None,
        }
    }

    pub fn from_snapshots(snapshots: Vec<SerializedEditorState>) -> Self {
        Self::resolved(
            snapshots
                .into_iter()
                .map(|state| (state.id.clone(), Arc::new(state)))
                .collect(),
        )
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, EditorsState::Loading)
    }

    pub fn is_revalidating(&self) -> bool {
        match self {
            EditorsState::Loading => true,
            EditorsState::Resolved { is_revalidating, .. } => *is_revalidating,
        }
    }

    pub fn editors(&self) -> Option<&EditorMap> {
        match self {
            EditorsState::Loading => None,
            EditorsState::Resolved { editors, .. } => Some(editors),
        }
    }

    pub fn error(&self) -> Option<&RevalidateError> {
        match self {
            EditorsState::Loading => None,
            EditorsState::Resolved { error, .. } => error.as_ref(),
        }
    }

    pub fn editor(&self, id: &str) -> Option<&Arc<SerializedEditorState>> {
        self.editors().and_then(|editors| editors.get(id))
    }

    /// Same state flagged as revalidating; the editor map and any error are
    /// kept.
    pub fn revalidating(&self) -> Self {
        match self {
            EditorsState::Loading => EditorsState::Loading,
            EditorsState::Resolved { editors, error, .. } => EditorsState::Resolved {
                is_revalidating: true,
                editors: editors.clone(),
                error: error.clone(),
            },
        }
    }
}
