use super::editors::{EditorsState, RevalidateError};
use crate::messages::{EditorStatePayload, ExternalMessage};
use crate::shared::store::{Store, Subscription};
use crate::snapshot::SerializedEditorState;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Identifies one full pull. Only the most recently issued token may
/// resolve the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevalidationToken(u64);

/// Panel-wide store of editor snapshots.
#[derive(Clone, Default)]
pub struct RootStore {
    store: Store<EditorsState>,
    latest_request: Arc<AtomicU64>,
}

impl RootStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<Arc<EditorsState>> {
        self.store.get()
    }

    pub fn subscribe(
        &self,
        callback: impl Fn() + Send + Sync + 'static,
    ) -> Subscription<EditorsState> {
        self.store.subscribe(callback)
    }

    /// Start a full pull: Loading on first use, otherwise the current state
    /// flagged as revalidating. Any earlier token becomes stale.
    pub fn begin_revalidate(&self) -> RevalidationToken {
        let token = RevalidationToken(self.latest_request.fetch_add(1, Ordering::SeqCst) + 1);
        let next = match self.store.get() {
            None => EditorsState::Loading,
            Some(state) => state.revalidating(),
        };
        log::info!("Revalidating editors (request {})", token.0);
        self.store.set(Arc::new(next));
        token
    }

    fn is_current(&self, token: RevalidationToken) -> bool {
        self.latest_request.load(Ordering::SeqCst) == token.0
    }

    /// Resolve the pull identified by `token`. Returns false when a newer
    /// pull has been issued since, in which case the result is dropped.
    pub fn finish_revalidate(
        &self,
        token: RevalidationToken,
        result: Result<Vec<SerializedEditorState>, RevalidateError>,
    ) -> bool {
        if !self.is_current(token) {
            log::debug!("Dropping stale revalidation result (request {})", token.0);
            return false;
        }

        let next = match result {
            Ok(snapshots) => {
                log::info!("Loaded {} editor(s)", snapshots.len());
                EditorsState::from_snapshots(snapshots)
            }
            Err(e) => {
                log::error!("Failed to load editors: {e}");
                let editors = self
                    .store
                    .get()
                    .and_then(|state| state.editors().cloned())
                    .unwrap_or_default();
                EditorsState::Resolved {
                    is_revalidating: false,
                    editors,
                    error: Some(e),
                }
            }
        };

        self.store.set(Arc::new(next));
        true
    }

    /// Fold one agent lifecycle message into the editor map. Messages are
    /// only applied to a settled, error-free state. Returns whether the
    /// store changed.
    pub fn apply_message(&self, message: ExternalMessage) -> bool {
        let Some(state) = self.store.get() else {
            return false;
        };
        let EditorsState::Resolved {
            is_revalidating: false,
            editors,
            error: None,
        } = state.as_ref()
        else {
            log::debug!("Ignoring {} while not settled", message.editor_id());
            return false;
        };

        let mut editors = editors.clone();
        match message {
            // Mounts start a new revision sequence and always replace the entry.
            ExternalMessage::EditorMounted(EditorStatePayload { id, state }) => {
                editors.insert(id, Arc::new(state));
            }
            ExternalMessage::EditorUpdated(EditorStatePayload { id, state }) => {
                let Some(existing) = editors.get(&id) else {
                    log::debug!("Ignoring update for unknown editor {id}");
                    return false;
                };
                if state.is_older_than(existing) {
                    log::debug!("Dropping out-of-order update for editor {id}");
                    return false;
                }
                editors.insert(id, Arc::new(state));
            }
            ExternalMessage::EditorUnmounted(payload) => {
                if editors.remove(&payload.id).is_none() {
                    return false;
                }
            }
        }

        self.store.set(Arc::new(EditorsState::resolved(editors)));
        true
    }
}
