use super::transport;
use contracts::messages::ExternalMessage;
use contracts::shared::store::Subscription;
use contracts::snapshot::SerializedEditorState;
use contracts::state::{EditorsState, RootStore};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::sync::Arc;

/// The panel's single [`RootStore`], bridged into Leptos reactivity: every
/// store notification bumps `version`, so readers that go through
/// [`RootStoreContext::state`] re-run.
#[derive(Clone)]
pub struct RootStoreContext {
    store: RootStore,
    version: RwSignal<u64>,
    _subscription: StoredValue<Subscription<EditorsState>>,
}

impl RootStoreContext {
    pub fn new() -> Self {
        let store = RootStore::new();
        let version = RwSignal::new(0u64);
        let subscription = store.subscribe(move || version.update(|v| *v += 1));

        Self {
            store,
            version,
            _subscription: StoredValue::new(subscription),
        }
    }

    /// Current store payload; tracked.
    pub fn state(&self) -> Option<Arc<EditorsState>> {
        self.version.track();
        self.store.get()
    }

    /// Editor snapshots in map order. Only notifies when an entry was
    /// replaced, added or removed, not on revalidation flag flips.
    pub fn editors(&self) -> Memo<Vec<Arc<SerializedEditorState>>> {
        let ctx = self.clone();
        Memo::new_with_compare(
            move |_| {
                ctx.state()
                    .and_then(|state| state.editors().map(|editors| editors.values().cloned().collect()))
                    .unwrap_or_default()
            },
            snapshots_changed,
        )
    }

    pub fn state_untracked(&self) -> Option<Arc<EditorsState>> {
        self.store.get()
    }

    /// Pull every editor snapshot from the inspected page. A newer call
    /// supersedes any pull still in flight.
    pub fn revalidate(&self) {
        let store = self.store.clone();
        let token = store.begin_revalidate();
        spawn_local(async move {
            let result = transport::pull_all_editor_snapshots().await;
            store.finish_revalidate(token, result);
        });
    }

    pub fn apply_message(&self, message: ExternalMessage) {
        self.store.apply_message(message);
    }
}

impl Default for RootStoreContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshots are immutable, so a list changed only when some entry is a
/// different allocation.
pub fn snapshots_changed(
    prev: Option<&Vec<Arc<SerializedEditorState>>>,
    next: Option<&Vec<Arc<SerializedEditorState>>>,
) -> bool {
    match (prev, next) {
        (Some(prev), Some(next)) => {
            prev.len() != next.len() || prev.iter().zip(next).any(|(a, b)| !Arc::ptr_eq(a, b))
        }
        _ => true,
    }
}

/// Single-snapshot counterpart of [`snapshots_changed`].
pub fn snapshot_changed(
    prev: Option<&Option<Arc<SerializedEditorState>>>,
    next: Option<&Option<Arc<SerializedEditorState>>>,
) -> bool {
    match (prev, next) {
        (Some(Some(prev)), Some(Some(next))) => !Arc::ptr_eq(prev, next),
        (Some(None), Some(None)) => false,
        _ => true,
    }
}

pub fn use_root_store() -> RootStoreContext {
    use_context::<RootStoreContext>()
        .expect("RootStoreContext not found. Provide it from the panel App.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot(id: &str, namespace: &str) -> SerializedEditorState {
        serde_json::from_value(json!({
            "id": id,
            "namespace": namespace,
            "version": 0.1,
            "selection": null,
            "root": { "group": "root", "key": "root", "type": "root", "meta": {}, "children": [] }
        }))
        .unwrap()
    }

    fn listed(store: &RootStore) -> Vec<Arc<SerializedEditorState>> {
        store
            .get()
            .and_then(|state| state.editors().map(|editors| editors.values().cloned().collect()))
            .unwrap_or_default()
    }

    fn current(store: &RootStore, id: &str) -> Option<Arc<SerializedEditorState>> {
        store.get().and_then(|state| state.editor(id).cloned())
    }

    #[test]
    fn test_update_of_other_editor_keeps_snapshot_identity() {
        let store = RootStore::new();
        let token = store.begin_revalidate();
        store.finish_revalidate(token, Ok(vec![snapshot("a", "one"), snapshot("b", "one")]));
        let before = current(&store, "a");
        let list_before = listed(&store);

        store.apply_message(ExternalMessage::updated(snapshot("b", "two")));

        assert!(!snapshot_changed(Some(&before), Some(&current(&store, "a"))));
        assert!(snapshots_changed(Some(&list_before), Some(&listed(&store))));
    }

    #[test]
    fn test_revalidating_flag_keeps_list_identity() {
        let store = RootStore::new();
        let token = store.begin_revalidate();
        store.finish_revalidate(token, Ok(vec![snapshot("a", "one")]));
        let before = listed(&store);

        store.begin_revalidate();

        assert!(!snapshots_changed(Some(&before), Some(&listed(&store))));
    }

    #[test]
    fn test_same_editor_update_is_a_change() {
        let store = RootStore::new();
        let token = store.begin_revalidate();
        store.finish_revalidate(token, Ok(vec![snapshot("a", "one")]));
        let before = current(&store, "a");

        store.apply_message(ExternalMessage::updated(snapshot("a", "two")));

        assert!(snapshot_changed(Some(&before), Some(&current(&store, "a"))));
        assert!(snapshot_changed(None, Some(&None)));
        assert!(!snapshot_changed(Some(&None), Some(&None)));
    }
}
