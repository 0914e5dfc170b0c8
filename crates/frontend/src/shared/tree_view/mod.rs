//! Generic tree view over string keys.
//!
//! Components receive a [`TreeViewHandle`] and the ancestor keys of the item
//! they belong to as props; the selection/collapse rules themselves live in
//! `contracts::tree`.

pub mod components;

pub use components::{TreeGroup, TreeItem, TreeItemText, TreeRoot, TreeTrigger};

use contracts::tree::{Navigation, TreeNode, TreeViewState};
use leptos::html::Div;
use leptos::prelude::*;
use std::collections::HashMap;

/// Shared, externally owned state of one tree view.
#[derive(Clone, Copy)]
pub struct TreeViewHandle {
    pub state: RwSignal<TreeViewState>,
    selectable: bool,
}

impl TreeViewHandle {
    pub fn new(state: RwSignal<TreeViewState>) -> Self {
        Self {
            state,
            selectable: true,
        }
    }

    /// A view that only tracks collapse state; clicks never select.
    pub fn collapse_only(state: RwSignal<TreeViewState>) -> Self {
        Self {
            state,
            selectable: false,
        }
    }

    pub fn is_selectable(&self) -> bool {
        self.selectable
    }

    pub fn is_selected(&self, key: &str) -> bool {
        self.selectable && self.state.with(|state| state.is_selected(key))
    }

    pub fn is_collapsed(&self, key: &str) -> bool {
        self.state.with(|state| state.is_collapsed(key))
    }

    pub fn select(&self, key: &str) {
        if self.selectable {
            self.state.maybe_update(|state| state.select(key));
        }
    }

    pub fn collapse(&self, key: &str) {
        self.state.maybe_update(|state| state.collapse(key));
    }

    pub fn expand(&self, key: &str, ancestors: &[String]) {
        self.state.maybe_update(|state| state.expand(key, ancestors));
    }

    pub fn toggle(&self, key: &str, ancestors: &[String]) {
        self.state.maybe_update(|state| state.toggle(key, ancestors));
    }

    /// Select `key` in `tree` and expand everything above it.
    pub fn reveal<N: TreeNode>(&self, tree: &N, key: &str) {
        self.state.maybe_update(|state| state.reveal(tree, key));
    }

    pub fn apply(&self, navigation: &Navigation) {
        self.state.maybe_update(|state| state.apply(navigation));
    }

    /// Remember `key` as the roving tab stop, also in collapse-only views
    /// where it is never shown as selected.
    pub fn set_active(&self, key: &str) {
        self.state.maybe_update(|state| state.select(key));
    }
}

/// Row elements by item key, for moving focus on arrow keys.
#[derive(Clone, Copy)]
pub struct RowRegistry {
    rows: StoredValue<HashMap<String, (u64, NodeRef<Div>)>>,
    next_id: StoredValue<u64>,
}

impl RowRegistry {
    pub fn new() -> Self {
        Self {
            rows: StoredValue::new(HashMap::new()),
            next_id: StoredValue::new(0),
        }
    }

    /// Register `row` under `key` until the calling component is disposed.
    /// A later registration of the same key wins over an earlier cleanup.
    pub fn register(&self, key: String, row: NodeRef<Div>) {
        let id = self.next_id.with_value(|id| *id);
        self.next_id.update_value(|next| *next += 1);
        self.rows.update_value(|rows| {
            rows.insert(key.clone(), (id, row));
        });

        let rows = self.rows;
        on_cleanup(move || {
            rows.update_value(|rows| {
                if rows.get(&key).is_some_and(|(current, _)| *current == id) {
                    rows.remove(&key);
                }
            });
        });
    }

    pub fn focus(&self, key: &str) {
        let Some(row) = self.rows.with_value(|rows| rows.get(key).map(|(_, row)| *row)) else {
            return;
        };
        if let Some(element) = row.get_untracked() {
            if let Err(e) = element.focus() {
                log::debug!("Could not focus row {key}: {e:?}");
            }
        }
    }
}

impl Default for RowRegistry {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn state_attr(is_collapsed: bool) -> &'static str {
    if is_collapsed {
        "closed"
    } else {
        "open"
    }
}

/// `aria-expanded` is only meaningful on items that own a group.
pub(crate) fn aria_expanded(expandable: bool, is_collapsed: bool) -> Option<&'static str> {
    expandable.then_some(if is_collapsed { "false" } else { "true" })
}
