use crate::shared::tree_view::TreeViewHandle;
use contracts::config::config;
use contracts::tree::TreeViewState;
use leptos::prelude::*;

/// Panel-wide UI state shared by the header, the node tree and the sidebar.
#[derive(Clone, Copy)]
pub struct PanelContext {
    pub sidebar_open: RwSignal<bool>,
    /// Id of the editor picked in the header; may briefly name an editor
    /// that has gone away.
    pub selected_editor: RwSignal<String>,
    /// Node tree selection/collapse state, shared with the selection panel.
    pub node_tree: RwSignal<TreeViewState>,
}

impl PanelContext {
    pub fn new() -> Self {
        let panel = &config().panel;
        Self {
            sidebar_open: RwSignal::new(panel.sidebar_open),
            selected_editor: RwSignal::new(String::new()),
            node_tree: RwSignal::new(TreeViewState::new(vec![panel.initial_selection.clone()], Vec::new())),
        }
    }

    pub fn node_tree_handle(&self) -> TreeViewHandle {
        TreeViewHandle::new(self.node_tree)
    }

    pub fn toggle_sidebar(&self) {
        self.sidebar_open.update(|open| *open = !*open);
    }
}

impl Default for PanelContext {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_panel_context() -> PanelContext {
    use_context::<PanelContext>().expect("PanelContext not found. Provide it from the panel App.")
}
