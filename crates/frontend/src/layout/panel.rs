use crate::layout::global_context::use_panel_context;
use crate::layout::header::Header;
use crate::layout::screens::EmptyScreen;
use crate::layout::sidebar::Sidebar;
use crate::layout::Shell;
use crate::shared::json_tree::JsonTree;
use crate::shared::node_tree::NodeTree;
use crate::shared::root_store::snapshot_changed;
use crate::shared::selection_panel::SelectionPanel;
use contracts::snapshot::{JsonObject, SerializedEditorState};
use contracts::tree::get_node_by_key;
use leptos::prelude::*;
use std::sync::Arc;

/// The editor picked in the header, or the first editor when that id is
/// not (or no longer) present.
fn current_editor(editors: &[Arc<SerializedEditorState>], selected: &str) -> Option<Arc<SerializedEditorState>> {
    editors
        .iter()
        .find(|editor| editor.id == selected)
        .or_else(|| editors.first())
        .cloned()
}

#[component]
pub fn Panel(#[prop(into)] editors: Signal<Vec<Arc<SerializedEditorState>>>) -> impl IntoView {
    let is_empty = Memo::new(move |_| editors.with(Vec::is_empty));

    view! {
        <Show when=move || !is_empty.get() fallback=|| view! { <EmptyScreen /> }>
            <EditorPanel editors=editors />
        </Show>
    }
}

#[component]
fn EditorPanel(editors: Signal<Vec<Arc<SerializedEditorState>>>) -> impl IntoView {
    let ctx = use_panel_context();
    let handle = ctx.node_tree_handle();

    // Keep the header's select pointing at an editor that exists.
    Effect::new(move |_| {
        let selected = ctx.selected_editor.get();
        let fallback = editors.with(|editors| {
            if editors.iter().any(|editor| editor.id == selected) {
                None
            } else {
                editors.first().map(|editor| editor.id.clone())
            }
        });
        if let Some(id) = fallback {
            ctx.selected_editor.set(id);
        }
    });

    // Updates of other editors keep the same Arc and stop here.
    let editor = Memo::new_with_compare(
        move |_| {
            let selected = ctx.selected_editor.get();
            editors.with(|editors| current_editor(editors, &selected))
        },
        snapshot_changed,
    );
    let editor_id = Memo::new(move |_| editor.with(|editor| editor.as_ref().map(|editor| editor.id.clone())));

    let selected_key = Memo::new(move |_| ctx.node_tree.with(|state| state.selected.first().cloned()));

    let selected_meta = Signal::derive(move || -> Option<JsonObject> {
        let key = selected_key.get()?;
        editor.with(|editor| {
            let editor = editor.as_ref()?;
            get_node_by_key(&editor.root, &key).map(|node| node.meta().clone())
        })
    });

    // The JSON tree keeps its collapse state while the same node stays selected.
    let inspected_key = Memo::new(move |_| selected_meta.with(Option::is_some).then(|| selected_key.get()).flatten());

    // Rebuilt only when another editor is picked; snapshots of the same
    // editor patch the existing rows.
    let node_tree = move || {
        editor_id
            .get()
            .map(|_| view! { <NodeTree editor=editor handle=handle /> })
    };

    let json_tree = move || {
        inspected_key.get().map(|_| {
            let data = Signal::derive(move || selected_meta.get().unwrap_or_default());
            view! { <JsonTree data=data class="panel-main__json" /> }
        })
    };

    view! {
        <Shell
            header=move || view! { <Header editors=editors /> }.into_any()
            main=move || {
                view! {
                    <div class="panel-main" class:panel-main--inspecting=move || inspected_key.with(Option::is_some)>
                        <div class="panel-main__tree">{node_tree}</div>
                        {json_tree}
                    </div>
                }
                .into_any()
            }
            sidebar=move || {
                view! {
                    <Sidebar title="Selection">
                        <SelectionPanel editor=editor handle=handle />
                    </Sidebar>
                }
                .into_any()
            }
        />
    }
}
