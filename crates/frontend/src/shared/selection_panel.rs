use super::collapsible::{Collapsible, CollapsibleContent, CollapsibleTrigger};
use super::icons::icon;
use super::tree_view::TreeViewHandle;
use contracts::snapshot::{SerializedEditorState, SerializedPoint};
use contracts::tree::get_node_by_key;
use leptos::prelude::*;
use std::sync::Arc;
use thaw::*;

/// Key and type of each node the selection touches that still exists in the tree.
fn selected_nodes(editor: &SerializedEditorState) -> Vec<(String, String)> {
    let Some(selection) = &editor.selection else {
        return Vec::new();
    };

    selection
        .nodes()
        .iter()
        .filter_map(|key| get_node_by_key(&editor.root, key))
        .map(|node| (node.key().to_string(), node.node_type().to_string()))
        .collect()
}

/// Sidebar describing the current editor selection. Picking a node selects
/// it in the node tree and expands its ancestors.
#[component]
pub fn SelectionPanel(
    #[prop(into)] editor: Signal<Option<Arc<SerializedEditorState>>>,
    handle: TreeViewHandle,
) -> impl IntoView {
    let nodes_open = RwSignal::new(true);
    let range_open = RwSignal::new(true);
    let anchor_open = RwSignal::new(true);
    let focus_open = RwSignal::new(true);

    let reveal = move |key: String| {
        if let Some(editor) = editor.get_untracked() {
            handle.reveal(&editor.root, &key);
        }
    };

    move || {
        let Some(editor) = editor.get() else {
            return ().into_any();
        };
        let Some(selection) = editor.selection.clone() else {
            return view! {
                <div class="selection-panel__empty">
                    {icon("text-selection-off")}
                    " No selection"
                </div>
            }
            .into_any();
        };

        let nodes = selected_nodes(&editor);
        let range = selection.as_range().map(|range| (range.anchor.clone(), range.focus.clone()));

        view! {
            <div class="selection-panel">
                <Collapsible open=nodes_open class="selection-panel__section">
                    <CollapsibleTrigger class="selection-panel__header">
                        {icon("triangle-right")}
                        <span>"Nodes"</span>
                    </CollapsibleTrigger>
                    <CollapsibleContent>
                        <Table class="selection-panel__nodes">
                            <TableHeader>
                                <TableRow>
                                    <TableHeaderCell>"Key"</TableHeaderCell>
                                    <TableHeaderCell>"Type"</TableHeaderCell>
                                </TableRow>
                            </TableHeader>
                            <TableBody>
                                {nodes
                                    .into_iter()
                                    .map(|(key, node_type)| {
                                        let target = key.clone();
                                        view! {
                                            <TableRow
                                                on:click=move |_| reveal(target.clone())
                                                attr:style="cursor: pointer;"
                                            >
                                                <TableCell>{key}</TableCell>
                                                <TableCell>{node_type}</TableCell>
                                            </TableRow>
                                        }
                                    })
                                    .collect_view()}
                            </TableBody>
                        </Table>
                    </CollapsibleContent>
                </Collapsible>

                {range.map(|(anchor, focus)| {
                    view! {
                        <Collapsible open=range_open class="selection-panel__section">
                            <CollapsibleTrigger class="selection-panel__header">
                                {icon("triangle-right")}
                                <span>"Range"</span>
                            </CollapsibleTrigger>
                            <CollapsibleContent>
                                <PointDetails label="Anchor" point=anchor open=anchor_open />
                                <PointDetails label="Focus" point=focus open=focus_open />
                            </CollapsibleContent>
                        </Collapsible>
                    }
                })}
            </div>
        }
        .into_any()
    }
}

#[component]
fn PointDetails(label: &'static str, point: SerializedPoint, open: RwSignal<bool>) -> impl IntoView {
    view! {
        <Collapsible open=open class="selection-panel__point">
            <CollapsibleTrigger class="selection-panel__point-header">
                {icon("triangle-right")}
                <span>{label}</span>
            </CollapsibleTrigger>
            <CollapsibleContent>
                <dl class="selection-panel__point-fields">
                    <div>
                        <dt>"Key"</dt>
                        <dd>{point.key}</dd>
                    </div>
                    <div>
                        <dt>"Offset"</dt>
                        <dd>{point.offset}</dd>
                    </div>
                </dl>
            </CollapsibleContent>
        </Collapsible>
    }
}
