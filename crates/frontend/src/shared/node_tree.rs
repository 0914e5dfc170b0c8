//! Keyboard-navigable tree of an editor snapshot's nodes.
//!
//! Rows are keyed by node key: a new snapshot of the same editor patches the
//! rows whose node changed and leaves the rest (and the focused row) alone.

use super::icons::icon;
use super::transport;
use super::tree_view::{RowRegistry, TreeGroup, TreeItem, TreeItemText, TreeRoot, TreeTrigger, TreeViewHandle};
use contracts::snapshot::{NodeGroup, SerializedEditorState, SerializedNode};
use contracts::tree::{navigate, tab_stop, Navigation, TreeKey};
use leptos::ev::KeyboardEvent;
use leptos::html::Div;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::collections::HashMap;
use std::sync::Arc;
use thaw::*;

/// What one row renders.
#[derive(Debug, Clone, PartialEq)]
struct NodeRow {
    group: NodeGroup,
    /// Text content for text nodes, the node type otherwise.
    label: String,
    children: Vec<String>,
}

impl NodeRow {
    fn of(node: &SerializedNode) -> Self {
        let label = match node {
            SerializedNode::Text(text) => text.text.clone(),
            _ => node.node_type().to_string(),
        };
        Self {
            group: node.group(),
            label,
            children: node
                .children()
                .map(|children| children.iter().map(|child| child.key().to_string()).collect())
                .unwrap_or_default(),
        }
    }
}

fn index_rows(root: &SerializedNode) -> HashMap<String, NodeRow> {
    fn walk(node: &SerializedNode, rows: &mut HashMap<String, NodeRow>) {
        rows.insert(node.key().to_string(), NodeRow::of(node));
        for child in node.children().unwrap_or_default() {
            walk(child, rows);
        }
    }

    let mut rows = HashMap::new();
    walk(root, &mut rows);
    rows
}

#[derive(Clone, Copy)]
struct NodeTreeScope {
    editor: Signal<Option<Arc<SerializedEditorState>>>,
    handle: TreeViewHandle,
    nodes: Memo<HashMap<String, NodeRow>>,
    tab_stop: Memo<Option<String>>,
    rows: RowRegistry,
}

impl NodeTreeScope {
    fn editor_id(&self) -> Option<String> {
        self.editor
            .with_untracked(|editor| editor.as_ref().map(|editor| editor.id.clone()))
    }

    fn highlight(&self, key: &str) {
        if let Some(id) = self.editor_id() {
            spawn_local(transport::highlight_node(id, key.to_string()));
        }
    }

    fn navigate(&self, current: &str, key: TreeKey) -> Navigation {
        self.editor.with_untracked(|editor| {
            let Some(editor) = editor.as_ref() else {
                return Navigation::None;
            };
            self.handle
                .state
                .with_untracked(|state| navigate(&editor.root, &state.collapsed, current, key))
        })
    }
}

#[component]
pub fn NodeTree(
    #[prop(into)] editor: Signal<Option<Arc<SerializedEditorState>>>,
    handle: TreeViewHandle,
) -> impl IntoView {
    let nodes = Memo::new(move |_| {
        editor.with(|editor| {
            editor
                .as_ref()
                .map(|editor| index_rows(&editor.root))
                .unwrap_or_default()
        })
    });
    let stop = Memo::new(move |_| {
        editor.with(|editor| {
            editor
                .as_ref()
                .map(|editor| handle.state.with(|state| tab_stop(&editor.root, state)))
        })
    });
    let root_key = Memo::new(move |_| {
        editor.with(|editor| editor.as_ref().map(|editor| editor.root.key().to_string()))
    });

    let scope = NodeTreeScope {
        editor,
        handle,
        nodes,
        tab_stop: stop,
        rows: RowRegistry::new(),
    };

    view! {
        <TreeRoot class="node-tree">
            {move || {
                root_key
                    .get()
                    .map(|key| view! { <NodeTreeItem scope=scope node_key=key ancestors=Vec::new() /> })
            }}
        </TreeRoot>
    }
}

#[component]
fn NodeTreeItem(scope: NodeTreeScope, node_key: String, ancestors: Vec<String>) -> impl IntoView {
    let handle = scope.handle;
    let key = node_key;

    let row_key = key.clone();
    let node = Memo::new(move |_| scope.nodes.with(|nodes| nodes.get(&row_key).cloned()));
    let group = node
        .with_untracked(|node| node.as_ref().map(|node| node.group))
        .unwrap_or(NodeGroup::Unknown);

    let row = NodeRef::<Div>::new();
    scope.rows.register(key.clone(), row);

    let tab_key = key.clone();
    let tab_index = Signal::derive(move || {
        if scope.tab_stop.with(|stop| stop.as_deref() == Some(tab_key.as_str())) {
            0
        } else {
            -1
        }
    });

    let focus_key = key.clone();
    let on_focus = Callback::new(move |_| {
        handle.select(&focus_key);
        scope.highlight(&focus_key);
    });
    let hover_key = key.clone();
    let on_pointer_enter = Callback::new(move |_| scope.highlight(&hover_key));
    let on_leave = Callback::new(|_| transport::remove_highlight());

    let nav_key = key.clone();
    let on_key_down = Callback::new(move |ev: KeyboardEvent| {
        let Some(tree_key) = TreeKey::from_key(&ev.key()) else {
            return;
        };
        ev.prevent_default();

        let navigation = scope.navigate(&nav_key, tree_key);
        handle.apply(&navigation);
        if let Navigation::Focus(target) = &navigation {
            scope.rows.focus(target);
        }
    });

    let label_class = if group == NodeGroup::Text { "node-tree__text" } else { "node-tree__type" };
    let label = move || node.with(|node| node.as_ref().map(|node| node.label.clone()).unwrap_or_default());

    let badge_key = key.clone();
    let badge = (group != NodeGroup::Root).then(move || {
        view! {
            <Badge appearance=BadgeAppearance::Outline size=BadgeSize::Small class="node-tree__key">
                {badge_key}
            </Badge>
        }
    });
    let trigger = group.is_container().then(|| {
        view! {
            <TreeTrigger handle=handle value=key.clone() ancestors=ancestors.clone() class="node-tree__trigger">
                {icon("triangle-right")}
            </TreeTrigger>
        }
    });

    let child_ancestors = {
        let mut path = ancestors.clone();
        path.push(key.clone());
        path
    };
    let children = group.is_container().then(|| {
        view! {
            <TreeGroup handle=handle value=key.clone()>
                {
                    let ancestors = child_ancestors.clone();
                    view! {
                        <For
                            each=move || node.with(|node| node.as_ref().map(|node| node.children.clone()).unwrap_or_default())
                            key=|child| child.clone()
                            children=move |child| {
                                view! { <NodeTreeItem scope=scope node_key=child ancestors=ancestors.clone() /> }.into_any()
                            }
                        />
                    }
                }
            </TreeGroup>
        }
    });

    view! {
        <TreeItem
            handle=handle
            value=key.clone()
            ancestors=ancestors.clone()
            expandable=group.is_container()
            class=format!("node-tree__item node-tree__item--{}", group.as_str())
        >
            <TreeItemText
                handle=handle
                value=key.clone()
                ancestors=ancestors
                class="node-tree__row"
                tab_index=tab_index
                node_ref=row
                on_focus=on_focus
                on_blur=on_leave
                on_pointer_enter=on_pointer_enter
                on_pointer_leave=on_leave
                on_key_down=on_key_down
            >
                {trigger}
                <span class=label_class>{label}</span>
                {badge}
            </TreeItemText>
            {children}
        </TreeItem>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree(text: &str) -> SerializedNode {
        serde_json::from_value(json!({
            "group": "root", "key": "root", "type": "root", "meta": {},
            "children": [
                {
                    "group": "element", "key": "p1", "type": "paragraph", "meta": {},
                    "children": [
                        { "group": "text", "key": "t1", "type": "text", "text": text, "meta": {} }
                    ]
                },
                { "group": "decorator", "key": "d1", "type": "image", "meta": {} }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_index_rows_covers_every_key() {
        let rows = index_rows(&tree("hello"));
        let mut keys: Vec<_> = rows.keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, ["d1", "p1", "root", "t1"]);
        assert_eq!(rows["root"].children, ["p1", "d1"]);
        assert!(rows["d1"].children.is_empty());
    }

    #[test]
    fn test_row_label_is_text_or_type() {
        let rows = index_rows(&tree("hello"));
        assert_eq!(rows["t1"].label, "hello");
        assert_eq!(rows["t1"].group, NodeGroup::Text);
        assert_eq!(rows["p1"].label, "paragraph");
    }

    #[test]
    fn test_only_edited_rows_differ_between_snapshots() {
        let before = index_rows(&tree("hello"));
        let after = index_rows(&tree("hello world"));

        let changed: Vec<_> = before
            .keys()
            .filter(|key| before.get(*key) != after.get(*key))
            .cloned()
            .collect();
        assert_eq!(changed, ["t1"]);
    }
}
