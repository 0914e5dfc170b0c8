//! Read-only tree over a node's exported JSON.

use super::icons::icon;
use super::tree_view::{RowRegistry, TreeGroup, TreeItem, TreeItemText, TreeRoot, TreeTrigger, TreeViewHandle};
use contracts::config::config;
use contracts::shared::json_preview::{item_count_label, preview};
use contracts::snapshot::JsonObject;
use contracts::tree::{navigate, tab_stop, Navigation, TreeKey, TreeNode, TreeViewState};
use leptos::ev::KeyboardEvent;
use leptos::html::Div;
use leptos::prelude::*;
use serde_json::Value;

/// Item keys are JSON-pointer-like paths, so sibling entries never collide
/// and the same path keeps its collapse state across data updates.
fn child_path(parent: &str, key: &str) -> String {
    format!("{parent}/{}", key.replace('~', "~0").replace('/', "~1"))
}

fn entries(value: &Value) -> Vec<(String, Value)> {
    match value {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| (index.to_string(), item.clone()))
            .collect(),
        Value::Object(map) => map.iter().map(|(key, item)| (key.clone(), item.clone())).collect(),
        _ => Vec::new(),
    }
}

/// Paths of the data as a tree, for keyboard movement. The unnamed root
/// (empty path) stands for the data object itself and is never rendered.
#[derive(Debug, Clone, PartialEq)]
struct JsonPath {
    path: String,
    children: Option<Vec<JsonPath>>,
}

impl TreeNode for JsonPath {
    fn key(&self) -> &str {
        &self.path
    }

    fn children(&self) -> Option<&[Self]> {
        self.children.as_deref()
    }
}

impl JsonPath {
    fn of(path: String, value: &Value) -> Self {
        let children = matches!(value, Value::Array(_) | Value::Object(_)).then(|| {
            entries(value)
                .iter()
                .map(|(key, item)| JsonPath::of(child_path(&path, key), item))
                .collect()
        });
        Self { path, children }
    }

    fn root(data: &JsonObject) -> Self {
        Self {
            path: String::new(),
            children: Some(
                data.iter()
                    .map(|(key, value)| JsonPath::of(child_path("", key), value))
                    .collect(),
            ),
        }
    }
}

/// The row that takes Tab: the last row moved to, else the first entry.
fn json_tab_stop(paths: &JsonPath, state: &TreeViewState) -> Option<String> {
    let stop = tab_stop(paths, state);
    if stop == paths.path {
        paths.children.as_ref()?.first().map(|first| first.path.clone())
    } else {
        Some(stop)
    }
}

#[derive(Clone, Copy)]
struct JsonTreeScope {
    handle: TreeViewHandle,
    paths: Memo<JsonPath>,
    tab_stop: Memo<Option<String>>,
    rows: RowRegistry,
}

impl JsonTreeScope {
    fn navigate(&self, current: &str, key: TreeKey) -> Navigation {
        let navigation = self.paths.with_untracked(|paths| {
            self.handle
                .state
                .with_untracked(|state| navigate(paths, &state.collapsed, current, key))
        });
        match navigation {
            Navigation::Focus(target) if target.is_empty() => Navigation::None,
            navigation => navigation,
        }
    }
}

#[component]
pub fn JsonTree(#[prop(into)] data: Signal<JsonObject>, #[prop(optional, into)] class: String) -> impl IntoView {
    let handle = TreeViewHandle::collapse_only(RwSignal::new(TreeViewState::default()));
    let paths = Memo::new(move |_| data.with(JsonPath::root));
    let stop = Memo::new(move |_| paths.with(|paths| handle.state.with(|state| json_tab_stop(paths, state))));
    let scope = JsonTreeScope {
        handle,
        paths,
        tab_stop: stop,
        rows: RowRegistry::new(),
    };

    view! {
        <TreeRoot class=format!("json-tree {class}")>
            {move || {
                data.with(|data| {
                    data.iter()
                        .map(|(key, value)| {
                            view! {
                                <JsonTreeItem
                                    scope=scope
                                    path=child_path("", key)
                                    label=key.clone()
                                    value=value.clone()
                                    ancestors=Vec::new()
                                />
                            }
                            .into_any()
                        })
                        .collect_view()
                })
            }}
        </TreeRoot>
    }
}

#[component]
fn JsonTreeItem(
    scope: JsonTreeScope,
    path: String,
    label: String,
    value: Value,
    ancestors: Vec<String>,
) -> impl IntoView {
    let handle = scope.handle;
    let children = entries(&value);

    let row = NodeRef::<Div>::new();
    scope.rows.register(path.clone(), row);

    let tab_path = path.clone();
    let tab_index = Signal::derive(move || {
        if scope.tab_stop.with(|stop| stop.as_deref() == Some(tab_path.as_str())) {
            0
        } else {
            -1
        }
    });

    let focus_path = path.clone();
    let on_focus = Callback::new(move |_| handle.set_active(&focus_path));

    let nav_path = path.clone();
    let on_key_down = Callback::new(move |ev: KeyboardEvent| {
        let Some(tree_key) = TreeKey::from_key(&ev.key()) else {
            return;
        };
        ev.prevent_default();

        let navigation = scope.navigate(&nav_path, tree_key);
        handle.apply(&navigation);
        if let Navigation::Focus(target) = &navigation {
            scope.rows.focus(target);
        }
    });

    if !matches!(value, Value::Array(_) | Value::Object(_)) {
        return view! {
            <TreeItem handle=handle value=path.clone() ancestors=ancestors.clone() class="json-tree__item">
                <TreeItemText
                    handle=handle
                    value=path
                    ancestors=ancestors
                    class="json-tree__row json-tree__row--scalar"
                    tab_index=tab_index
                    node_ref=row
                    on_focus=on_focus
                    on_key_down=on_key_down
                >
                    <span class="json-tree__key">{format!("{label}:")}</span>
                    <span class="json-tree__value">{value.to_string()}</span>
                </TreeItemText>
            </TreeItem>
        }
        .into_any();
    }

    let depth = config().panel.json_preview_depth;
    let collapsed_preview = preview(&value, depth);
    let expanded_label = item_count_label(&value).unwrap_or_default();
    let summary_path = path.clone();
    let summary = move || {
        if handle.is_collapsed(&summary_path) {
            collapsed_preview.clone()
        } else {
            expanded_label.clone()
        }
    };

    let child_ancestors = {
        let mut next = ancestors.clone();
        next.push(path.clone());
        next
    };

    let trigger = view! {
        <TreeTrigger handle=handle value=path.clone() ancestors=ancestors.clone() class="json-tree__trigger">
            {icon("triangle-right")}
        </TreeTrigger>
    };

    view! {
        <TreeItem handle=handle value=path.clone() ancestors=ancestors.clone() expandable=true class="json-tree__item">
            <TreeItemText
                handle=handle
                value=path.clone()
                ancestors=ancestors
                class="json-tree__row"
                tab_index=tab_index
                node_ref=row
                on_focus=on_focus
                on_key_down=on_key_down
            >
                {trigger}
                <span class="json-tree__key">{format!("{label}:")}</span>
                <span class="json-tree__summary">{summary}</span>
            </TreeItemText>
            <TreeGroup handle=handle value=path.clone()>
                {
                    let children = children.clone();
                    let path = path.clone();
                    let ancestors = child_ancestors.clone();
                    children
                        .into_iter()
                        .map(|(key, item)| {
                            view! {
                                <JsonTreeItem
                                    scope=scope
                                    path=child_path(&path, &key)
                                    label=key
                                    value=item
                                    ancestors=ancestors.clone()
                                />
                            }
                            .into_any()
                        })
                        .collect_view()
                }
            </TreeGroup>
        </TreeItem>
    }
    .into_any()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_child_path_nests() {
        let parent = child_path("", "children");
        assert_eq!(parent, "/children");
        assert_eq!(child_path(&parent, "0"), "/children/0");
    }

    #[test]
    fn test_child_path_escapes_separators() {
        assert_eq!(child_path("", "a/b"), "/a~1b");
        assert_eq!(child_path("", "m~n"), "/m~0n");
    }

    #[test]
    fn test_entries_index_arrays() {
        let items = entries(&json!(["x", 2]));
        assert_eq!(items, vec![("0".to_string(), json!("x")), ("1".to_string(), json!(2))]);
    }

    #[test]
    fn test_entries_of_scalar_is_empty() {
        assert!(entries(&json!(true)).is_empty());
    }

    fn sample() -> JsonPath {
        let data = json!({ "format": 0, "style": { "color": "red" }, "tags": [] });
        JsonPath::root(data.as_object().unwrap())
    }

    #[test]
    fn test_path_tree_mirrors_containers() {
        let paths = sample();
        let top: Vec<_> = paths.children.as_ref().unwrap().iter().map(|p| p.path.as_str()).collect();
        assert_eq!(top, ["/format", "/style", "/tags"]);

        let style = &paths.children.as_ref().unwrap()[1];
        assert_eq!(style.children.as_ref().unwrap()[0].path, "/style/color");
        assert!(paths.children.as_ref().unwrap()[0].children.is_none());
        assert_eq!(paths.children.as_ref().unwrap()[2].children, Some(Vec::new()));
    }

    #[test]
    fn test_first_entry_is_tab_stop_by_default() {
        let paths = sample();
        assert_eq!(json_tab_stop(&paths, &TreeViewState::default()), Some("/format".to_string()));

        let empty = JsonPath::root(&JsonObject::new());
        assert_eq!(json_tab_stop(&empty, &TreeViewState::default()), None);
    }

    #[test]
    fn test_tab_stop_follows_row_moved_to() {
        let paths = sample();
        let mut state = TreeViewState::default();

        let navigation = navigate(&paths, &state.collapsed, "/style", TreeKey::ArrowDown);
        assert_eq!(navigation, Navigation::Focus("/style/color".to_string()));
        state.apply(&navigation);
        assert_eq!(json_tab_stop(&paths, &state), Some("/style/color".to_string()));

        state.collapse("/style");
        assert_eq!(json_tab_stop(&paths, &state), Some("/format".to_string()));
    }
}
