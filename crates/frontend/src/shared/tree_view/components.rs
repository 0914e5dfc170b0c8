use super::{aria_expanded, state_attr, TreeViewHandle};
use leptos::ev::{FocusEvent, KeyboardEvent, MouseEvent, PointerEvent};
use leptos::html::Div;
use leptos::prelude::*;

/// Outermost list of a tree.
#[component]
pub fn TreeRoot(#[prop(optional, into)] class: String, children: Children) -> impl IntoView {
    view! {
        <ul role="tree" class=format!("tree-view {class}")>
            {children()}
        </ul>
    }
}

/// One node. Depth is the number of ancestors. Only `expandable` items
/// report `aria-expanded`.
#[component]
pub fn TreeItem(
    handle: TreeViewHandle,
    #[prop(into)] value: String,
    ancestors: Vec<String>,
    #[prop(optional)] expandable: bool,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let depth = ancestors.len();
    let selected_key = value.clone();
    let is_selected = move || handle.is_selected(&selected_key);
    let collapsed_key = value;
    let is_collapsed = move || handle.is_collapsed(&collapsed_key);
    let is_selected_attr = is_selected.clone();
    let is_collapsed_attr = is_collapsed.clone();

    view! {
        <li
            role="treeitem"
            class=format!("tree-view__item {class}")
            aria-selected=move || is_selected_attr().to_string()
            aria-expanded=move || aria_expanded(expandable, is_collapsed_attr())
            data-state=move || state_attr(is_collapsed())
            data-selected=move || is_selected().then_some("")
            data-depth=depth.to_string()
            style=format!("--depth: {depth}")
        >
            {children()}
        </li>
    }
}

/// Children of the item `value`; not rendered while it is collapsed.
#[component]
pub fn TreeGroup(handle: TreeViewHandle, #[prop(into)] value: String, children: ChildrenFn) -> impl IntoView {
    view! {
        <Show when=move || !handle.is_collapsed(&value)>
            <ul role="group" class="tree-view__group">
                {children()}
            </ul>
        </Show>
    }
}

/// Expand/collapse toggle for the item `value`.
#[component]
pub fn TreeTrigger(
    handle: TreeViewHandle,
    #[prop(into)] value: String,
    ancestors: Vec<String>,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let state_key = value.clone();

    view! {
        <span
            class=format!("tree-view__trigger {class}")
            data-state=move || state_attr(handle.is_collapsed(&state_key))
            on:click=move |_: MouseEvent| handle.toggle(&value, &ancestors)
        >
            {children()}
        </span>
    }
}

/// Focusable row of the item `value`. Click selects (when the view is
/// selectable), double-click expands.
#[component]
pub fn TreeItemText(
    handle: TreeViewHandle,
    #[prop(into)] value: String,
    ancestors: Vec<String>,
    #[prop(optional, into)] class: String,
    #[prop(optional, into)] tab_index: Option<Signal<i32>>,
    #[prop(optional)] node_ref: Option<NodeRef<Div>>,
    #[prop(optional)] on_focus: Option<Callback<()>>,
    #[prop(optional)] on_blur: Option<Callback<()>>,
    #[prop(optional)] on_pointer_enter: Option<Callback<()>>,
    #[prop(optional)] on_pointer_leave: Option<Callback<()>>,
    #[prop(optional)] on_key_down: Option<Callback<KeyboardEvent>>,
    children: Children,
) -> impl IntoView {
    let node_ref = node_ref.unwrap_or_else(NodeRef::new);

    let state_key = value.clone();
    let selected_key = value.clone();
    let click_key = value.clone();
    let expand_key = value;

    let handle_click = move |ev: MouseEvent| {
        handle.select(&click_key);
        ev.stop_propagation();
    };

    let handle_double_click = move |ev: MouseEvent| {
        handle.expand(&expand_key, &ancestors);
        ev.stop_propagation();
    };

    view! {
        <div
            node_ref=node_ref
            class=format!("tree-view__text {class}")
            tabindex=move || tab_index.map(|index| index.get().to_string())
            data-state=move || state_attr(handle.is_collapsed(&state_key))
            data-selected=move || handle.is_selected(&selected_key).then_some("")
            on:click=handle_click
            on:dblclick=handle_double_click
            on:focus=move |_: FocusEvent| {
                if let Some(callback) = on_focus {
                    callback.run(());
                }
            }
            on:blur=move |_: FocusEvent| {
                if let Some(callback) = on_blur {
                    callback.run(());
                }
            }
            on:pointerenter=move |_: PointerEvent| {
                if let Some(callback) = on_pointer_enter {
                    callback.run(());
                }
            }
            on:pointerleave=move |_: PointerEvent| {
                if let Some(callback) = on_pointer_leave {
                    callback.run(());
                }
            }
            on:keydown=move |ev: KeyboardEvent| {
                if let Some(callback) = on_key_down {
                    callback.run(ev);
                }
            }
        >
            {children()}
        </div>
    }
}
