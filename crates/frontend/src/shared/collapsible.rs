use super::tree_view::state_attr;
use leptos::ev::MouseEvent;
use leptos::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_CONTENT_ID: AtomicUsize = AtomicUsize::new(0);

#[derive(Clone, Copy)]
struct CollapsibleContext {
    open: RwSignal<bool>,
    content_id: StoredValue<String>,
}

fn use_collapsible() -> CollapsibleContext {
    use_context::<CollapsibleContext>().expect("CollapsibleTrigger/CollapsibleContent must be inside a Collapsible")
}

/// Disclosure section; `open` may be shared with the caller.
#[component]
pub fn Collapsible(
    #[prop(optional)] open: Option<RwSignal<bool>>,
    #[prop(optional)] default_open: bool,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let open = open.unwrap_or_else(|| RwSignal::new(default_open));
    let id = NEXT_CONTENT_ID.fetch_add(1, Ordering::Relaxed);
    provide_context(CollapsibleContext {
        open,
        content_id: StoredValue::new(format!("collapsible-content-{id}")),
    });

    view! {
        <div class=format!("collapsible {class}") data-state=move || state_attr(!open.get())>
            {children()}
        </div>
    }
}

#[component]
pub fn CollapsibleTrigger(#[prop(optional, into)] class: String, children: Children) -> impl IntoView {
    let ctx = use_collapsible();

    view! {
        <button
            type="button"
            class=format!("collapsible__trigger {class}")
            aria-controls=ctx.content_id.get_value()
            aria-expanded=move || ctx.open.get().to_string()
            data-state=move || state_attr(!ctx.open.get())
            on:click=move |_: MouseEvent| ctx.open.update(|open| *open = !*open)
        >
            {children()}
        </button>
    }
}

/// Stays mounted while closed so nested state survives toggling.
#[component]
pub fn CollapsibleContent(#[prop(optional, into)] class: String, children: Children) -> impl IntoView {
    let ctx = use_collapsible();

    view! {
        <div
            id=ctx.content_id.get_value()
            class=format!("collapsible__content {class}")
            data-state=move || state_attr(!ctx.open.get())
            hidden=move || !ctx.open.get()
        >
            {children()}
        </div>
    }
}
