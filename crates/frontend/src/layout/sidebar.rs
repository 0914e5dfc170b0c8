use crate::layout::global_context::use_panel_context;
use leptos::prelude::*;

const DEFAULT_WIDTH: f64 = 280.0;
const MIN_WIDTH: f64 = 180.0;
/// Room kept for the node tree and the JSON tree.
const RESERVED_MAIN_WIDTH: f64 = 400.0;

fn window_width() -> Option<f64> {
    web_sys::window()
        .and_then(|window| window.inner_width().ok())
        .and_then(|width| width.as_f64())
}

fn set_body_style(resizing: bool) {
    let Some(body) = web_sys::window().and_then(|w| w.document()).and_then(|d| d.body()) else {
        return;
    };
    let (cursor, user_select) = if resizing { ("col-resize", "none") } else { ("", "") };
    let _ = body.style().set_property("cursor", cursor);
    let _ = body.style().set_property("user-select", user_select);
}

/// Resizable right-hand sidebar; hidden while `sidebar_open` is false.
#[component]
pub fn Sidebar(#[prop(into)] title: String, children: Children) -> impl IntoView {
    let ctx = use_panel_context();
    let is_open = move || ctx.sidebar_open.get();

    let width = RwSignal::new(DEFAULT_WIDTH);
    let is_resizing = RwSignal::new(false);
    let start_x = RwSignal::new(0.0f64);
    let start_width = RwSignal::new(DEFAULT_WIDTH);

    let on_resize_start = move |ev: leptos::ev::MouseEvent| {
        if !is_open() {
            return;
        }
        is_resizing.set(true);
        start_x.set(ev.client_x() as f64);
        start_width.set(width.get_untracked());
        ev.prevent_default();
    };

    let _ = window_event_listener(leptos::ev::mousemove, move |ev: leptos::ev::MouseEvent| {
        if !is_resizing.get_untracked() {
            return;
        }
        let Some(window_width) = window_width() else {
            return;
        };

        let max_width = (window_width - RESERVED_MAIN_WIDTH).max(MIN_WIDTH);
        let dx = start_x.get_untracked() - ev.client_x() as f64;
        width.set((start_width.get_untracked() + dx).clamp(MIN_WIDTH, max_width));
    });

    let _ = window_event_listener(leptos::ev::mouseup, move |_ev: leptos::ev::MouseEvent| {
        if is_resizing.get_untracked() {
            is_resizing.set(false);
        }
    });

    Effect::new(move |_| set_body_style(is_resizing.get()));

    view! {
        <aside
            class="panel-sidebar"
            class:panel-sidebar--hidden=move || !is_open()
            class:panel-sidebar--resizing=move || is_resizing.get()
            style:width=move || if is_open() { format!("{}px", width.get()) } else { "0px".to_string() }
        >
            <div class="panel-sidebar__resizer" on:mousedown=on_resize_start></div>
            <div class="panel-sidebar__header">{title}</div>
            <div class="panel-sidebar__body">{children()}</div>
        </aside>
    }
}
