//! Content-script overlay that paints the highlight box over the inspected
//! page.

use crate::shared::transport;
use contracts::config::config;
use contracts::messages::{ContentMessage, Rect};
use leptos::prelude::*;

/// Next rect to paint after `message`. `None` clears the highlight.
fn next_highlight(message: ContentMessage) -> Option<Rect> {
    match message {
        ContentMessage::CreateHighlight(payload) => Some(payload.rect),
        ContentMessage::RemoveHighlight | ContentMessage::DevtoolsPanelUnloaded => None,
    }
}

fn box_style(rect: &Rect, scroll_x: f64, scroll_y: f64, color: &str) -> String {
    format!(
        "position: absolute; top: 0; left: 0; \
         transform: translate({}px, {}px); width: {}px; height: {}px; \
         pointer-events: none; background-color: {color};",
        rect.x + scroll_x,
        rect.y + scroll_y,
        rect.width,
        rect.height,
    )
}

fn scroll_offset() -> (f64, f64) {
    web_sys::window()
        .map(|window| {
            (
                window.scroll_x().unwrap_or_default(),
                window.scroll_y().unwrap_or_default(),
            )
        })
        .unwrap_or_default()
}

#[component]
pub fn Overlay() -> impl IntoView {
    let rect = RwSignal::new(None::<Rect>);

    match transport::listen_content_messages(move |message| rect.set(next_highlight(message))) {
        Ok(listener) => {
            let _ = StoredValue::new_local(listener);
        }
        Err(e) => log::error!("Overlay could not listen for panel messages: {e:?}"),
    }

    let _ = window_event_listener(leptos::ev::pointerover, move |_| rect.set(None));

    let color = config().overlay.highlight_color.clone();

    move || {
        rect.get().map(|rect| {
            let (scroll_x, scroll_y) = scroll_offset();
            view! { <span class="lexical-devtools-highlight" style=box_style(&rect, scroll_x, scroll_y, &color)></span> }
        })
    }
}
